//! 샘플링 루프.
//!
//! 고정 주기로 네트워크 카운터, CPU/메모리, GPU, 연결 상태를 수집해 스냅샷을 게시한다.
//!
//! ## 상태
//! `Idle` → `Running` → `Stopped` (종료 상태, 재시작 불가)
//!
//! ## 주기
//! 한 틱의 작업이 끝난 시점부터 `interval`만큼 잠든다. 벽시계 정렬은 하지 않으며
//! 틱이 겹쳐 실행되는 일은 없다. 첫 틱은 시작 직후 바로 실행된다.
//!
//! ## 생존성
//! 틱 안의 모든 실패는 틱 경계에서 잡힌다. 패닉이 나도 저하된 스냅샷을 게시하고 루프는 계속된다.
//! 블로킹 측정은 `read_timeout` 안에 끝나지 않으면 실패로 표시하고, 멈춘 작업은 다음 틱에서
//! 이어서 기다린다 (같은 측정을 중복 실행하지 않음).

use chrono::Utc;
use devperf_core::error::CoreError;
use devperf_core::handoff::{self, SnapshotPublisher, SnapshotReader};
use devperf_core::models::availability::Unavailable;
use devperf_core::models::network::CounterSample;
use devperf_core::models::system::{
    ConnectivityStatus, GpuReading, PerformanceSnapshot, Snapshot,
};
use devperf_core::ports::connectivity::ConnectivityProbe;
use devperf_core::ports::host::{CounterSource, LoadReading, LoadSource};
use devperf_core::ports::provider::GpuProvider;
use devperf_core::rate::RateCalculator;
use futures::FutureExt;
use parking_lot::Mutex;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// 블로킹 측정 기본 대기 한도
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(3);

const READ_TIMED_OUT: &str = "timed out";

/// 샘플링 루프 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    /// 시작 전
    Idle,
    /// 주기 실행 중
    Running,
    /// 종료됨 (루프가 끝났거나 다음 경계에서 끝남)
    Stopped,
}

/// 틱마다 읽는 데이터 소스 묶음
#[derive(Clone)]
pub struct SamplerSources {
    /// CPU/메모리
    pub load: Arc<dyn LoadSource>,
    /// 누적 네트워크 카운터
    pub counters: Arc<dyn CounterSource>,
    /// GPU 통계 (시작 시 판별, 없으면 None)
    pub gpu: Option<Arc<dyn GpuProvider>>,
    /// 연결 상태 확인
    pub probe: Arc<dyn ConnectivityProbe>,
}

/// 샘플링 루프 제어기
///
/// `start()`/`stop()`은 멱등이다. 실행 중 `start()`와 종료 후 `stop()`은 아무 일도 하지 않는다.
pub struct Sampler {
    state: Mutex<SamplerState>,
    pending: Mutex<Option<SamplerLoop>>,
    handle: Mutex<Option<JoinHandle<()>>>,
    shutdown_tx: watch::Sender<bool>,
    reader: SnapshotReader,
}

impl Sampler {
    /// 새 샘플러 생성 (Idle)
    pub fn new(sources: SamplerSources, interval: Duration) -> Self {
        let (publisher, reader) = handoff::channel();
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            state: Mutex::new(SamplerState::Idle),
            pending: Mutex::new(Some(SamplerLoop::new(sources, publisher, interval))),
            handle: Mutex::new(None),
            shutdown_tx,
            reader,
        }
    }

    /// 블로킹 측정 대기 한도 지정 (시작 전에만 적용)
    pub fn with_read_timeout(self, read_timeout: Duration) -> Self {
        if let Some(sampler_loop) = self.pending.lock().as_mut() {
            sampler_loop.read_timeout = read_timeout;
        }
        self
    }

    /// 현재 상태
    pub fn state(&self) -> SamplerState {
        *self.state.lock()
    }

    /// 백그라운드 루프 시작
    ///
    /// 현재 스레드에 tokio 런타임이 없으면 에러.
    pub fn start(&self) -> Result<(), CoreError> {
        let mut state = self.state.lock();
        if *state != SamplerState::Idle {
            debug!("샘플러 시작 무시: 현재 상태 {:?}", *state);
            return Ok(());
        }

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| CoreError::Internal(format!("tokio 런타임 없음: {e}")))?;
        let sampler_loop = self
            .pending
            .lock()
            .take()
            .ok_or_else(|| CoreError::Internal("샘플링 루프가 이미 소비됨".to_string()))?;

        let shutdown_rx = self.shutdown_tx.subscribe();
        *self.handle.lock() = Some(runtime.spawn(sampler_loop.run(shutdown_rx)));
        *state = SamplerState::Running;
        Ok(())
    }

    /// 종료 요청 (다음 틱 경계에서 루프 종료)
    pub fn stop(&self) {
        let mut state = self.state.lock();
        match *state {
            SamplerState::Stopped => {}
            SamplerState::Idle => {
                self.pending.lock().take();
                *state = SamplerState::Stopped;
                debug!("시작 전 샘플러 종료");
            }
            SamplerState::Running => {
                self.shutdown_tx.send_replace(true);
                *state = SamplerState::Stopped;
                info!("샘플러 종료 요청");
            }
        }
    }

    /// 종료 요청 후 최대 `grace`만큼 루프 종료 대기
    ///
    /// 기한 안에 끝나면 true. 진행 중인 틱은 강제로 중단하지 않는다.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        self.stop();

        let Some(handle) = self.handle.lock().take() else {
            return true;
        };
        match tokio::time::timeout(grace, handle).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                error!("샘플링 루프 비정상 종료: {e}");
                true
            }
            Err(_) => {
                warn!("샘플링 루프가 {grace:?} 안에 끝나지 않음 (진행 중인 틱 완료 후 종료)");
                false
            }
        }
    }

    /// 가장 최근 게시된 스냅샷 (블로킹 없음)
    pub fn latest(&self) -> Arc<Snapshot> {
        self.reader.latest()
    }

    /// 게시 알림을 받을 새 읽기 측
    pub fn subscribe(&self) -> SnapshotReader {
        self.reader.clone()
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.shutdown_tx.send_replace(true);
    }
}

/// 로컬(블로킹) 측정 결과
struct LocalReadings {
    counters: Result<CounterSample, CoreError>,
    load: Result<LoadReading, CoreError>,
}

/// 기한이 있는 블로킹 측정
///
/// 기한을 넘긴 작업은 보관했다가 다음 호출에서 새로 띄우지 않고 이어서 기다린다.
struct BoundedRead<T> {
    label: &'static str,
    pending: Option<JoinHandle<T>>,
}

impl<T: Send + 'static> BoundedRead<T> {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            pending: None,
        }
    }

    /// 측정 실행. 실패 사유(기한 초과, 패닉)는 문자열로 반환.
    async fn run<F>(&mut self, limit: Duration, read: F) -> Result<T, String>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let mut task = match self.pending.take() {
            Some(task) => {
                debug!("{} 측정: 이전 작업 대기 계속", self.label);
                task
            }
            None => tokio::task::spawn_blocking(read),
        };

        match tokio::time::timeout(limit, &mut task).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) if e.is_panic() => {
                let reason = panic_message(e.into_panic().as_ref());
                error!("{} 측정 패닉: {reason}", self.label);
                Err(reason)
            }
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => {
                warn!("{} 측정이 {limit:?} 안에 끝나지 않음", self.label);
                self.pending = Some(task);
                Err(READ_TIMED_OUT.to_string())
            }
        }
    }
}

/// 루프 본체. 게시 측과 직전 카운터 샘플을 단독 소유한다.
struct SamplerLoop {
    sources: SamplerSources,
    publisher: SnapshotPublisher,
    interval: Duration,
    read_timeout: Duration,
    local_read: BoundedRead<LocalReadings>,
    gpu_read: BoundedRead<GpuReading>,
    rate: RateCalculator,
    last_sample: Option<CounterSample>,
    last_performance: PerformanceSnapshot,
    sequence: u64,
}

impl SamplerLoop {
    fn new(sources: SamplerSources, publisher: SnapshotPublisher, interval: Duration) -> Self {
        Self {
            sources,
            publisher,
            interval,
            read_timeout: DEFAULT_READ_TIMEOUT,
            local_read: BoundedRead::new("로컬"),
            gpu_read: BoundedRead::new("GPU"),
            rate: RateCalculator::new(),
            last_sample: None,
            last_performance: PerformanceSnapshot::zero(),
            sequence: 0,
        }
    }

    async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) {
        info!("샘플링 루프 시작: 주기 {}ms", self.interval.as_millis());

        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            self.sequence += 1;
            let outcome = AssertUnwindSafe(self.tick()).catch_unwind().await;
            let (snapshot, sample) = match outcome {
                Ok(result) => result,
                Err(payload) => {
                    let reason = panic_message(payload.as_ref());
                    error!("샘플링 틱 패닉 (#{}): {reason}", self.sequence);
                    (self.degraded_snapshot(reason), None)
                }
            };

            self.last_performance = snapshot.performance.clone();
            self.publisher.publish(snapshot);
            if let Some(sample) = sample {
                self.last_sample = Some(sample);
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("샘플링 루프 종료 (게시 {}회)", self.sequence);
    }

    /// 한 틱: 로컬 측정과 연결 확인을 동시에 수행하고 스냅샷 조립
    ///
    /// 게시는 호출자가 한다. 반환된 카운터 샘플은 게시 후 보관한다.
    async fn tick(&mut self) -> (Snapshot, Option<CounterSample>) {
        let limit = self.read_timeout;
        let sources = self.sources.clone();
        let gpu = self.sources.gpu.clone();
        let (local, gpu, connectivity) = tokio::join!(
            self.local_read.run(limit, move || collect_local(&sources)),
            self.gpu_read.run(limit, move || read_gpu(gpu.as_deref())),
            self.sources.probe.probe(),
        );

        let mut degraded = Vec::new();

        let gpu = gpu.unwrap_or_else(|reason| {
            degraded.push(format!("gpu: {reason}"));
            GpuReading::Unavailable(Unavailable::Failed(reason))
        });

        let local = match local {
            Ok(local) => local,
            Err(reason) => {
                let mut snapshot = self.degraded_snapshot(reason);
                snapshot.connectivity = connectivity;
                snapshot.performance.gpu = gpu;
                snapshot.performance.degraded.extend(degraded);
                return (snapshot, None);
            }
        };

        let (throughput, sample) = match local.counters {
            Ok(current) => {
                let rate = match &self.last_sample {
                    Some(previous) => self.rate.update(previous, &current),
                    None => self.rate.last_rate(),
                };
                (rate, Some(current))
            }
            Err(e) => {
                warn!("네트워크 카운터 읽기 실패: {e}");
                degraded.push(format!("network: {e}"));
                (self.rate.last_rate(), None)
            }
        };

        let load = local.load.unwrap_or_else(|e| {
            warn!("CPU/메모리 읽기 실패: {e}");
            degraded.push(format!("load: {e}"));
            LoadReading {
                cpu_percent: 0.0,
                memory_used_bytes: 0,
                memory_total_bytes: 0,
            }
        });

        let performance = PerformanceSnapshot {
            cpu_percent: load.cpu_percent,
            memory_percent: load.memory_percent(),
            memory_used_bytes: load.memory_used_bytes,
            memory_total_bytes: load.memory_total_bytes,
            throughput,
            gpu,
            degraded,
        };

        let snapshot = Snapshot {
            performance,
            connectivity,
            timestamp: Utc::now(),
            sequence: self.sequence,
        };
        debug!(
            "틱 #{}: CPU {:.1}%, {}, {}",
            snapshot.sequence,
            snapshot.performance.cpu_percent,
            snapshot.performance.throughput,
            snapshot.connectivity
        );
        (snapshot, sample)
    }

    /// 직전 성능 지표에 실패 사유를 붙인 스냅샷
    fn degraded_snapshot(&self, reason: String) -> Snapshot {
        let mut performance = self.last_performance.clone();
        performance.degraded = vec![format!("tick: {reason}")];
        Snapshot {
            performance,
            connectivity: ConnectivityStatus::Unknown("tick failed".to_string()),
            timestamp: Utc::now(),
            sequence: self.sequence,
        }
    }
}

fn collect_local(sources: &SamplerSources) -> LocalReadings {
    LocalReadings {
        counters: sources.counters.sample(),
        load: sources.load.read_load(),
    }
}

/// GPU 통계 읽기. 제공자가 없으면 MissingProvider.
fn read_gpu(provider: Option<&dyn GpuProvider>) -> GpuReading {
    let Some(provider) = provider else {
        return GpuReading::Unavailable(Unavailable::MissingProvider);
    };
    match provider.stats() {
        Ok(Some(stats)) => GpuReading::Available(stats),
        Ok(None) => GpuReading::Unavailable(Unavailable::NotDetected),
        Err(e) => {
            debug!("{} 통계 조회 실패: {e}", provider.name());
            GpuReading::Unavailable(Unavailable::Failed(e.to_string()))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devperf_core::models::system::GpuStats;

    struct FailingGpu;

    impl GpuProvider for FailingGpu {
        fn name(&self) -> &str {
            "failing"
        }

        fn gpu_name(&self) -> Result<Option<String>, CoreError> {
            Ok(None)
        }

        fn stats(&self) -> Result<Option<GpuStats>, CoreError> {
            Err(CoreError::provider("failing", "driver mismatch"))
        }
    }

    struct NoDeviceGpu;

    impl GpuProvider for NoDeviceGpu {
        fn name(&self) -> &str {
            "empty"
        }

        fn gpu_name(&self) -> Result<Option<String>, CoreError> {
            Ok(None)
        }

        fn stats(&self) -> Result<Option<GpuStats>, CoreError> {
            Ok(None)
        }
    }

    #[test]
    fn gpu_reading_states() {
        assert_eq!(
            read_gpu(None),
            GpuReading::Unavailable(Unavailable::MissingProvider)
        );
        assert_eq!(
            read_gpu(Some(&NoDeviceGpu as &dyn GpuProvider)),
            GpuReading::Unavailable(Unavailable::NotDetected)
        );
        match read_gpu(Some(&FailingGpu as &dyn GpuProvider)) {
            GpuReading::Unavailable(Unavailable::Failed(reason)) => {
                assert!(reason.contains("driver mismatch"))
            }
            other => panic!("unexpected reading: {other:?}"),
        }
    }

    #[test]
    fn panic_payloads() {
        let static_str: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(static_str.as_ref()), "boom");

        let owned: Box<dyn Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(panic_message(owned.as_ref()), "owned boom");

        let other: Box<dyn Any + Send> = Box::new(42u32);
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }
}
