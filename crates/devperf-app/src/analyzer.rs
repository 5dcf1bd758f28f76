//! 성능 분석기 파사드.
//!
//! 외부 표시 계층이 쓰는 유일한 진입점.
//! 생성 시 선택적 제공자 판별, 식별 정보 해석, 첫 볼륨 열거를 한 번 수행하고
//! 이후에는 샘플링 루프가 게시하는 최신 스냅샷을 돌려준다.

use devperf_core::config::AppConfig;
use devperf_core::error::CoreError;
use devperf_core::handoff::SnapshotReader;
use devperf_core::models::identity::IdentityInfo;
use devperf_core::models::storage::VolumeUsage;
use devperf_core::models::system::Snapshot;
use devperf_core::ports::connectivity::ConnectivityProbe;
use devperf_core::ports::host::{CounterSource, HostInfoSource, LoadSource, VolumeSource};
use devperf_core::ports::provider::Capabilities;
use devperf_monitor::capabilities::detect_capabilities;
use devperf_monitor::host::SystemHostInfo;
use devperf_monitor::identity::IdentityResolver;
use devperf_monitor::storage::StorageEnumerator;
use devperf_monitor::system::{SysInfoCounters, SysInfoLoad};
use devperf_monitor::volumes::SysInfoVolumes;
use devperf_network::connectivity::HttpConnectivityProbe;
use parking_lot::RwLock;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::sampler::{Sampler, SamplerSources, SamplerState};

/// 분석기 구성 요소
///
/// 실제 어댑터 대신 가짜 구현을 주입할 때 사용한다.
pub struct AnalyzerParts {
    /// 시작 시 판별된 선택적 제공자
    pub capabilities: Capabilities,
    /// 호스트 주소/OS 정보
    pub host: Arc<dyn HostInfoSource>,
    /// 마운트 열거
    pub volumes: Arc<dyn VolumeSource>,
    /// CPU/메모리
    pub load: Arc<dyn LoadSource>,
    /// 누적 네트워크 카운터
    pub counters: Arc<dyn CounterSource>,
    /// 연결 상태 확인
    pub probe: Arc<dyn ConnectivityProbe>,
    /// 로컬 IP 판별용 UDP connect 대상
    pub udp_probe_target: SocketAddr,
    /// 샘플링 주기
    pub interval: Duration,
    /// 틱 안의 블로킹 측정 대기 한도
    pub read_timeout: Duration,
    /// 종료 대기 한도
    pub stop_grace: Duration,
    /// 가상 마운트 포함 여부
    pub include_virtual_volumes: bool,
}

/// 성능 분석기
pub struct PerformanceAnalyzer {
    sampler: Sampler,
    identity: IdentityInfo,
    storage: StorageEnumerator,
    volumes: RwLock<Result<Vec<VolumeUsage>, String>>,
    stop_grace: Duration,
}

impl std::fmt::Debug for PerformanceAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerformanceAnalyzer")
            .field("identity", &self.identity)
            .field("stop_grace", &self.stop_grace)
            .finish_non_exhaustive()
    }
}

impl PerformanceAnalyzer {
    /// 설정으로 실제 어댑터를 조립해 생성
    ///
    /// 외부 명령 실행과 파일시스템 열거를 포함하므로 async 컨텍스트에서는
    /// `spawn_blocking` 안에서 호출한다.
    pub fn new(config: &AppConfig) -> Result<Self, CoreError> {
        config.validate()?;

        let parts = AnalyzerParts {
            capabilities: detect_capabilities(&config.gpu),
            host: Arc::new(SystemHostInfo::new()),
            volumes: Arc::new(SysInfoVolumes::new()),
            load: Arc::new(SysInfoLoad::new()),
            counters: Arc::new(SysInfoCounters::new()),
            probe: Arc::new(HttpConnectivityProbe::new(&config.connectivity)),
            udp_probe_target: config.udp_probe_target()?,
            interval: config.sample_interval(),
            read_timeout: config.read_timeout(),
            stop_grace: config.stop_grace(),
            include_virtual_volumes: config.storage.include_virtual,
        };
        Ok(Self::from_parts(parts))
    }

    /// 구성 요소로 생성
    pub fn from_parts(parts: AnalyzerParts) -> Self {
        let identity = IdentityResolver::new(
            &parts.capabilities,
            parts.host.as_ref(),
            parts.udp_probe_target,
        )
        .resolve();

        let storage = StorageEnumerator::new(parts.volumes)
            .with_include_virtual(parts.include_virtual_volumes);
        let volumes = storage.enumerate().map_err(|e| {
            warn!("초기 볼륨 열거 실패: {e}");
            e.to_string()
        });

        let sampler = Sampler::new(
            SamplerSources {
                load: parts.load,
                counters: parts.counters,
                gpu: parts.capabilities.gpu.clone(),
                probe: parts.probe,
            },
            parts.interval,
        )
        .with_read_timeout(parts.read_timeout);

        Self {
            sampler,
            identity,
            storage,
            volumes: RwLock::new(volumes),
            stop_grace: parts.stop_grace,
        }
    }

    /// 샘플링 시작 (실행 중이면 무시)
    pub fn start(&self) -> Result<(), CoreError> {
        self.sampler.start()
    }

    /// 샘플링 종료 요청 (종료 후 재호출은 무시)
    pub fn stop(&self) {
        self.sampler.stop();
    }

    /// 종료 요청 후 설정된 한도 안에서 루프 종료 대기
    pub async fn shutdown(&self) -> bool {
        let finished = self.sampler.shutdown(self.stop_grace).await;
        info!("분석기 종료 (루프 종료 확인: {finished})");
        finished
    }

    /// 샘플링 루프 상태
    pub fn state(&self) -> SamplerState {
        self.sampler.state()
    }

    /// 가장 최근 게시된 스냅샷 (첫 틱 전에는 초기 스냅샷)
    pub fn latest_snapshot(&self) -> Arc<Snapshot> {
        self.sampler.latest()
    }

    /// 게시 알림 수신용 읽기 측
    pub fn subscribe(&self) -> SnapshotReader {
        self.sampler.subscribe()
    }

    /// 시작 시 해석된 식별 정보
    pub fn identity(&self) -> &IdentityInfo {
        &self.identity
    }

    /// 볼륨 목록 재열거 (샘플링 주기와 무관)
    ///
    /// 목록 자체를 얻지 못하면 에러, 이 경우 마지막 성공 결과는 유지된다.
    pub fn refresh_volumes(&self) -> Result<Vec<VolumeUsage>, CoreError> {
        match self.storage.enumerate() {
            Ok(volumes) => {
                *self.volumes.write() = Ok(volumes.clone());
                Ok(volumes)
            }
            Err(e) => {
                let mut cached = self.volumes.write();
                if cached.is_err() {
                    *cached = Err(e.to_string());
                }
                Err(e)
            }
        }
    }

    /// 마지막으로 열거된 볼륨 목록
    ///
    /// 한 번도 열거에 성공하지 못했으면 마지막 실패 사유. 빈 목록과 구분된다.
    pub fn volumes(&self) -> Result<Vec<VolumeUsage>, String> {
        self.volumes.read().clone()
    }
}
