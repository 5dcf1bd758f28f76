//! 시스템 리소스 측정.
//!
//! `LoadSource`, `CounterSource` 포트 구현. sysinfo 기반 CPU/메모리/네트워크 카운터 수집.

use devperf_core::error::CoreError;
use devperf_core::models::network::CounterSample;
use devperf_core::ports::host::{CounterSource, LoadReading, LoadSource};
use std::sync::Mutex;
use std::time::Instant;
use sysinfo::{Networks, System};
use tracing::debug;

/// sysinfo 기반 CPU/메모리 측정기
///
/// CPU 사용률은 직전 갱신 대비 값이므로 생성 시 한 번 갱신해 둔다.
pub struct SysInfoLoad {
    sys: Mutex<System>,
}

impl SysInfoLoad {
    /// 새 측정기 생성
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        Self {
            sys: Mutex::new(sys),
        }
    }
}

impl Default for SysInfoLoad {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadSource for SysInfoLoad {
    fn read_load(&self) -> Result<LoadReading, CoreError> {
        let mut sys = self
            .sys
            .lock()
            .map_err(|e| CoreError::Internal(format!("시스템 잠금 실패: {e}")))?;
        sys.refresh_cpu_usage();
        sys.refresh_memory();

        let reading = LoadReading {
            cpu_percent: f64::from(sys.global_cpu_usage()).clamp(0.0, 100.0),
            memory_used_bytes: sys.used_memory(),
            memory_total_bytes: sys.total_memory(),
        };

        debug!(
            "시스템 부하: CPU {:.1}%, 메모리 {}/{}MB",
            reading.cpu_percent,
            reading.memory_used_bytes / 1_048_576,
            reading.memory_total_bytes / 1_048_576
        );
        Ok(reading)
    }
}

/// sysinfo 기반 누적 네트워크 카운터
///
/// 매 샘플마다 인터페이스 목록을 새로 읽어 합산한다.
#[derive(Debug, Default)]
pub struct SysInfoCounters;

impl SysInfoCounters {
    /// 새 카운터 소스 생성
    pub fn new() -> Self {
        Self
    }
}

impl CounterSource for SysInfoCounters {
    fn sample(&self) -> Result<CounterSample, CoreError> {
        let networks = Networks::new_with_refreshed_list();
        let (sent, received) = networks
            .list()
            .values()
            .fold((0u64, 0u64), |(sent, received), data| {
                (
                    sent.saturating_add(data.total_transmitted()),
                    received.saturating_add(data.total_received()),
                )
            });

        Ok(CounterSample::new(sent, received, Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_load_is_in_range() {
        let load = SysInfoLoad::new();
        let reading = load.read_load().unwrap();

        assert!((0.0..=100.0).contains(&reading.cpu_percent));
        assert!(reading.memory_total_bytes > 0);
        assert!(reading.memory_used_bytes <= reading.memory_total_bytes);
    }

    #[test]
    fn counters_are_monotonic_in_time() {
        let counters = SysInfoCounters::new();
        let first = counters.sample().unwrap();
        let second = counters.sample().unwrap();
        assert!(second.timestamp >= first.timestamp);
    }
}
