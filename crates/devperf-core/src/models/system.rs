//! 시스템 성능 스냅샷 모델.
//!
//! CPU, 메모리, 네트워크 전송률, GPU, 연결 상태를 하나의 불변 묶음으로 표현.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::availability::Unavailable;
use super::network::ThroughputRate;
use crate::units::bytes_to_gb;

/// GPU 통계
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuStats {
    /// GPU 사용률 (0.0 ~ 100.0)
    pub load_percent: f64,
    /// 사용 중 VRAM (MB)
    pub memory_used_mb: f64,
    /// 전체 VRAM (MB)
    pub memory_total_mb: f64,
}

impl GpuStats {
    /// VRAM 사용률 (0.0 ~ 100.0)
    pub fn memory_percent(&self) -> f64 {
        if self.memory_total_mb <= 0.0 {
            0.0
        } else {
            self.memory_used_mb / self.memory_total_mb * 100.0
        }
    }
}

/// GPU 측정 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum GpuReading {
    /// 측정 성공
    Available(GpuStats),
    /// 측정 불가
    Unavailable(Unavailable),
    /// 아직 측정하지 않음 (첫 틱 이전)
    Pending,
}

impl GpuReading {
    /// 측정값 (없으면 None)
    pub fn stats(&self) -> Option<&GpuStats> {
        match self {
            GpuReading::Available(stats) => Some(stats),
            GpuReading::Unavailable(_) | GpuReading::Pending => None,
        }
    }
}

impl fmt::Display for GpuReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuReading::Available(s) => write!(
                f,
                "Load: {:.1}% | Memory: {:.1}% ({:.1}/{:.1} MB)",
                s.load_percent,
                s.memory_percent(),
                s.memory_used_mb,
                s.memory_total_mb
            ),
            GpuReading::Unavailable(reason) => write!(f, "Load: N/A ({reason})"),
            GpuReading::Pending => write!(f, "Load: N/A (not sampled yet)"),
        }
    }
}

/// 인터넷 연결 상태
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum ConnectivityStatus {
    /// 연결됨
    Connected,
    /// 연결 끊김 (타임아웃, 연결 거부, 도달 불가)
    Disconnected,
    /// 판별 불가 (로컬 설정 문제 가능성)
    Unknown(String),
}

impl fmt::Display for ConnectivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectivityStatus::Connected => write!(f, "Connected"),
            ConnectivityStatus::Disconnected => write!(f, "Disconnected"),
            ConnectivityStatus::Unknown(reason) => write!(f, "Error ({reason})"),
        }
    }
}

/// 성능 지표 묶음
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    /// CPU 사용률 (0.0 ~ 100.0)
    pub cpu_percent: f64,
    /// 메모리 사용률 (0.0 ~ 100.0)
    pub memory_percent: f64,
    /// 사용 중 메모리 (바이트)
    pub memory_used_bytes: u64,
    /// 전체 메모리 (바이트)
    pub memory_total_bytes: u64,
    /// 네트워크 전송률
    pub throughput: ThroughputRate,
    /// GPU 측정 결과
    pub gpu: GpuReading,
    /// 이번 틱에서 측정하지 못한 항목과 사유
    #[serde(default)]
    pub degraded: Vec<String>,
}

impl PerformanceSnapshot {
    /// 첫 틱 이전의 0 상태
    pub fn zero() -> Self {
        Self {
            cpu_percent: 0.0,
            memory_percent: 0.0,
            memory_used_bytes: 0,
            memory_total_bytes: 0,
            throughput: ThroughputRate::ZERO,
            gpu: GpuReading::Pending,
            degraded: Vec::new(),
        }
    }

    /// 메모리 표시 문자열: `P.P% (U/T GB)`
    pub fn memory_label(&self) -> String {
        format!(
            "{:.1}% ({:.2}/{:.2} GB)",
            self.memory_percent,
            bytes_to_gb(self.memory_used_bytes),
            bytes_to_gb(self.memory_total_bytes)
        )
    }
}

/// 게시 단위 스냅샷
///
/// 샘플러만 생성하며 소비자에게는 읽기 전용이다. 매 게시가 이전 값을 통째로 대체한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// 성능 지표
    pub performance: PerformanceSnapshot,
    /// 연결 상태
    pub connectivity: ConnectivityStatus,
    /// 수집 시각
    pub timestamp: DateTime<Utc>,
    /// 게시 순번 (초기 스냅샷은 0)
    pub sequence: u64,
}

impl Snapshot {
    /// 첫 틱 완료 전 소비자에게 돌려줄 초기 스냅샷
    pub fn initial() -> Self {
        Self {
            performance: PerformanceSnapshot::zero(),
            connectivity: ConnectivityStatus::Unknown("not checked yet".to_string()),
            timestamp: DateTime::<Utc>::default(),
            sequence: 0,
        }
    }

    /// 초기 스냅샷 여부
    pub fn is_initial(&self) -> bool {
        self.sequence == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_snapshot_is_zeroed() {
        let snap = Snapshot::initial();
        assert!(snap.is_initial());
        assert_eq!(snap.performance.cpu_percent, 0.0);
        assert_eq!(snap.performance.memory_total_bytes, 0);
        assert_eq!(snap.performance.throughput, ThroughputRate::ZERO);
        assert_eq!(snap.performance.gpu, GpuReading::Pending);
        assert_eq!(
            snap.performance.gpu.to_string(),
            "Load: N/A (not sampled yet)"
        );
        assert!(matches!(snap.connectivity, ConnectivityStatus::Unknown(_)));
    }

    #[test]
    fn gpu_memory_percent() {
        let stats = GpuStats {
            load_percent: 40.0,
            memory_used_mb: 2048.0,
            memory_total_mb: 8192.0,
        };
        assert_eq!(stats.memory_percent(), 25.0);
        assert_eq!(
            GpuReading::Available(stats).to_string(),
            "Load: 40.0% | Memory: 25.0% (2048.0/8192.0 MB)"
        );
    }

    #[test]
    fn gpu_zero_total_memory() {
        let stats = GpuStats {
            load_percent: 0.0,
            memory_used_mb: 0.0,
            memory_total_mb: 0.0,
        };
        assert_eq!(stats.memory_percent(), 0.0);
    }

    #[test]
    fn connectivity_display() {
        assert_eq!(ConnectivityStatus::Connected.to_string(), "Connected");
        assert_eq!(
            ConnectivityStatus::Unknown("builder".into()).to_string(),
            "Error (builder)"
        );
    }

    #[test]
    fn memory_label_format() {
        let mut perf = PerformanceSnapshot::zero();
        perf.memory_percent = 50.0;
        perf.memory_used_bytes = 8 * 1024 * 1024 * 1024;
        perf.memory_total_bytes = 16 * 1024 * 1024 * 1024;
        assert_eq!(perf.memory_label(), "50.0% (8.00/16.00 GB)");
    }
}
