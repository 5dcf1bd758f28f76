//! 호스트 데이터 소스 포트.
//!
//! 구현: `devperf-monitor` crate (sysinfo + std::net)

use std::net::{IpAddr, SocketAddr};

use crate::error::CoreError;
use crate::models::network::CounterSample;

/// CPU/메모리 순간 측정값
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadReading {
    /// 전체 CPU 사용률 (0.0 ~ 100.0)
    pub cpu_percent: f64,
    /// 사용 중 메모리 (바이트)
    pub memory_used_bytes: u64,
    /// 전체 메모리 (바이트)
    pub memory_total_bytes: u64,
}

impl LoadReading {
    /// 메모리 사용률 (0.0 ~ 100.0)
    pub fn memory_percent(&self) -> f64 {
        if self.memory_total_bytes == 0 {
            0.0
        } else {
            self.memory_used_bytes as f64 / self.memory_total_bytes as f64 * 100.0
        }
    }
}

/// CPU/메모리 측정 소스
pub trait LoadSource: Send + Sync {
    /// 순간 CPU/메모리 측정
    fn read_load(&self) -> Result<LoadReading, CoreError>;
}

/// 누적 네트워크 카운터 소스
pub trait CounterSource: Send + Sync {
    /// 전체 인터페이스 합산 누적 카운터 샘플
    fn sample(&self) -> Result<CounterSample, CoreError>;
}

/// 마운트된 볼륨 항목
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeEntry {
    /// 장치 이름
    pub device: String,
    /// 마운트 지점
    pub mountpoint: String,
    /// 파일시스템 타입 (가상 마운트는 빈 문자열)
    pub fs_type: String,
    /// 목록 열거 시 함께 읽은 용량 (없으면 None)
    pub space: Option<VolumeSpace>,
}

/// 볼륨 용량
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeSpace {
    /// 전체 바이트
    pub total_bytes: u64,
    /// 사용 가능 바이트
    pub available_bytes: u64,
}

impl VolumeSpace {
    /// 사용 중 바이트
    pub fn used_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.available_bytes)
    }
}

/// 파일시스템 마운트 열거 소스
pub trait VolumeSource: Send + Sync {
    /// 마운트 목록 열거
    fn list_volumes(&self) -> Result<Vec<VolumeEntry>, CoreError>;

    /// 볼륨 하나의 용량 조회
    ///
    /// 권한 부족은 `ErrorKind::PermissionDenied`로 보고한다.
    fn read_usage(&self, volume: &VolumeEntry) -> std::io::Result<VolumeSpace>;
}

/// 호스트 주소/OS 정보 소스
pub trait HostInfoSource: Send + Sync {
    /// `target`으로 UDP connect 시 바인딩되는 로컬 주소 (패킷 전송 없음)
    fn outbound_ip(&self, target: SocketAddr) -> Result<IpAddr, CoreError>;

    /// 호스트 이름 해석으로 얻은 주소
    fn hostname_ip(&self) -> Result<IpAddr, CoreError>;

    /// 플랫폼 노드 식별자 MAC (조회 실패 시 전부 0일 수 있음)
    fn node_mac(&self) -> Result<[u8; 6], CoreError>;

    /// OS 이름과 릴리스 (알 수 없으면 None)
    fn os_label(&self) -> Option<String>;
}
