//! 저장 볼륨 사용량 모델.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::units::bytes_to_gb;

/// 볼륨 사용량 조회 상태
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum VolumeStatus {
    /// 정상 조회
    Ok,
    /// 권한 부족
    AccessDenied,
    /// 기타 실패
    Error(String),
}

/// 볼륨 하나의 사용량
///
/// 상태가 `Ok`가 아니면 용량 필드는 `None`이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeUsage {
    /// 장치 이름 (예: /dev/nvme0n1p2, C:\)
    pub device: String,
    /// 마운트 지점
    pub mountpoint: String,
    /// 사용 중 바이트
    pub used_bytes: Option<u64>,
    /// 전체 바이트
    pub total_bytes: Option<u64>,
    /// 사용률 (0.0 ~ 100.0)
    pub percent_used: Option<f64>,
    /// 조회 상태
    pub status: VolumeStatus,
}

impl VolumeUsage {
    /// 정상 조회 결과 생성
    pub fn ok(device: String, mountpoint: String, used_bytes: u64, total_bytes: u64) -> Self {
        let percent_used = if total_bytes == 0 {
            0.0
        } else {
            used_bytes as f64 / total_bytes as f64 * 100.0
        };
        Self {
            device,
            mountpoint,
            used_bytes: Some(used_bytes),
            total_bytes: Some(total_bytes),
            percent_used: Some(percent_used),
            status: VolumeStatus::Ok,
        }
    }

    /// 권한 부족 결과 생성
    pub fn access_denied(device: String, mountpoint: String) -> Self {
        Self::failed(device, mountpoint, VolumeStatus::AccessDenied)
    }

    /// 기타 실패 결과 생성
    pub fn error(device: String, mountpoint: String, reason: impl Into<String>) -> Self {
        Self::failed(device, mountpoint, VolumeStatus::Error(reason.into()))
    }

    fn failed(device: String, mountpoint: String, status: VolumeStatus) -> Self {
        Self {
            device,
            mountpoint,
            used_bytes: None,
            total_bytes: None,
            percent_used: None,
            status,
        }
    }
}

impl fmt::Display for VolumeUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.status, self.used_bytes, self.total_bytes, self.percent_used) {
            (VolumeStatus::Ok, Some(used), Some(total), Some(percent)) => write!(
                f,
                "{} ({}): {:.2} GB Used / {:.2} GB Total ({:.1}%)",
                self.device,
                self.mountpoint,
                bytes_to_gb(used),
                bytes_to_gb(total),
                percent
            ),
            (VolumeStatus::AccessDenied, ..) => write!(f, "{} - Access Denied", self.device),
            (VolumeStatus::Error(reason), ..) => write!(f, "{} - Error ({reason})", self.device),
            _ => write!(f, "{} - N/A", self.device),
        }
    }
}
