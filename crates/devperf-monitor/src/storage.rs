//! 저장 볼륨 열거기.
//!
//! 볼륨별로 실패를 격리한다. 한 볼륨의 권한/조회 실패는 해당 항목의 상태로만 기록되고
//! 나머지 볼륨 조회에는 영향을 주지 않는다. 목록 자체를 얻지 못한 경우에만 에러를 반환한다.

use devperf_core::error::CoreError;
use devperf_core::models::storage::VolumeUsage;
use devperf_core::ports::host::VolumeSource;
use std::io::ErrorKind;
use std::sync::Arc;
use tracing::{debug, warn};

/// 저장 볼륨 열거기
#[derive(Clone)]
pub struct StorageEnumerator {
    source: Arc<dyn VolumeSource>,
    include_virtual: bool,
}

impl StorageEnumerator {
    /// 새 열거기 생성 (가상 마운트 제외)
    pub fn new(source: Arc<dyn VolumeSource>) -> Self {
        Self {
            source,
            include_virtual: false,
        }
    }

    /// 파일시스템 타입이 없는 마운트 포함 여부 설정
    pub fn with_include_virtual(mut self, include_virtual: bool) -> Self {
        self.include_virtual = include_virtual;
        self
    }

    /// 볼륨 목록과 볼륨별 사용량 열거
    ///
    /// 호출할 때마다 마운트 목록을 새로 읽는다.
    pub fn enumerate(&self) -> Result<Vec<VolumeUsage>, CoreError> {
        let entries = self.source.list_volumes().map_err(|e| match e {
            CoreError::Enumeration(_) => e,
            other => CoreError::Enumeration(other.to_string()),
        })?;

        let usages: Vec<VolumeUsage> = entries
            .into_iter()
            .filter(|entry| self.include_virtual || !entry.fs_type.trim().is_empty())
            .map(|entry| match self.source.read_usage(&entry) {
                Ok(space) => VolumeUsage::ok(
                    entry.device,
                    entry.mountpoint,
                    space.used_bytes(),
                    space.total_bytes,
                ),
                Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                    debug!("볼륨 접근 거부: {} ({})", entry.device, entry.mountpoint);
                    VolumeUsage::access_denied(entry.device, entry.mountpoint)
                }
                Err(e) => {
                    warn!("볼륨 사용량 조회 실패: {} ({}): {e}", entry.device, entry.mountpoint);
                    VolumeUsage::error(entry.device, entry.mountpoint, e.to_string())
                }
            })
            .collect();

        debug!("볼륨 사용량 {}개 수집", usages.len());
        Ok(usages)
    }
}
