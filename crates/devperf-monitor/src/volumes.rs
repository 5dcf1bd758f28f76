//! 파일시스템 마운트 열거.
//!
//! `VolumeSource` 포트 구현. sysinfo 디스크 목록 + 마운트 지점 접근 확인.

use devperf_core::error::CoreError;
use devperf_core::ports::host::{VolumeEntry, VolumeSource, VolumeSpace};
use std::io;
use sysinfo::Disks;
use tracing::debug;

/// sysinfo 기반 볼륨 소스
///
/// 목록을 열거할 때 용량을 항목에 함께 담는다. 호출 사이에 공유하는 상태는 없다.
#[derive(Debug, Default)]
pub struct SysInfoVolumes;

impl SysInfoVolumes {
    /// 새 볼륨 소스 생성
    pub fn new() -> Self {
        Self
    }
}

impl VolumeSource for SysInfoVolumes {
    fn list_volumes(&self) -> Result<Vec<VolumeEntry>, CoreError> {
        let disks = Disks::new_with_refreshed_list();

        let entries = disks
            .list()
            .iter()
            .map(|disk| VolumeEntry {
                device: disk.name().to_string_lossy().to_string(),
                mountpoint: disk.mount_point().to_string_lossy().to_string(),
                fs_type: disk.file_system().to_string_lossy().to_string(),
                space: Some(VolumeSpace {
                    total_bytes: disk.total_space(),
                    available_bytes: disk.available_space(),
                }),
            })
            .collect::<Vec<_>>();

        debug!("볼륨 {}개 열거", entries.len());
        Ok(entries)
    }

    fn read_usage(&self, volume: &VolumeEntry) -> io::Result<VolumeSpace> {
        // statvfs와 같은 경로 해석만 한다. 마운트 지점의 읽기 권한은 필요 없음
        std::fs::metadata(&volume.mountpoint)?;

        volume.space.ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("용량 정보 없음: {}", volume.mountpoint),
            )
        })
    }
}
