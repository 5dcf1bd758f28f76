//! # devperf-monitor
//!
//! 호스트 모니터링 어댑터.
//! CPU/메모리 사용량, 누적 네트워크 카운터, 저장 볼륨, 호스트 식별 정보를 수집한다.
//! 선택적 제공자(플랫폼 인벤토리, nvidia-smi)는 시작 시 한 번만 판별한다.

pub mod capabilities;
pub mod gpu;
pub mod host;
pub mod identity;
pub mod inventory;
pub mod storage;
pub mod system;
pub mod volumes;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "linux")]
pub mod linux;
