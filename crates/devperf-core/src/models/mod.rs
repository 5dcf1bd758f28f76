//! DEVPERF 도메인 모델.
//!
//! 샘플러가 생성하고 표시 계층이 소비하는 데이터 구조체를 정의한다.
//! 스냅샷 계열 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod availability;
pub mod identity;
pub mod network;
pub mod storage;
pub mod system;
