//! 호스트 식별 정보 모델.
//!
//! 시작 시 한 번 해석되며 프로세스 수명 동안 변경되지 않는다.

use serde::{Deserialize, Serialize};

use super::availability::InfoField;

/// 호스트 식별 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityInfo {
    /// 기기 모델명
    pub model_name: InfoField,
    /// GPU 이름
    pub gpu_name: InfoField,
    /// 로컬 IP 주소
    pub ip_address: InfoField,
    /// MAC 주소 (AA:BB:CC:DD:EE:FF)
    pub mac_address: InfoField,
    /// 운영체제 표시 문자열
    pub os_label: InfoField,
}

/// MAC 주소 바이트를 대문자 콜론 구분 문자열로 변환
pub fn format_mac(bytes: &[u8; 6]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// 전부 0인 MAC 주소인지 확인 (노드 식별자 조회 실패 표식)
pub fn is_zero_mac(bytes: &[u8; 6]) -> bool {
    bytes.iter().all(|b| *b == 0)
}
