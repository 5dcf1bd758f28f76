//! 값-또는-사유 모델.
//!
//! 선택적 제공자 부재, 일시적 환경 실패를 타입으로 표현한다.
//! 표시 계층은 사용 불가 값을 `N/A (사유)` 형태로 렌더링한다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 사용 불가 사유
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Unavailable {
    /// 선택적 제공자가 설치되어 있지 않음 (설계상 부재)
    MissingProvider,
    /// 제공자는 있으나 대상 장치를 찾지 못함
    NotDetected,
    /// 네트워크가 없는 것으로 보임
    Offline,
    /// 단일 호출 실패 (권한, 타임아웃, 전송 오류 등)
    Failed(String),
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailable::MissingProvider => write!(f, "unavailable, requires optional provider"),
            Unavailable::NotDetected => write!(f, "not detected"),
            Unavailable::Offline => write!(f, "unavailable (offline?)"),
            Unavailable::Failed(reason) => write!(f, "error: {reason}"),
        }
    }
}

/// 문자열 식별 필드
///
/// 해석 품질까지 함께 보존한다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum InfoField {
    /// 정상 해석됨
    Known(String),
    /// 폴백 경로로 얻은 제한된 정보
    Limited(String),
    /// 사용 불가
    Unavailable(Unavailable),
}

impl InfoField {
    /// 값 문자열 (사용 불가면 None)
    pub fn value(&self) -> Option<&str> {
        match self {
            InfoField::Known(v) | InfoField::Limited(v) => Some(v),
            InfoField::Unavailable(_) => None,
        }
    }

    /// 사용 불가 사유 (사용 가능하면 None)
    pub fn reason(&self) -> Option<&Unavailable> {
        match self {
            InfoField::Unavailable(reason) => Some(reason),
            _ => None,
        }
    }

    /// 제한된 정보 여부
    pub fn is_limited(&self) -> bool {
        matches!(self, InfoField::Limited(_))
    }
}

impl fmt::Display for InfoField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfoField::Known(v) => write!(f, "{v}"),
            InfoField::Limited(v) => write!(f, "{v} (limited info)"),
            InfoField::Unavailable(reason) => write!(f, "N/A ({reason})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        assert_eq!(InfoField::Known("ThinkPad".into()).to_string(), "ThinkPad");
        assert_eq!(
            InfoField::Limited("x86_64".into()).to_string(),
            "x86_64 (limited info)"
        );
        assert_eq!(
            InfoField::Unavailable(Unavailable::MissingProvider).to_string(),
            "N/A (unavailable, requires optional provider)"
        );
        assert_eq!(
            InfoField::Unavailable(Unavailable::Failed("timeout".into())).to_string(),
            "N/A (error: timeout)"
        );
    }

    #[test]
    fn accessors() {
        let limited = InfoField::Limited("aarch64".into());
        assert!(limited.is_limited());
        assert_eq!(limited.value(), Some("aarch64"));
        assert!(limited.reason().is_none());

        let missing = InfoField::Unavailable(Unavailable::Offline);
        assert_eq!(missing.value(), None);
        assert_eq!(missing.reason(), Some(&Unavailable::Offline));
    }
}
