//! DEVPERF 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 포트 구현에서 `CoreError`를 반환한다.
//! 필드 단위 결과는 소비자 경계에서 값-또는-사유 enum으로 변환되므로
//! 이 타입이 틱 밖으로 전파되는 경우는 없다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),

    /// 네트워크 에러 (소켓, 이름 해석)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 선택적 제공자 호출 실패
    #[error("{provider} 제공자 에러: {message}")]
    Provider {
        /// 제공자 이름 (예: "nvidia-smi", "DMI")
        provider: String,
        /// 실패 사유
        message: String,
    },

    /// 볼륨 목록 열거 실패 (개별 볼륨 실패와 구분)
    #[error("볼륨 열거 실패: {0}")]
    Enumeration(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// 제공자 에러 생성 헬퍼
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_message() {
        let err = CoreError::provider("nvidia-smi", "종료 코드 9");
        assert_eq!(err.to_string(), "nvidia-smi 제공자 에러: 종료 코드 9");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
