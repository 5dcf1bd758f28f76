//! 애플리케이션 설정 구조체.
//!
//! 샘플링 주기, 연결 확인 대상, 식별 정보 조회 대상, 선택적 제공자 설정을 정의한다.
//! 모든 필드에 기본값이 있으므로 일부만 적힌 설정 파일도 로드된다.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 샘플링 루프 설정
    #[serde(default)]
    pub sampler: SamplerConfig,
    /// 연결 확인 설정
    #[serde(default)]
    pub connectivity: ConnectivityConfig,
    /// 식별 정보 설정
    #[serde(default)]
    pub identity: IdentityConfig,
    /// GPU 통계 제공자 설정
    #[serde(default)]
    pub gpu: GpuConfig,
    /// 저장 볼륨 설정
    #[serde(default)]
    pub storage: StorageConfig,
}

// ============================================================
// 샘플링 설정
// ============================================================

/// 샘플링 루프 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// 틱 작업 종료 후 다음 틱까지 대기 시간 (밀리초)
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// 종료 요청 후 루프 종료 대기 한도 (밀리초)
    #[serde(default = "default_stop_grace_ms")]
    pub stop_grace_ms: u64,
    /// 틱 안의 블로킹 측정(카운터, CPU/메모리, GPU) 대기 한도 (밀리초)
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            stop_grace_ms: default_stop_grace_ms(),
            read_timeout_ms: default_read_timeout_ms(),
        }
    }
}

// ============================================================
// 연결 확인 설정
// ============================================================

/// 연결 확인 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectivityConfig {
    /// 확인 대상 URL
    #[serde(default = "default_connectivity_url")]
    pub url: String,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_connectivity_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            url: default_connectivity_url(),
            timeout_secs: default_connectivity_timeout_secs(),
        }
    }
}

impl ConnectivityConfig {
    /// 요청 타임아웃을 Duration으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============================================================
// 식별 정보 설정
// ============================================================

/// 식별 정보 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// 로컬 IP 판별용 UDP connect 대상 (패킷은 전송하지 않음)
    #[serde(default = "default_udp_probe_target")]
    pub udp_probe_target: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            udp_probe_target: default_udp_probe_target(),
        }
    }
}

// ============================================================
// GPU 설정
// ============================================================

/// GPU 통계 제공자 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpuConfig {
    /// GPU 통계 수집 활성화
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 통계 조회 명령 (nvidia-smi 호환)
    #[serde(default = "default_gpu_command")]
    pub command: String,
}

impl Default for GpuConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: default_gpu_command(),
        }
    }
}

// ============================================================
// 저장 볼륨 설정
// ============================================================

/// 저장 볼륨 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 파일시스템 타입이 없는 가상 마운트도 포함
    #[serde(default)]
    pub include_virtual: bool,
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self::default()
    }

    /// 설정값 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.sampler.interval_ms == 0 {
            return Err(CoreError::Config(
                "sampler.interval_ms는 0보다 커야 합니다".to_string(),
            ));
        }
        if self.sampler.read_timeout_ms == 0 {
            return Err(CoreError::Config(
                "sampler.read_timeout_ms는 0보다 커야 합니다".to_string(),
            ));
        }
        if self.connectivity.timeout_secs == 0 {
            return Err(CoreError::Config(
                "connectivity.timeout_secs는 0보다 커야 합니다".to_string(),
            ));
        }
        if self.connectivity.url.trim().is_empty() {
            return Err(CoreError::Config(
                "connectivity.url이 비어 있습니다".to_string(),
            ));
        }
        self.udp_probe_target()?;
        Ok(())
    }

    /// 샘플링 주기를 Duration으로 반환
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sampler.interval_ms)
    }

    /// 종료 대기 한도를 Duration으로 반환
    pub fn stop_grace(&self) -> Duration {
        Duration::from_millis(self.sampler.stop_grace_ms)
    }

    /// 블로킹 측정 대기 한도를 Duration으로 반환
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.sampler.read_timeout_ms)
    }

    /// 연결 확인 타임아웃을 Duration으로 반환
    pub fn connectivity_timeout(&self) -> Duration {
        self.connectivity.timeout()
    }

    /// UDP connect 대상 주소 파싱
    pub fn udp_probe_target(&self) -> Result<SocketAddr, CoreError> {
        self.identity.udp_probe_target.parse().map_err(|e| {
            CoreError::Config(format!(
                "identity.udp_probe_target 파싱 실패: {}: {e}",
                self.identity.udp_probe_target
            ))
        })
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_true() -> bool {
    true
}

fn default_interval_ms() -> u64 {
    1_000
}
fn default_stop_grace_ms() -> u64 {
    100
}
fn default_read_timeout_ms() -> u64 {
    3_000
}
fn default_connectivity_url() -> String {
    "http://www.google.com".to_string()
}
fn default_connectivity_timeout_secs() -> u64 {
    3
}
fn default_udp_probe_target() -> String {
    "8.8.8.8:80".to_string()
}
fn default_gpu_command() -> String {
    "nvidia-smi".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn defaults_validate() {
        let config = AppConfig::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.sample_interval(), Duration::from_secs(1));
        assert_eq!(config.connectivity_timeout(), Duration::from_secs(3));
        assert_eq!(config.stop_grace(), Duration::from_millis(100));
        assert_eq!(config.read_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "sampler": { "interval_ms": 250 } }"#).unwrap();
        assert_eq!(config.sampler.interval_ms, 250);
        assert_eq!(config.sampler.stop_grace_ms, 100);
        assert_eq!(config.gpu.command, "nvidia-smi");
        assert!(config.gpu.enabled);
    }

    #[test]
    fn zero_interval_rejected() {
        let mut config = AppConfig::default_config();
        config.sampler.interval_ms = 0;
        assert_matches!(config.validate(), Err(CoreError::Config(_)));
    }

    #[test]
    fn zero_read_timeout_rejected() {
        let mut config = AppConfig::default_config();
        config.sampler.read_timeout_ms = 0;
        assert_matches!(config.validate(), Err(CoreError::Config(_)));
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut config = AppConfig::default_config();
        config.connectivity.timeout_secs = 0;
        assert_matches!(config.validate(), Err(CoreError::Config(_)));
    }

    #[test]
    fn empty_url_rejected() {
        let mut config = AppConfig::default_config();
        config.connectivity.url = "  ".to_string();
        assert_matches!(config.validate(), Err(CoreError::Config(_)));
    }

    #[test]
    fn bad_probe_target_rejected() {
        let mut config = AppConfig::default_config();
        config.identity.udp_probe_target = "not-an-address".to_string();
        assert_matches!(config.validate(), Err(CoreError::Config(_)));
    }
}
