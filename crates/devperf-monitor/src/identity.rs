//! 호스트 식별 정보 해석.
//!
//! 시작 시 한 번 동기적으로 실행된다. 필드마다 독립적으로 폴백 경로를 따르므로
//! 한 필드의 실패가 다른 필드 해석을 막지 않는다.
//!
//! ## 폴백 순서
//! - 모델명: 인벤토리 제공자 → 아키텍처 문자열 (limited info)
//! - GPU 이름: 인벤토리 제공자 → GPU 통계 제공자 → 사용 불가
//! - IP: UDP connect 로컬 주소 → 호스트 이름 해석 → 사용 불가 (offline?)
//! - MAC: 노드 식별자, 전부 0이면 사용 불가

use devperf_core::models::availability::{InfoField, Unavailable};
use devperf_core::models::identity::{format_mac, is_zero_mac, IdentityInfo};
use devperf_core::ports::host::HostInfoSource;
use devperf_core::ports::provider::Capabilities;
use std::net::SocketAddr;
use tracing::{debug, info, warn};

/// 식별 정보 해석기
pub struct IdentityResolver<'a> {
    capabilities: &'a Capabilities,
    host: &'a dyn HostInfoSource,
    udp_probe_target: SocketAddr,
    arch: String,
}

impl<'a> IdentityResolver<'a> {
    /// 새 해석기 생성
    pub fn new(
        capabilities: &'a Capabilities,
        host: &'a dyn HostInfoSource,
        udp_probe_target: SocketAddr,
    ) -> Self {
        Self {
            capabilities,
            host,
            udp_probe_target,
            arch: std::env::consts::ARCH.to_string(),
        }
    }

    /// 폴백 아키텍처 문자열 지정
    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }

    /// 전체 식별 정보 해석
    pub fn resolve(&self) -> IdentityInfo {
        let identity = IdentityInfo {
            model_name: self.model_name(),
            gpu_name: self.gpu_name(),
            ip_address: self.ip_address(),
            mac_address: self.mac_address(),
            os_label: self.os_label(),
        };

        info!(
            "식별 정보: 모델={}, GPU={}, IP={}, MAC={}, OS={}",
            identity.model_name,
            identity.gpu_name,
            identity.ip_address,
            identity.mac_address,
            identity.os_label
        );
        identity
    }

    fn model_name(&self) -> InfoField {
        if let Some(inventory) = &self.capabilities.inventory {
            match inventory.model_name() {
                Ok(model) if !model.trim().is_empty() => {
                    return InfoField::Known(model.trim().to_string())
                }
                Ok(_) => debug!("{}: 모델명 비어 있음", inventory.name()),
                Err(e) => warn!("{} 모델명 조회 실패: {e}", inventory.name()),
            }
        }
        InfoField::Limited(self.arch.clone())
    }

    fn gpu_name(&self) -> InfoField {
        // 인벤토리 단계의 결과는 GPU 제공자가 없을 때의 최종 사유가 된다
        let mut fallback = InfoField::Unavailable(Unavailable::MissingProvider);

        if let Some(inventory) = self
            .capabilities
            .inventory
            .as_ref()
            .filter(|inventory| inventory.supports_gpu_name())
        {
            match inventory.gpu_name() {
                Ok(Some(name)) if !name.trim().is_empty() => {
                    return InfoField::Known(name.trim().to_string())
                }
                Ok(_) => fallback = InfoField::Unavailable(Unavailable::NotDetected),
                Err(e) => {
                    warn!("{} GPU 이름 조회 실패: {e}", inventory.name());
                    fallback = InfoField::Unavailable(Unavailable::Failed(e.to_string()));
                }
            }
        }

        let Some(gpu) = &self.capabilities.gpu else {
            return fallback;
        };
        match gpu.gpu_name() {
            Ok(Some(name)) if !name.trim().is_empty() => InfoField::Known(name.trim().to_string()),
            Ok(_) => InfoField::Unavailable(Unavailable::NotDetected),
            Err(e) => {
                warn!("{} GPU 이름 조회 실패: {e}", gpu.name());
                InfoField::Unavailable(Unavailable::Failed(e.to_string()))
            }
        }
    }

    fn ip_address(&self) -> InfoField {
        match self.host.outbound_ip(self.udp_probe_target) {
            Ok(ip) => return InfoField::Known(ip.to_string()),
            Err(e) => debug!("UDP 경로 기반 IP 조회 실패, 호스트 이름으로 재시도: {e}"),
        }
        match self.host.hostname_ip() {
            Ok(ip) => InfoField::Known(ip.to_string()),
            Err(e) => {
                warn!("IP 주소 조회 실패: {e}");
                InfoField::Unavailable(Unavailable::Offline)
            }
        }
    }

    fn mac_address(&self) -> InfoField {
        match self.host.node_mac() {
            Ok(mac) if is_zero_mac(&mac) => InfoField::Unavailable(Unavailable::NotDetected),
            Ok(mac) => InfoField::Known(format_mac(&mac)),
            Err(e) => {
                warn!("MAC 주소 조회 실패: {e}");
                InfoField::Unavailable(Unavailable::Failed(e.to_string()))
            }
        }
    }

    fn os_label(&self) -> InfoField {
        match self.host.os_label() {
            Some(label) if !label.trim().is_empty() => InfoField::Known(label),
            _ => InfoField::Unavailable(Unavailable::NotDetected),
        }
    }
}
