//! 호스트 주소/OS 정보 조회.
//!
//! `HostInfoSource` 포트 구현. std::net 소켓 + sysinfo.

use devperf_core::error::CoreError;
use devperf_core::ports::host::HostInfoSource;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use sysinfo::{Networks, System};
use tracing::debug;

/// 루프백 인터페이스 이름
const LOOPBACK_NAMES: &[&str] = &["lo", "lo0"];

/// 실제 호스트 정보 소스
#[derive(Debug, Default)]
pub struct SystemHostInfo;

impl SystemHostInfo {
    /// 새 호스트 정보 소스 생성
    pub fn new() -> Self {
        Self
    }
}

impl HostInfoSource for SystemHostInfo {
    fn outbound_ip(&self, target: SocketAddr) -> Result<IpAddr, CoreError> {
        let bind_addr = if target.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        // UDP connect는 라우팅 테이블만 조회하고 패킷을 보내지 않는다
        let socket = UdpSocket::bind(bind_addr)
            .map_err(|e| CoreError::Network(format!("UDP 소켓 생성 실패: {e}")))?;
        socket
            .connect(target)
            .map_err(|e| CoreError::Network(format!("UDP connect 실패 ({target}): {e}")))?;
        let ip = socket
            .local_addr()
            .map_err(|e| CoreError::Network(format!("로컬 주소 조회 실패: {e}")))?
            .ip();

        if ip.is_unspecified() {
            return Err(CoreError::Network("바인딩된 로컬 주소 없음".to_string()));
        }
        debug!("UDP 경로 기반 로컬 IP: {ip}");
        Ok(ip)
    }

    fn hostname_ip(&self) -> Result<IpAddr, CoreError> {
        let host = System::host_name()
            .ok_or_else(|| CoreError::Network("호스트 이름 조회 실패".to_string()))?;

        let addrs: Vec<IpAddr> = (host.as_str(), 0)
            .to_socket_addrs()
            .map_err(|e| CoreError::Network(format!("호스트 이름 해석 실패 ({host}): {e}")))?
            .map(|addr| addr.ip())
            .collect();

        addrs
            .iter()
            .find(|ip| ip.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(|| CoreError::Network(format!("호스트 이름에 주소 없음: {host}")))
    }

    fn node_mac(&self) -> Result<[u8; 6], CoreError> {
        let networks = Networks::new_with_refreshed_list();
        let mut candidates: Vec<(&String, [u8; 6])> = networks
            .list()
            .iter()
            .filter(|(name, _)| !LOOPBACK_NAMES.contains(&name.as_str()))
            .map(|(name, data)| (name, data.mac_address().0))
            .filter(|(_, mac)| mac.iter().any(|b| *b != 0))
            .collect();
        candidates.sort_by(|a, b| a.0.cmp(b.0));

        // 후보가 없으면 0 MAC을 그대로 돌려주고 판단은 호출자에게 맡긴다
        Ok(candidates.first().map(|(_, mac)| *mac).unwrap_or([0; 6]))
    }

    fn os_label(&self) -> Option<String> {
        let name = System::name()?;
        match System::kernel_version() {
            Some(release) => Some(format!("{name} {release}")),
            None => Some(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loopback_target_yields_loopback_ip() {
        let host = SystemHostInfo::new();
        let target = SocketAddr::from((Ipv4Addr::LOCALHOST, 9));
        let ip = host.outbound_ip(target).unwrap();
        assert!(ip.is_loopback());
    }

    #[test]
    fn node_mac_never_panics() {
        let host = SystemHostInfo::new();
        // 인터페이스가 없는 환경이면 0 MAC
        assert!(host.node_mac().is_ok());
    }

    #[test]
    fn os_label_is_not_empty_when_present() {
        let host = SystemHostInfo::new();
        if let Some(label) = host.os_label() {
            assert!(!label.trim().is_empty());
        }
    }
}
