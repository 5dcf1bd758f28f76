//! 분석기 파사드 통합 테스트.
//!
//! 가짜 호스트/볼륨/제공자로 조립한 뒤 외부 인터페이스 전체를 검증.

use assert_matches::assert_matches;
use async_trait::async_trait;
use devperf_app::analyzer::{AnalyzerParts, PerformanceAnalyzer};
use devperf_app::lifecycle::Lifecycle;
use devperf_app::presenter::render_volumes;
use devperf_app::sampler::SamplerState;
use devperf_core::config::AppConfig;
use devperf_core::config_manager::ConfigManager;
use devperf_core::error::CoreError;
use devperf_core::models::availability::{InfoField, Unavailable};
use devperf_core::models::network::CounterSample;
use devperf_core::models::storage::VolumeStatus;
use devperf_core::models::system::{ConnectivityStatus, GpuReading, GpuStats};
use devperf_core::ports::connectivity::ConnectivityProbe;
use devperf_core::ports::host::{
    CounterSource, HostInfoSource, LoadReading, LoadSource, VolumeEntry, VolumeSource, VolumeSpace,
};
use devperf_core::ports::provider::{Capabilities, GpuProvider};
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

struct OfflineHost;

impl HostInfoSource for OfflineHost {
    fn outbound_ip(&self, _target: SocketAddr) -> Result<IpAddr, CoreError> {
        Err(CoreError::Network("network unreachable".to_string()))
    }

    fn hostname_ip(&self) -> Result<IpAddr, CoreError> {
        Ok(IpAddr::V4(Ipv4Addr::new(127, 0, 1, 1)))
    }

    fn node_mac(&self) -> Result<[u8; 6], CoreError> {
        Ok([0xde, 0xad, 0xbe, 0xef, 0x00, 0x01])
    }

    fn os_label(&self) -> Option<String> {
        Some("TestOS 1.0".to_string())
    }
}

struct SwitchableVolumes {
    broken: AtomicBool,
}

impl VolumeSource for SwitchableVolumes {
    fn list_volumes(&self) -> Result<Vec<VolumeEntry>, CoreError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(CoreError::Enumeration("mount table unreadable".to_string()));
        }
        Ok(vec![
            VolumeEntry {
                device: "/dev/sda1".to_string(),
                mountpoint: "/".to_string(),
                fs_type: "ext4".to_string(),
                space: None,
            },
            VolumeEntry {
                device: "/dev/sdb1".to_string(),
                mountpoint: "/root-only".to_string(),
                fs_type: "ext4".to_string(),
                space: None,
            },
        ])
    }

    fn read_usage(&self, volume: &VolumeEntry) -> io::Result<VolumeSpace> {
        if volume.mountpoint == "/root-only" {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        }
        Ok(VolumeSpace {
            total_bytes: 100,
            available_bytes: 40,
        })
    }
}

struct FixedLoad;

impl LoadSource for FixedLoad {
    fn read_load(&self) -> Result<LoadReading, CoreError> {
        Ok(LoadReading {
            cpu_percent: 50.0,
            memory_used_bytes: 1,
            memory_total_bytes: 2,
        })
    }
}

struct FixedCounters;

impl CounterSource for FixedCounters {
    fn sample(&self) -> Result<CounterSample, CoreError> {
        Ok(CounterSample::new(0, 0, Instant::now()))
    }
}

struct DisconnectedProbe;

#[async_trait]
impl ConnectivityProbe for DisconnectedProbe {
    async fn probe(&self) -> ConnectivityStatus {
        ConnectivityStatus::Disconnected
    }
}

struct FakeGpu;

impl GpuProvider for FakeGpu {
    fn name(&self) -> &str {
        "fake-gpu"
    }

    fn gpu_name(&self) -> Result<Option<String>, CoreError> {
        Ok(Some("Fake RTX".to_string()))
    }

    fn stats(&self) -> Result<Option<GpuStats>, CoreError> {
        Ok(Some(GpuStats {
            load_percent: 10.0,
            memory_used_mb: 100.0,
            memory_total_mb: 1000.0,
        }))
    }
}

fn parts(capabilities: Capabilities, volumes: Arc<SwitchableVolumes>) -> AnalyzerParts {
    AnalyzerParts {
        capabilities,
        host: Arc::new(OfflineHost),
        volumes,
        load: Arc::new(FixedLoad),
        counters: Arc::new(FixedCounters),
        probe: Arc::new(DisconnectedProbe),
        udp_probe_target: "8.8.8.8:80".parse().unwrap(),
        interval: Duration::from_millis(10),
        read_timeout: Duration::from_secs(1),
        stop_grace: Duration::from_millis(500),
        include_virtual_volumes: false,
    }
}

fn healthy_volumes() -> Arc<SwitchableVolumes> {
    Arc::new(SwitchableVolumes {
        broken: AtomicBool::new(false),
    })
}

#[test]
fn identity_without_optional_providers() {
    let analyzer = PerformanceAnalyzer::from_parts(parts(Capabilities::none(), healthy_volumes()));
    let identity = analyzer.identity();

    assert!(identity.model_name.is_limited());
    assert!(identity.model_name.to_string().ends_with("(limited info)"));
    assert_eq!(
        identity.gpu_name,
        InfoField::Unavailable(Unavailable::MissingProvider)
    );
    assert_eq!(identity.ip_address, InfoField::Known("127.0.1.1".to_string()));
    assert_eq!(
        identity.mac_address,
        InfoField::Known("DE:AD:BE:EF:00:01".to_string())
    );
    assert_eq!(identity.os_label, InfoField::Known("TestOS 1.0".to_string()));
}

#[test]
fn volumes_enumerated_at_construction() {
    let analyzer = PerformanceAnalyzer::from_parts(parts(Capabilities::none(), healthy_volumes()));
    let volumes = analyzer.volumes().unwrap();

    assert_eq!(volumes.len(), 2);
    assert_eq!(volumes[0].status, VolumeStatus::Ok);
    assert_eq!(volumes[0].used_bytes, Some(60));
    assert_eq!(volumes[0].percent_used, Some(60.0));
    assert_eq!(volumes[1].status, VolumeStatus::AccessDenied);
}

#[test]
fn refresh_failure_keeps_last_volumes() {
    let volumes = healthy_volumes();
    let analyzer = PerformanceAnalyzer::from_parts(parts(Capabilities::none(), volumes.clone()));

    assert_eq!(analyzer.refresh_volumes().unwrap().len(), 2);

    volumes.broken.store(true, Ordering::SeqCst);
    assert_matches!(analyzer.refresh_volumes(), Err(CoreError::Enumeration(_)));
    assert_eq!(analyzer.volumes().unwrap().len(), 2);
}

#[test]
fn initial_enumeration_failure_is_not_an_empty_list() {
    let volumes = Arc::new(SwitchableVolumes {
        broken: AtomicBool::new(true),
    });
    let analyzer = PerformanceAnalyzer::from_parts(parts(Capabilities::none(), volumes.clone()));

    let reason = analyzer.volumes().unwrap_err();
    assert!(reason.contains("mount table unreadable"));
    assert!(render_volumes(Err(&reason)).starts_with("Storage: error fetching disks:"));

    // 복구되면 목록으로 교체
    volumes.broken.store(false, Ordering::SeqCst);
    assert_eq!(analyzer.refresh_volumes().unwrap().len(), 2);
    assert_eq!(analyzer.volumes().unwrap().len(), 2);
}

#[tokio::test]
async fn latest_snapshot_lifecycle() {
    let capabilities = Capabilities::none().with_gpu(Arc::new(FakeGpu));
    let analyzer = PerformanceAnalyzer::from_parts(parts(capabilities, healthy_volumes()));

    assert_eq!(
        analyzer.identity().gpu_name,
        InfoField::Known("Fake RTX".to_string())
    );
    assert!(analyzer.latest_snapshot().is_initial());

    let mut reader = analyzer.subscribe();
    analyzer.start().unwrap();
    assert_eq!(analyzer.state(), SamplerState::Running);

    let snapshot = tokio::time::timeout(Duration::from_secs(5), reader.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.connectivity, ConnectivityStatus::Disconnected);
    assert_eq!(snapshot.performance.cpu_percent, 50.0);
    assert_eq!(snapshot.performance.memory_percent, 50.0);
    assert_matches!(&snapshot.performance.gpu, GpuReading::Available(stats) if stats.load_percent == 10.0);

    assert!(analyzer.shutdown().await);
    assert_eq!(analyzer.state(), SamplerState::Stopped);
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = AppConfig::default_config();
    config.sampler.interval_ms = 0;
    assert_matches!(PerformanceAnalyzer::new(&config), Err(CoreError::Config(_)));

    let mut config = AppConfig::default_config();
    config.identity.udp_probe_target = "not-an-address".to_string();
    assert_matches!(PerformanceAnalyzer::new(&config), Err(CoreError::Config(_)));
}

#[test]
fn config_file_drives_analyzer_settings() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{ "sampler": { "interval_ms": 250 }, "gpu": { "enabled": false } }"#,
    )
    .unwrap();

    let manager = ConfigManager::with_path(path).unwrap();
    let config = manager.get().unwrap();

    assert_eq!(config.sample_interval(), Duration::from_millis(250));
    assert!(!config.gpu.enabled);
    assert_eq!(config.connectivity.url, "http://www.google.com");
    assert!(config.validate().is_ok());

    let json = serde_json::to_string(&config).unwrap();
    let back: AppConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.sampler.interval_ms, 250);
}

#[tokio::test]
async fn lifecycle_shutdown_stops_renderers_then_sampler() {
    let analyzer = Arc::new(PerformanceAnalyzer::from_parts(parts(
        Capabilities::none(),
        healthy_volumes(),
    )));
    let lifecycle = Lifecycle::new(analyzer.clone());
    let mut render_rx = lifecycle.subscribe();

    let mut reader = analyzer.subscribe();
    analyzer.start().unwrap();
    tokio::time::timeout(Duration::from_secs(5), reader.next())
        .await
        .unwrap()
        .unwrap();

    let renderer = tokio::spawn(async move {
        render_rx.changed().await.unwrap();
        *render_rx.borrow()
    });

    assert!(!lifecycle.is_shutting_down());
    assert!(lifecycle.shutdown().await);
    assert!(lifecycle.is_shutting_down());
    assert!(renderer.await.unwrap());
    assert_eq!(analyzer.state(), SamplerState::Stopped);

    // 반복 호출은 대기만 한다
    assert!(lifecycle.shutdown().await);
}
