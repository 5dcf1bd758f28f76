//! # devperf
//!
//! DEVPERF 콘솔 표시기 진입점.
//! 식별 정보와 볼륨 목록을 한 번 출력한 뒤, 자체 표시 주기로 최신 스냅샷을 출력한다.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use devperf_app::analyzer::PerformanceAnalyzer;
use devperf_app::lifecycle::Lifecycle;
use devperf_app::presenter::{render_identity, render_snapshot, render_volumes};
use devperf_core::config::AppConfig;
use devperf_core::config_manager::ConfigManager;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// DEVPERF 호스트 성능 모니터
///
/// CPU/메모리, 네트워크 전송률, GPU, 연결 상태를 주기적으로 표시한다.
#[derive(Parser, Debug)]
#[command(name = "devperf")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 샘플링 간격 (밀리초, 설정 파일 값 덮어쓰기)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// 표시 간격 (밀리초)
    #[arg(long, default_value = "1000")]
    render_interval_ms: u64,

    /// 연결 확인 URL (설정 파일 값 덮어쓰기)
    #[arg(long)]
    connectivity_url: Option<String>,

    /// GPU 통계 수집 비활성화
    #[arg(long)]
    no_gpu: bool,

    /// 첫 샘플 하나만 출력하고 종료
    #[arg(long)]
    once: bool,
}

/// 설정 파일 로드 + CLI 오버라이드
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone())
            .and_then(|manager| manager.get())
            .with_context(|| format!("설정 파일 로드 실패: {}", path.display()))?,
        None => match ConfigManager::new() {
            Ok(manager) => {
                info!("설정 파일: {}", manager.config_path().display());
                manager.get()?
            }
            Err(e) => {
                warn!("설정 관리자 초기화 실패, 기본 설정 사용: {e}");
                AppConfig::default_config()
            }
        },
    };

    if let Some(interval_ms) = args.interval_ms {
        config.sampler.interval_ms = interval_ms;
    }
    if let Some(url) = &args.connectivity_url {
        config.connectivity.url = url.clone();
    }
    if args.no_gpu {
        config.gpu.enabled = false;
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "devperf={},devperf_app={},devperf_core={},devperf_monitor={},devperf_network={}",
        args.log_level, args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    info!("DEVPERF 시작");
    let config = load_config(&args)?;

    // 제공자 판별, 식별 정보 해석, 볼륨 열거는 블로킹 작업
    let analyzer = tokio::task::spawn_blocking(move || PerformanceAnalyzer::new(&config))
        .await
        .map_err(|e| anyhow!("분석기 초기화 태스크 실패: {e}"))??;
    let analyzer = Arc::new(analyzer);

    println!("{}", render_identity(analyzer.identity()));
    let volumes = analyzer.volumes();
    println!(
        "{}",
        render_volumes(volumes.as_deref().map_err(String::as_str))
    );

    let lifecycle = Lifecycle::new(analyzer.clone());
    let mut reader = analyzer.subscribe();
    analyzer.start()?;

    if args.once {
        if let Some(snapshot) = reader.next().await {
            println!("{}", render_snapshot(&snapshot));
        }
        lifecycle.shutdown().await;
        return Ok(());
    }

    let mut shutdown_rx = lifecycle.subscribe();
    let render_interval = Duration::from_millis(args.render_interval_ms.max(1));
    let render_analyzer = analyzer.clone();
    let render_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(render_interval);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    println!("{}", render_snapshot(&render_analyzer.latest_snapshot()));
                }
                _ = shutdown_rx.changed() => {
                    break;
                }
            }
        }
    });

    info!("DEVPERF 실행 중 (Ctrl+C로 종료)");
    lifecycle.run_until_signal().await?;

    if let Err(e) = render_task.await {
        warn!("표시 태스크 종료 실패: {e}");
    }

    info!("DEVPERF 종료");
    Ok(())
}
