//! 종료 조정.
//!
//! OS 시그널을 기다렸다가 표시 태스크에 종료를 알리고, 분석기의 샘플링 루프를
//! 설정된 한도 안에서 정리한다.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::analyzer::PerformanceAnalyzer;

/// 분석기 수명 관리자
pub struct Lifecycle {
    analyzer: Arc<PerformanceAnalyzer>,
    shutdown_tx: watch::Sender<bool>,
}

impl Lifecycle {
    /// 관리 대상 분석기로 생성
    pub fn new(analyzer: Arc<PerformanceAnalyzer>) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            analyzer,
            shutdown_tx,
        }
    }

    /// 표시 태스크용 종료 수신기
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// 종료 진행 여부
    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    /// 표시 태스크에 종료를 알린 뒤 샘플링 루프 종료 대기
    ///
    /// 루프가 한도 안에 끝났으면 true. 두 번째 호출부터는 알림 없이 대기만 한다.
    pub async fn shutdown(&self) -> bool {
        if self.shutdown_tx.send_replace(true) {
            debug!("이미 종료 중");
        } else {
            info!("종료 시작");
        }

        let finished = self.analyzer.shutdown().await;
        if !finished {
            warn!("샘플링 루프 종료를 확인하지 못함 (진행 중인 틱은 백그라운드에서 마무리)");
        }
        finished
    }

    /// SIGINT/SIGTERM(Windows는 Ctrl+C) 수신 후 종료
    pub async fn run_until_signal(&self) -> std::io::Result<bool> {
        wait_for_signal().await?;
        Ok(self.shutdown().await)
    }
}

async fn wait_for_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => info!("SIGINT 수신"),
            _ = sigterm.recv() => info!("SIGTERM 수신"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("Ctrl+C 수신");
    }

    Ok(())
}
