//! 인터넷 연결 상태 확인.
//!
//! `ConnectivityProbe` 포트 구현. 잘 알려진 URL로 GET 요청 한 번.
//!
//! ## 판별 기준
//! - 응답 수신 (상태 코드 무관) → Connected
//! - 타임아웃, 연결 거부, 도달 불가, 이름 해석 실패 → Disconnected
//! - 그 밖의 전송 계층 실패 → Unknown(사유)
//!
//! 재시도하지 않는다. 다음 틱이 곧 재시도다.

use async_trait::async_trait;
use devperf_core::config::ConnectivityConfig;
use devperf_core::models::system::ConnectivityStatus;
use devperf_core::ports::connectivity::ConnectivityProbe;
use std::time::Duration;
use tracing::{debug, warn};

/// 전송 계층 타임아웃 외 추가 여유 시간
const TIMEOUT_SLACK: Duration = Duration::from_millis(250);

/// HTTP 기반 연결 상태 확인기
pub struct HttpConnectivityProbe {
    client: Result<reqwest::Client, String>,
    url: String,
    timeout: Duration,
}

impl HttpConnectivityProbe {
    /// 설정으로 생성
    pub fn new(config: &ConnectivityConfig) -> Self {
        Self::with_timeout(&config.url, config.timeout())
    }

    /// URL과 타임아웃으로 생성
    ///
    /// 클라이언트 빌드 실패는 생성 시점이 아니라 `probe()` 결과(Unknown)로 드러난다.
    pub fn with_timeout(url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| {
                warn!("HTTP 클라이언트 빌드 실패: {e}");
                format!("client build failed: {e}")
            });

        Self {
            client,
            url: url.to_string(),
            timeout,
        }
    }

    /// 확인 대상 URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// 요청 타임아웃
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl ConnectivityProbe for HttpConnectivityProbe {
    async fn probe(&self) -> ConnectivityStatus {
        let client = match &self.client {
            Ok(client) => client,
            Err(reason) => return ConnectivityStatus::Unknown(reason.clone()),
        };

        // 전송 계층 타임아웃이 어떤 이유로든 동작하지 않아도 호출자는 묶이지 않는다
        let request = client.get(&self.url).send();
        match tokio::time::timeout(self.timeout + TIMEOUT_SLACK, request).await {
            Ok(Ok(response)) => {
                debug!("연결 확인 성공: {} ({})", self.url, response.status());
                ConnectivityStatus::Connected
            }
            Ok(Err(e)) => {
                let status = classify_error(&e);
                debug!("연결 확인 실패: {} → {status} ({e})", self.url);
                status
            }
            Err(_) => {
                debug!("연결 확인 시간 초과: {}", self.url);
                ConnectivityStatus::Disconnected
            }
        }
    }
}

/// 요청 에러를 연결 상태로 분류
pub fn classify_error(error: &reqwest::Error) -> ConnectivityStatus {
    if error.is_timeout() || error.is_connect() {
        return ConnectivityStatus::Disconnected;
    }

    let kind = if error.is_builder() {
        "builder"
    } else if error.is_redirect() {
        "redirect"
    } else if error.is_body() {
        "body"
    } else if error.is_decode() {
        "decode"
    } else if error.is_request() {
        "request"
    } else {
        "transport"
    };
    ConnectivityStatus::Unknown(kind.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::time::Instant;

    #[tokio::test]
    async fn any_response_is_connected() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .create_async()
            .await;

        let probe = HttpConnectivityProbe::with_timeout(&server.url(), Duration::from_secs(3));
        assert_eq!(probe.probe().await, ConnectivityStatus::Connected);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_still_connected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(503)
            .create_async()
            .await;

        let probe = HttpConnectivityProbe::with_timeout(&server.url(), Duration::from_secs(3));
        assert_eq!(probe.probe().await, ConnectivityStatus::Connected);
    }

    #[tokio::test]
    async fn refused_connection_is_disconnected() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let probe = HttpConnectivityProbe::with_timeout(
            &format!("http://127.0.0.1:{port}/"),
            Duration::from_secs(3),
        );
        assert_eq!(probe.probe().await, ConnectivityStatus::Disconnected);
    }

    #[tokio::test]
    async fn unreachable_address_is_bounded() {
        let timeout = Duration::from_millis(500);
        let probe = HttpConnectivityProbe::with_timeout("http://10.255.255.1/", timeout);

        let started = Instant::now();
        let status = probe.probe().await;

        assert_eq!(status, ConnectivityStatus::Disconnected);
        assert!(started.elapsed() < timeout + Duration::from_secs(1));
    }

    #[tokio::test]
    async fn invalid_url_is_unknown() {
        let probe = HttpConnectivityProbe::with_timeout("not a url", Duration::from_secs(1));
        assert!(matches!(probe.probe().await, ConnectivityStatus::Unknown(_)));
    }

    #[test]
    fn built_from_config() {
        let config = ConnectivityConfig::default();
        let probe = HttpConnectivityProbe::new(&config);
        assert_eq!(probe.url(), "http://www.google.com");
        assert_eq!(probe.timeout(), Duration::from_secs(3));
    }
}
