//! 연결 확인 포트.
//!
//! 구현: `devperf-network` crate (reqwest)

use async_trait::async_trait;

use crate::models::system::ConnectivityStatus;

/// 인터넷 도달 가능성 확인
///
/// 구현은 고정 타임아웃을 넘겨 호출자를 붙잡아서는 안 되며,
/// 실패를 에러가 아닌 [`ConnectivityStatus`] 값으로 돌려준다.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    /// 단일 도달 가능성 확인
    async fn probe(&self) -> ConnectivityStatus;
}
