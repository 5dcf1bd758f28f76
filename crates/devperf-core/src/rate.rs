//! 누적 카운터 → 순간 전송률 변환.
//!
//! 두 [`CounterSample`]과 경과 시간으로 업로드/다운로드 Mbps를 계산한다.
//! 경과 시간이 0 이하이면 직전 전송률을 그대로 유지하고,
//! 카운터가 줄어들면(인터페이스 재시작) 증가량을 0으로 고정한다.

use crate::models::network::{CounterSample, ThroughputRate};
use crate::units::bytes_per_sec_to_mbps;

/// 두 샘플 사이 전송률 계산
///
/// 경과 시간이 0 이하이면 `None` (정의된 경계 상황이며 에러가 아님).
pub fn compute_rate(previous: &CounterSample, current: &CounterSample) -> Option<ThroughputRate> {
    let elapsed = current
        .timestamp
        .checked_duration_since(previous.timestamp)?
        .as_secs_f64();
    if elapsed <= 0.0 {
        return None;
    }

    let sent = current.bytes_sent.saturating_sub(previous.bytes_sent);
    let received = current.bytes_received.saturating_sub(previous.bytes_received);

    Some(ThroughputRate {
        upload_mbps: bytes_per_sec_to_mbps(sent as f64 / elapsed),
        download_mbps: bytes_per_sec_to_mbps(received as f64 / elapsed),
    })
}

/// 직전 전송률을 기억하는 계산기
#[derive(Debug, Clone, Default)]
pub struct RateCalculator {
    last_rate: ThroughputRate,
}

impl RateCalculator {
    /// 0 전송률로 시작
    pub fn new() -> Self {
        Self::default()
    }

    /// 새 샘플 쌍으로 전송률 갱신
    ///
    /// 경과 시간이 0 이하이면 직전 값을 그대로 반환한다.
    pub fn update(&mut self, previous: &CounterSample, current: &CounterSample) -> ThroughputRate {
        if let Some(rate) = compute_rate(previous, current) {
            self.last_rate = rate;
        }
        self.last_rate
    }

    /// 마지막으로 계산된 전송률
    pub fn last_rate(&self) -> ThroughputRate {
        self.last_rate
    }
}
