//! 네트워크 카운터 및 전송률 모델.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::units::round2;

/// 누적 네트워크 카운터 샘플
///
/// 생성 후 불변. 샘플러는 직전 샘플 하나만 보관한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSample {
    /// 부팅 이후 누적 송신 바이트
    pub bytes_sent: u64,
    /// 부팅 이후 누적 수신 바이트
    pub bytes_received: u64,
    /// 측정 시각 (단조 시계)
    pub timestamp: Instant,
}

impl CounterSample {
    /// 지정 시각의 샘플 생성
    pub fn new(bytes_sent: u64, bytes_received: u64, timestamp: Instant) -> Self {
        Self {
            bytes_sent,
            bytes_received,
            timestamp,
        }
    }
}

/// 순간 전송률 (Mbps, 1 Mb = 1,048,576 bit)
///
/// 내부적으로 전체 정밀도를 유지하고 표시할 때만 소수점 둘째 자리로 반올림한다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThroughputRate {
    /// 업로드 속도 (Mbps, 0 이상)
    pub upload_mbps: f64,
    /// 다운로드 속도 (Mbps, 0 이상)
    pub download_mbps: f64,
}

impl ThroughputRate {
    /// 0 전송률
    pub const ZERO: ThroughputRate = ThroughputRate {
        upload_mbps: 0.0,
        download_mbps: 0.0,
    };

    /// 표시용 반올림 값
    pub fn rounded(&self) -> ThroughputRate {
        ThroughputRate {
            upload_mbps: round2(self.upload_mbps),
            download_mbps: round2(self.download_mbps),
        }
    }
}

impl fmt::Display for ThroughputRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Up: {:.2} Mbps | Down: {:.2} Mbps",
            self.upload_mbps, self.download_mbps
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounded_keeps_two_decimals() {
        let rate = ThroughputRate {
            upload_mbps: 0.007_629_394_531_25,
            download_mbps: 1.236,
        };
        let rounded = rate.rounded();
        assert_eq!(rounded.upload_mbps, 0.01);
        assert_eq!(rounded.download_mbps, 1.24);
    }

    #[test]
    fn display_format() {
        let rate = ThroughputRate {
            upload_mbps: 1.5,
            download_mbps: 12.346,
        };
        assert_eq!(rate.to_string(), "Up: 1.50 Mbps | Down: 12.35 Mbps");
    }
}
