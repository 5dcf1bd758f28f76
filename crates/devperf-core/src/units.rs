//! 표시용 단위 변환.

/// 1 GB (2^30 바이트)
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// 1 Mb (2^20 비트)
pub const BITS_PER_MEGABIT: f64 = 1_048_576.0;

/// 소수점 둘째 자리 반올림
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 바이트 → GB (소수점 둘째 자리)
pub fn bytes_to_gb(bytes: u64) -> f64 {
    round2(bytes as f64 / BYTES_PER_GB)
}

/// 초당 바이트 → Mbps (반올림 없음)
pub fn bytes_per_sec_to_mbps(bytes_per_sec: f64) -> f64 {
    bytes_per_sec * 8.0 / BITS_PER_MEGABIT
}
