//! 콘솔 표시 문자열.
//!
//! 분석기 결과를 사람이 읽는 줄 단위 텍스트로 바꾼다. 측정 불가 값은 `N/A (사유)`로 표시.

use devperf_core::models::identity::IdentityInfo;
use devperf_core::models::storage::VolumeUsage;
use devperf_core::models::system::{GpuReading, Snapshot};

/// 식별 정보 블록
pub fn render_identity(identity: &IdentityInfo) -> String {
    [
        format!("Model Name: {}", identity.model_name),
        format!("OS: {}", identity.os_label),
        format!("IP Address: {}", identity.ip_address),
        format!("MAC Address: {}", identity.mac_address),
        format!("GPU: {}", identity.gpu_name),
    ]
    .join("\n")
}

/// 볼륨 목록 블록 (열거 실패는 빈 목록과 다르게 표시)
pub fn render_volumes(volumes: Result<&[VolumeUsage], &str>) -> String {
    let volumes = match volumes {
        Ok(volumes) => volumes,
        Err(reason) => return format!("Storage: error fetching disks: {reason}"),
    };
    if volumes.is_empty() {
        return "Storage: no volumes".to_string();
    }
    let mut lines = vec!["Storage:".to_string()];
    lines.extend(volumes.iter().map(|v| format!("  {v}")));
    lines.join("\n")
}

/// 스냅샷 한 줄 요약
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    if snapshot.is_initial() {
        return "Waiting for first sample...".to_string();
    }

    let perf = &snapshot.performance;
    let gpu = match &perf.gpu {
        GpuReading::Available(stats) => format!(
            "{:.1}% (mem {:.1}%)",
            stats.load_percent,
            stats.memory_percent()
        ),
        GpuReading::Unavailable(reason) => format!("N/A ({reason})"),
        GpuReading::Pending => "N/A (not sampled yet)".to_string(),
    };

    let mut line = format!(
        "[{}] CPU: {:.1}% | Memory: {} | {} | GPU: {} | Status: {}",
        snapshot.timestamp.format("%H:%M:%S"),
        perf.cpu_percent,
        perf.memory_label(),
        perf.throughput,
        gpu,
        snapshot.connectivity
    );
    if !perf.degraded.is_empty() {
        line.push_str(&format!(" | degraded: {}", perf.degraded.join("; ")));
    }
    line
}
