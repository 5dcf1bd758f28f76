//! 선택적 제공자 판별.
//!
//! 시작 시 한 번만 실행한다. 없는 제공자는 여기서 한 번 로그를 남기고,
//! 이후 매 틱마다 다시 찾지 않는다.

use crate::gpu::NvidiaSmi;
use crate::inventory::detect_inventory;
use devperf_core::config::GpuConfig;
use devperf_core::ports::provider::Capabilities;
use std::sync::Arc;
use tracing::{info, warn};

/// 플랫폼 인벤토리와 GPU 통계 제공자 판별
pub fn detect_capabilities(gpu: &GpuConfig) -> Capabilities {
    let mut capabilities = Capabilities::none();

    match detect_inventory() {
        Some(provider) => {
            info!("인벤토리 제공자: {}", provider.name());
            capabilities.inventory = Some(provider);
        }
        None => warn!("인벤토리 제공자 없음: 모델명은 제한된 정보로 표시됩니다"),
    }

    if !gpu.enabled {
        info!("GPU 통계 수집 비활성화됨");
    } else if let Some(smi) = NvidiaSmi::detect(&gpu.command) {
        info!("GPU 통계 제공자: {}", gpu.command);
        capabilities.gpu = Some(Arc::new(smi));
    } else {
        warn!("GPU 통계 제공자 없음 ({}): GPU 부하는 N/A로 표시됩니다", gpu.command);
    }

    capabilities
}
