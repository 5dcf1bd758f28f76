//! macOS 플랫폼 인벤토리.
//!
//! 모델 식별자는 `sysctl -n hw.model`, GPU 이름은 `system_profiler SPDisplaysDataType`.

use crate::inventory::{first_non_empty_line, parse_system_profiler_gpu, run_command};
use devperf_core::error::CoreError;
use devperf_core::ports::provider::InventoryProvider;

/// sysctl + system_profiler 기반 인벤토리 제공자
#[derive(Debug, Clone, Default)]
pub struct MacInventory;

impl MacInventory {
    pub fn new() -> Self {
        Self
    }
}

impl InventoryProvider for MacInventory {
    fn name(&self) -> &str {
        "sysctl"
    }

    fn model_name(&self) -> Result<String, CoreError> {
        let output = run_command("sysctl", &["-n", "hw.model"])?;
        first_non_empty_line(&output).ok_or_else(|| CoreError::provider("sysctl", "hw.model 비어 있음"))
    }

    fn gpu_name(&self) -> Result<Option<String>, CoreError> {
        let output = run_command("system_profiler", &["SPDisplaysDataType"])?;
        Ok(parse_system_profiler_gpu(&output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_identifier_present() {
        let model = MacInventory::new().model_name().unwrap();
        assert!(!model.is_empty());
    }
}
