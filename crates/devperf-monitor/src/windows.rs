//! Windows 플랫폼 인벤토리.
//!
//! PowerShell CIM 질의로 `Win32_ComputerSystem.Model`, `Win32_VideoController.Name`을 읽는다.

use crate::inventory::{first_non_empty_line, is_placeholder_model, run_command};
use devperf_core::error::CoreError;
use devperf_core::ports::provider::InventoryProvider;

const POWERSHELL: &str = "powershell";

/// PowerShell CIM 기반 인벤토리 제공자
#[derive(Debug, Clone, Default)]
pub struct CimInventory;

impl CimInventory {
    pub fn new() -> Self {
        Self
    }

    fn query(&self, class: &str, property: &str) -> Result<Option<String>, CoreError> {
        let script = format!(
            "Get-CimInstance -ClassName {class} | Select-Object -ExpandProperty {property}"
        );
        let output = run_command(POWERSHELL, &["-NoProfile", "-NonInteractive", "-Command", script.as_str()])?;
        Ok(first_non_empty_line(&output))
    }
}

impl InventoryProvider for CimInventory {
    fn name(&self) -> &str {
        "cim"
    }

    fn model_name(&self) -> Result<String, CoreError> {
        match self.query("Win32_ComputerSystem", "Model")? {
            Some(model) if !is_placeholder_model(&model) => Ok(model),
            _ => Err(CoreError::provider("cim", "Win32_ComputerSystem.Model 없음")),
        }
    }

    fn gpu_name(&self) -> Result<Option<String>, CoreError> {
        self.query("Win32_VideoController", "Name")
    }
}
