//! Linux 플랫폼 인벤토리.
//!
//! ## 모델명
//! `/sys/class/dmi/id`의 `sys_vendor`, `product_name`을 읽는다.
//! 펌웨어 기본값("To be filled by O.E.M." 등)은 없는 값으로 취급한다.
//!
//! ## GPU 이름
//! `lspci` 출력의 첫 번째 디스플레이 장치. `lspci`가 없으면 생성 시 한 번 판별해 두고
//! 조회하지 않는다.

use crate::inventory::{is_placeholder_model, parse_lspci_gpu, run_command};
use devperf_core::error::CoreError;
use devperf_core::ports::provider::InventoryProvider;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// DMI 정보 기본 경로
const DMI_ROOT: &str = "/sys/class/dmi/id";

const LSPCI: &str = "lspci";

/// DMI + lspci 기반 인벤토리 제공자
#[derive(Debug, Clone)]
pub struct DmiInventory {
    root: PathBuf,
    lspci: Option<String>,
}

impl DmiInventory {
    /// 시스템 DMI 경로 사용
    pub fn new() -> Self {
        Self::with_root(DMI_ROOT)
    }

    /// DMI 루트 경로 지정 (`lspci` 설치 여부는 여기서 한 번 확인)
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            lspci: locate_lspci(),
        }
    }

    /// GPU 이름 조회 명령 지정 (None이면 조회 도구 없음)
    pub fn with_lspci(mut self, command: Option<&str>) -> Self {
        self.lspci = command.map(str::to_string);
        self
    }

    /// DMI 디렉토리 존재 여부 (컨테이너/ARM 보드는 없을 수 있음)
    pub fn is_available(&self) -> bool {
        self.root.is_dir()
    }

    fn read_field(&self, name: &str) -> Option<String> {
        match fs::read_to_string(self.root.join(name)) {
            Ok(value) if !is_placeholder_model(&value) => Some(value.trim().to_string()),
            Ok(_) => None,
            Err(e) => {
                debug!("DMI 필드 읽기 실패 ({name}): {e}");
                None
            }
        }
    }
}

impl Default for DmiInventory {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryProvider for DmiInventory {
    fn name(&self) -> &str {
        "dmi"
    }

    fn model_name(&self) -> Result<String, CoreError> {
        let product = self
            .read_field("product_name")
            .ok_or_else(|| CoreError::provider("dmi", "product_name 없음"))?;

        match self.read_field("sys_vendor") {
            Some(vendor) if !product.starts_with(&vendor) => Ok(format!("{vendor} {product}")),
            _ => Ok(product),
        }
    }

    fn gpu_name(&self) -> Result<Option<String>, CoreError> {
        let Some(lspci) = &self.lspci else {
            debug!("lspci 없음: GPU 이름 조회 생략");
            return Ok(None);
        };
        let output = run_command(lspci, &[])?;
        Ok(parse_lspci_gpu(&output))
    }

    fn supports_gpu_name(&self) -> bool {
        self.lspci.is_some()
    }
}

fn locate_lspci() -> Option<String> {
    match run_command(LSPCI, &["--version"]) {
        Ok(_) => Some(LSPCI.to_string()),
        Err(e) => {
            warn!("GPU 이름 조회 도구 없음: {e}");
            None
        }
    }
}
