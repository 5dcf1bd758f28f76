//! 선택적 제공자 포트.
//!
//! 시작 시 한 번 존재 여부를 판별하고([`Capabilities`]), 이후에는 재시도하지 않는다.
//! 구현: `devperf-monitor` crate (플랫폼 인벤토리, nvidia-smi)

use std::fmt;
use std::sync::Arc;

use crate::error::CoreError;
use crate::models::system::GpuStats;

/// 특권 시스템 인벤토리 제공자 (기기 모델명, GPU 이름)
pub trait InventoryProvider: Send + Sync {
    /// 제공자 이름 (로그용)
    fn name(&self) -> &str;

    /// 기기 모델명
    fn model_name(&self) -> Result<String, CoreError>;

    /// 첫 번째 GPU 이름 (GPU가 없으면 None)
    fn gpu_name(&self) -> Result<Option<String>, CoreError>;

    /// GPU 이름 조회 도구가 설치되어 있는지 (시작 시 판별한 값)
    fn supports_gpu_name(&self) -> bool {
        true
    }
}

/// GPU 통계 제공자
pub trait GpuProvider: Send + Sync {
    /// 제공자 이름 (로그용)
    fn name(&self) -> &str;

    /// 첫 번째 GPU 이름 (GPU가 없으면 None)
    fn gpu_name(&self) -> Result<Option<String>, CoreError>;

    /// 첫 번째 GPU 통계 (GPU가 없으면 None)
    fn stats(&self) -> Result<Option<GpuStats>, CoreError>;
}

/// 시작 시 판별된 선택적 제공자 집합
///
/// 전역 상태 대신 참조로 전달되며, 테스트는 가짜 집합을 주입한다.
#[derive(Clone, Default)]
pub struct Capabilities {
    /// 특권 인벤토리 제공자
    pub inventory: Option<Arc<dyn InventoryProvider>>,
    /// GPU 통계 제공자
    pub gpu: Option<Arc<dyn GpuProvider>>,
}

impl Capabilities {
    /// 선택적 제공자가 하나도 없는 집합
    pub fn none() -> Self {
        Self::default()
    }

    /// 인벤토리 제공자 설정
    pub fn with_inventory(mut self, provider: Arc<dyn InventoryProvider>) -> Self {
        self.inventory = Some(provider);
        self
    }

    /// GPU 통계 제공자 설정
    pub fn with_gpu(mut self, provider: Arc<dyn GpuProvider>) -> Self {
        self.gpu = Some(provider);
        self
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("inventory", &self.inventory.as_ref().map(|p| p.name()))
            .field("gpu", &self.gpu.as_ref().map(|p| p.name()))
            .finish()
    }
}
