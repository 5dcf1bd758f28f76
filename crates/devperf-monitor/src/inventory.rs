//! 플랫폼 인벤토리 제공자 공통 부분.
//!
//! 외부 명령 실행과 출력 파싱 헬퍼, 플랫폼별 제공자 선택.

use devperf_core::error::CoreError;
use devperf_core::ports::provider::InventoryProvider;
use std::io::ErrorKind;
use std::process::Command;
use std::sync::Arc;

/// 펌웨어가 채워 넣는 의미 없는 모델명
const PLACEHOLDER_MODELS: &[&str] = &[
    "To be filled by O.E.M.",
    "To Be Filled By O.E.M.",
    "System Product Name",
    "Default string",
    "Not Applicable",
    "None",
];

/// 외부 명령 실행 후 표준 출력 반환
///
/// 명령이 없으면 "미설치" 제공자 에러, 실패 종료 코드는 표준 에러를 담은 제공자 에러.
pub fn run_command(program: &str, args: &[&str]) -> Result<String, CoreError> {
    let output = Command::new(program).args(args).output().map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            CoreError::provider(program, "미설치")
        } else {
            CoreError::provider(program, e.to_string())
        }
    })?;

    if !output.status.success() {
        return Err(CoreError::provider(
            program,
            format!(
                "exit {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// 공백이 아닌 첫 줄
pub fn first_non_empty_line(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// 펌웨어 기본값 여부
pub fn is_placeholder_model(value: &str) -> bool {
    let value = value.trim();
    value.is_empty()
        || PLACEHOLDER_MODELS
            .iter()
            .any(|p| p.eq_ignore_ascii_case(value))
}

/// `lspci` 출력에서 첫 번째 디스플레이 장치 이름 추출
///
/// 예: `01:00.0 VGA compatible controller: NVIDIA Corporation GA106 [GeForce RTX 3060] (rev a1)`
pub fn parse_lspci_gpu(output: &str) -> Option<String> {
    const CLASSES: &[&str] = &[
        "VGA compatible controller",
        "3D controller",
        "Display controller",
    ];

    output.lines().find_map(|line| {
        let (_, rest) = line.split_once(' ')?;
        let (class, device) = rest.split_once(": ")?;
        if !CLASSES.iter().any(|c| class.trim() == *c) {
            return None;
        }
        let device = match device.rfind(" (rev ") {
            Some(idx) => &device[..idx],
            None => device,
        };
        let device = device.trim();
        (!device.is_empty()).then(|| device.to_string())
    })
}

/// `system_profiler SPDisplaysDataType` 출력에서 첫 번째 칩셋 이름 추출
pub fn parse_system_profiler_gpu(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let value = line.trim().strip_prefix("Chipset Model:")?.trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// 현재 플랫폼의 인벤토리 제공자
///
/// 제공자가 실제로 응답하는지는 확인하지 않는다. 호출 결과는 식별 정보 해석기가 처리한다.
#[cfg(target_os = "linux")]
pub fn detect_inventory() -> Option<Arc<dyn InventoryProvider>> {
    let provider = crate::linux::DmiInventory::new();
    if !provider.is_available() {
        return None;
    }
    Some(Arc::new(provider))
}

#[cfg(target_os = "macos")]
pub fn detect_inventory() -> Option<Arc<dyn InventoryProvider>> {
    Some(Arc::new(crate::macos::MacInventory::new()))
}

#[cfg(target_os = "windows")]
pub fn detect_inventory() -> Option<Arc<dyn InventoryProvider>> {
    Some(Arc::new(crate::windows::CimInventory::new()))
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub fn detect_inventory() -> Option<Arc<dyn InventoryProvider>> {
    None
}
