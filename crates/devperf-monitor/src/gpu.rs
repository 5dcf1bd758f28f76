//! nvidia-smi 기반 GPU 통계 제공자.
//!
//! 시작 시 한 번 `nvidia-smi -L`로 존재 여부를 확인하고, 이후 매 틱마다 CSV 질의로
//! 첫 번째 GPU의 사용률과 VRAM을 읽는다.

use crate::inventory::run_command;
use devperf_core::error::CoreError;
use devperf_core::models::system::GpuStats;
use devperf_core::ports::provider::GpuProvider;
use tracing::debug;

/// GPU 질의 인자
const QUERY_ARGS: &[&str] = &[
    "--query-gpu=name,utilization.gpu,memory.used,memory.total",
    "--format=csv,noheader,nounits",
];

/// nvidia-smi 호환 명령 래퍼
#[derive(Debug, Clone)]
pub struct NvidiaSmi {
    command: String,
}

impl NvidiaSmi {
    /// 명령 이름으로 생성 (존재 여부는 확인하지 않음)
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// 명령이 실행 가능한 경우에만 제공자 반환
    pub fn detect(command: &str) -> Option<Self> {
        match run_command(command, &["-L"]) {
            Ok(_) => {
                debug!("{command} 감지됨");
                Some(Self::new(command))
            }
            Err(e) => {
                debug!("{command} 사용 불가: {e}");
                None
            }
        }
    }

    fn query(&self) -> Result<Vec<(String, GpuStats)>, CoreError> {
        parse_query_output(&run_command(&self.command, QUERY_ARGS)?)
    }
}

impl GpuProvider for NvidiaSmi {
    fn name(&self) -> &str {
        &self.command
    }

    fn gpu_name(&self) -> Result<Option<String>, CoreError> {
        Ok(self.query()?.into_iter().next().map(|(name, _)| name))
    }

    fn stats(&self) -> Result<Option<GpuStats>, CoreError> {
        Ok(self.query()?.into_iter().next().map(|(_, stats)| stats))
    }
}

/// `name, util, mem.used, mem.total` CSV 출력 파싱
///
/// GPU 이름에 쉼표가 들어갈 수 있으므로 뒤에서부터 숫자 세 개를 떼어낸다.
/// `[N/A]`, `[Not Supported]` 값은 0으로 취급한다.
pub fn parse_query_output(output: &str) -> Result<Vec<(String, GpuStats)>, CoreError> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut fields = line.rsplitn(4, ',').map(str::trim);
            let total = fields.next();
            let used = fields.next();
            let util = fields.next();
            let name = fields.next();

            match (name, util, used, total) {
                (Some(name), Some(util), Some(used), Some(total)) if !name.is_empty() => Ok((
                    name.to_string(),
                    GpuStats {
                        load_percent: parse_metric(util, line)?.clamp(0.0, 100.0),
                        memory_used_mb: parse_metric(used, line)?,
                        memory_total_mb: parse_metric(total, line)?,
                    },
                )),
                _ => Err(CoreError::provider(
                    "nvidia-smi",
                    format!("필드 수 불일치: {line}"),
                )),
            }
        })
        .collect()
}

fn parse_metric(value: &str, line: &str) -> Result<f64, CoreError> {
    if value.starts_with('[') {
        return Ok(0.0);
    }
    value
        .parse::<f64>()
        .map_err(|e| CoreError::provider("nvidia-smi", format!("숫자 파싱 실패 ({value}): {e} - {line}")))
}
