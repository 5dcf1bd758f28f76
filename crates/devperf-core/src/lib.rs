//! # devperf-core
//!
//! DEVPERF 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 스냅샷/식별 정보/볼륨 등 도메인 데이터 구조체
//! - [`ports`]: 호스트 데이터 소스 및 선택적 제공자 인터페이스
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 애플리케이션 설정 구조체
//! - [`config_manager`]: 설정 파일 관리 (로드/저장)
//! - [`rate`]: 누적 카운터 → 순간 전송률 변환
//! - [`handoff`]: 샘플러 → 소비자 스냅샷 전달 채널
//! - [`units`]: 표시용 단위 변환

pub mod config;
pub mod config_manager;
pub mod error;
pub mod handoff;
pub mod models;
pub mod ports;
pub mod rate;
pub mod units;
