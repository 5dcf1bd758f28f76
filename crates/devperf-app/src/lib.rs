//! # devperf-app
//!
//! DEVPERF 앱 계층.
//! 샘플링 루프 오케스트레이션, 외부 표시 계층용 분석기 파사드, 라이프사이클 관리.

pub mod analyzer;
pub mod lifecycle;
pub mod presenter;
pub mod sampler;
