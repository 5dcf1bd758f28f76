//! 포트 인터페이스 (trait).
//!
//! 호스트 데이터 소스와 선택적 제공자를 추상화한다.
//! 각 어댑터 crate가 이 trait들을 구현하며,
//! `devperf-app`에서 `Arc<dyn T>`로 와이어링한다.
//! 테스트는 가짜 구현을 주입해 폴백 경로를 검증한다.

pub mod connectivity;
pub mod host;
pub mod provider;
