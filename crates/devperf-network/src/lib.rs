//! # devperf-network
//!
//! 네트워크 어댑터.
//! 잘 알려진 엔드포인트로 요청 한 번을 보내 인터넷 연결 상태를 판별한다.

pub mod connectivity;
