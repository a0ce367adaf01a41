//! Orchestration services tying the scanner backend to the lifecycle
//! engine and the order board.

pub mod orders;
