//! Infrastructure layer: implementations of the application ports.

pub mod control_input;
pub mod frame_source;
pub mod input_injection;
pub mod storage;
