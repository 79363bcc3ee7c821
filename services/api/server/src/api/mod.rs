pub mod core;
pub mod error_recorder;
pub mod error_v1;
