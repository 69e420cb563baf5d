//! Core infrastructure shared by the queue and progress modules

pub mod error_handling;
pub mod logging;
pub mod sync;
