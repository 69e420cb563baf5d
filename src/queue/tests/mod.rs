//! Test modules for the coordinated queue
//!
//! Tests are organized by functional area.
