//! Structured logging facility for vtriple
//!
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use vtriple_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```
//!
//! Diff runs log one `start`/`end` pair per pipeline phase, carrying the run
//! version and batch sizes; a failing phase logs `end_error` with the error
//! code instead of `end`.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
