//! CLI command implementations
//!
//! Exit codes: 0 success, 2 configuration error, 5 fatal error.

pub mod init;
pub mod serve;
pub mod validate;
