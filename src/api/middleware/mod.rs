//! Middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. Access logger: method, path, status, latency
//! 2. Session: cookie → `SessionId` extension (browser routes only)

pub mod access;
pub mod session;
