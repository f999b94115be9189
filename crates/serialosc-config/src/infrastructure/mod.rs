//! Infrastructure layer: OS-facing adapters.
//!
//! Contains the process-environment adapter and file-system storage for
//! per-device config files.
//!
//! **Dependency rule**: this layer may depend on `application` and `domain`,
//! but MUST NOT be imported by either of them.

pub mod environment;
pub mod storage;
