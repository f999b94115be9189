//! Application layer.
//!
//! - [`environment`] – the `Environment` port used for path resolution.
//! - [`manage_settings`] – partial edits to a loaded settings record.
//!
//! This layer depends only on `domain`; infrastructure adapters implement
//! its traits.

pub mod environment;
pub mod manage_settings;
