//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: fleet-file access, local SSH
//! key loading, and the cloud provider HTTP client.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod config;
pub mod hcloud;
pub mod sshkey;
