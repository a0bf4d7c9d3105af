//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod cloudinit;
pub mod error;
pub mod fleet;
pub mod machine;
pub mod outputs;

#[allow(unused_imports)]
pub use cloudinit::{BootstrapConfig, render_bootstrap_script};
#[allow(unused_imports)]
pub use error::{FleetError, KeyError, ProviderError};
#[allow(unused_imports)]
pub use fleet::{FleetFile, MachineEntry, PasswordSource, ServerDefaults};
#[allow(unused_imports)]
pub use machine::{
    MachineSpec, Secret, validate_machine_name, validate_password, validate_user_name,
};
#[allow(unused_imports)]
pub use outputs::{OutputValue, ProvisionedInstance, RunOutputs};
