//! Configuration for setupctl.
//!
//! A single `setupctl.toml` holds the installer invocation, exit-code
//! overrides, blocking processes and the inventory source.

mod parser;
pub mod paths;
mod schema;
mod store;

pub use parser::{parse_setup_toml, parse_setup_toml_str};
pub use schema::{InstallerSection, InventorySection, ProcessesSection, SetupConfig};
pub use store::ConfigStore;
