//! CTS Policy Catalog
//!
//! Static policy data and the selection filter that feeds contribution sweeps.
//!
//! # Core Concepts
//!
//! - [`Policy`]: one tunable model lever with candidate levels and a group
//! - [`PolicyCatalog`]: ordered policy table, loaded from TOML or built in
//! - [`SettingSelector`]: which candidate level counts as "on"
//! - [`Selection`]: enabled policies plus their groups in first-occurrence order
//!
//! # Example
//!
//! ```
//! use cts_catalog::{PolicyCatalog, SettingSelector};
//!
//! let mut catalog = PolicyCatalog::builtin().unwrap();
//! catalog.enable_group("EV Sales Mandate");
//!
//! let selection = catalog.select(SettingSelector::default()).unwrap();
//! assert_eq!(selection.groups().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod catalog;
pub mod error;
mod policy;
mod selection;

pub use catalog::PolicyCatalog;
pub use error::{CatalogError, NO_POLICIES_MESSAGE};
pub use policy::{Policy, SettingSelector};
pub use selection::{Group, SelectedPolicy, Selection};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
