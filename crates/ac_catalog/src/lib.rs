//! Catalog and scenario loading shared by the `ac_cli` subcommands.

mod catalog;
mod scenario;

pub use catalog::{load_catalog, parse_catalog, sanitize_nan, Catalog, ManualEquipment};
pub use scenario::{load_scenario, resolve_entries, EquipmentSource, Scenario, Selection};
