pub mod inverter;
pub mod module;
pub mod system;
pub mod temperature;

pub use inverter::{INVERTER_CATALOG, InverterProfile, nearest_inverter};
pub use module::{MODULE_CATALOG, MODULE_CATALOG_VERSION, ModuleProfile, find_module};
pub use system::{LossFractions, SystemOptions, SystemSpec, build_system};
pub use temperature::{RackingType, cell_temperature};
