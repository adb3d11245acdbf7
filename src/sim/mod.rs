/// Post-hoc generation metrics.
pub mod analysis;
pub mod engine;
pub mod types;

pub use analysis::{GenerationResult, MonthlyGeneration};
pub use engine::Simulator;
pub use types::{HourRecord, Simulation};
