//! Simulation infrastructure: the trial controller, the population driver,
//! progress collaborators and the aggregated result tensors.

pub mod driver;
pub mod progress;
pub mod results;
pub mod session;

pub use driver::{agent_seed, ModelParams, Simulation, SimulationConfig};
pub use progress::{LogProgress, NoProgress, ProgressTracker};
pub use results::{ModelResults, ModelSummary, SimulationResults};
pub use session::{run_session, SessionTrace};
