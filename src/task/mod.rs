//! The reversal-learning task: reward contingencies, their reversal, and the
//! validated per-run task setup.

mod schedule;
mod setup;

pub use schedule::{RewardSchedule, PROBABILITY_TOLERANCE};
pub use setup::TaskSetup;
