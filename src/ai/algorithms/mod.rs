mod asymmetric;
mod perseveration;
mod q_learning;

use serde::{Deserialize, Serialize};

pub use asymmetric::AsymmetricQLearningAgent;
pub use perseveration::PerseverationQLearningAgent;
pub use q_learning::QLearningAgent;

use crate::ai::agent::{Agent, CognitiveParams};
use crate::error::ConfigError;

/// The model variants run by the simulation driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    QLearning,
    AsymmetricQLearning,
    PerseverationQLearning,
}

impl ModelKind {
    /// All variants, in the order the driver runs them.
    pub const ALL: [ModelKind; 3] = [
        ModelKind::QLearning,
        ModelKind::AsymmetricQLearning,
        ModelKind::PerseverationQLearning,
    ];

    /// Name used to key results.
    pub fn name(self) -> &'static str {
        match self {
            ModelKind::QLearning => "QLearningAgent",
            ModelKind::AsymmetricQLearning => "AsymmetricQLearningAgent",
            ModelKind::PerseverationQLearning => "PerseverationQLearningAgent",
        }
    }

    /// Position of this variant in [`ModelKind::ALL`].
    pub fn index(self) -> usize {
        match self {
            ModelKind::QLearning => 0,
            ModelKind::AsymmetricQLearning => 1,
            ModelKind::PerseverationQLearning => 2,
        }
    }

    /// Construct a fresh agent of this variant.
    pub fn build(
        self,
        params: &CognitiveParams,
        t_max: usize,
        n_options: usize,
    ) -> Result<Box<dyn Agent + Send>, ConfigError> {
        Ok(match self {
            ModelKind::QLearning => Box::new(QLearningAgent::from_params(params, t_max, n_options)?),
            ModelKind::AsymmetricQLearning => Box::new(AsymmetricQLearningAgent::from_params(
                params, t_max, n_options,
            )?),
            ModelKind::PerseverationQLearning => Box::new(
                PerseverationQLearningAgent::from_params(params, t_max, n_options)?,
            ),
        })
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
