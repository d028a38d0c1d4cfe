use rand::RngCore;

use crate::ai::agent::{validate_learning_rate, Agent, CognitiveParams, ValueCore};
use crate::error::{AgentError, ConfigError};

/// Q-learning with a stickiness bonus `phi` added to the previously chosen
/// option before the softmax.
#[derive(Debug, Clone)]
pub struct PerseverationQLearningAgent {
    core: ValueCore,
    alpha: f64,
    phi: f64,
    last_choice: Option<usize>,
}

impl PerseverationQLearningAgent {
    pub fn new(
        alpha: f64,
        beta: f64,
        phi: f64,
        t_max: usize,
        n_options: usize,
    ) -> Result<Self, ConfigError> {
        validate_learning_rate("alpha", alpha)?;
        if !phi.is_finite() {
            return Err(ConfigError::Validation(format!(
                "phi must be finite (got {phi})"
            )));
        }
        Ok(PerseverationQLearningAgent {
            core: ValueCore::new(beta, t_max, n_options)?,
            alpha,
            phi,
            last_choice: None,
        })
    }

    /// A missing `phi` means no stickiness.
    pub fn from_params(
        params: &CognitiveParams,
        t_max: usize,
        n_options: usize,
    ) -> Result<Self, ConfigError> {
        Self::new(
            params.alpha,
            params.beta,
            params.phi.unwrap_or(0.0),
            t_max,
            n_options,
        )
    }

    pub fn phi(&self) -> f64 {
        self.phi
    }

    pub fn last_choice(&self) -> Option<usize> {
        self.last_choice
    }
}

impl Agent for PerseverationQLearningAgent {
    fn name(&self) -> &'static str {
        "PerseverationQLearningAgent"
    }

    fn core(&self) -> &ValueCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ValueCore {
        &mut self.core
    }

    fn choice(&mut self, t: usize, rng: &mut dyn RngCore) -> Result<usize, AgentError> {
        let bonus = self.last_choice.map(|last| (last, self.phi));
        let choice = self.core.choose(t, bonus, rng)?;
        self.last_choice = Some(choice);
        Ok(choice)
    }

    fn learn(&mut self, choice: usize, _t: usize, reward: f64) -> Result<(), AgentError> {
        self.core.update(choice, self.alpha, reward)
    }
}
