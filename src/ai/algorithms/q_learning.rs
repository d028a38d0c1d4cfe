use crate::ai::agent::{validate_learning_rate, Agent, CognitiveParams, ValueCore};
use crate::error::{AgentError, ConfigError};

/// Standard delta-rule Q-learning with a softmax policy.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    core: ValueCore,
    alpha: f64,
}

impl QLearningAgent {
    pub fn new(alpha: f64, beta: f64, t_max: usize, n_options: usize) -> Result<Self, ConfigError> {
        validate_learning_rate("alpha", alpha)?;
        Ok(QLearningAgent {
            core: ValueCore::new(beta, t_max, n_options)?,
            alpha,
        })
    }

    pub fn from_params(
        params: &CognitiveParams,
        t_max: usize,
        n_options: usize,
    ) -> Result<Self, ConfigError> {
        Self::new(params.alpha, params.beta, t_max, n_options)
    }
}

impl Agent for QLearningAgent {
    fn name(&self) -> &'static str {
        "QLearningAgent"
    }

    fn core(&self) -> &ValueCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ValueCore {
        &mut self.core
    }

    fn learn(&mut self, choice: usize, _t: usize, reward: f64) -> Result<(), AgentError> {
        self.core.update(choice, self.alpha, reward)
    }
}
