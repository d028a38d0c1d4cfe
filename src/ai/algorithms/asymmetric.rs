use crate::ai::agent::{validate_learning_rate, Agent, CognitiveParams, ValueCore};
use crate::error::{AgentError, ConfigError};

/// Q-learning with separate learning rates for positive and negative
/// prediction errors.
#[derive(Debug, Clone)]
pub struct AsymmetricQLearningAgent {
    core: ValueCore,
    alpha_pos: f64,
    alpha_neg: f64,
}

impl AsymmetricQLearningAgent {
    pub fn new(
        alpha_pos: f64,
        alpha_neg: f64,
        beta: f64,
        t_max: usize,
        n_options: usize,
    ) -> Result<Self, ConfigError> {
        validate_learning_rate("alpha", alpha_pos)?;
        validate_learning_rate("alpha_neg", alpha_neg)?;
        Ok(AsymmetricQLearningAgent {
            core: ValueCore::new(beta, t_max, n_options)?,
            alpha_pos,
            alpha_neg,
        })
    }

    /// `alpha` drives gains, `alpha_neg` drives losses; the latter is
    /// required.
    pub fn from_params(
        params: &CognitiveParams,
        t_max: usize,
        n_options: usize,
    ) -> Result<Self, ConfigError> {
        let alpha_neg = params.alpha_neg.ok_or_else(|| {
            ConfigError::Validation("AsymmetricQLearningAgent requires alpha_neg".into())
        })?;
        Self::new(params.alpha, alpha_neg, params.beta, t_max, n_options)
    }

    pub fn alpha_pos(&self) -> f64 {
        self.alpha_pos
    }

    pub fn alpha_neg(&self) -> f64 {
        self.alpha_neg
    }

    /// Learning rate applied to a prediction error `delta`.
    pub fn rate_for(&self, delta: f64) -> f64 {
        if delta >= 0.0 {
            self.alpha_pos
        } else {
            self.alpha_neg
        }
    }
}

impl Agent for AsymmetricQLearningAgent {
    fn name(&self) -> &'static str {
        "AsymmetricQLearningAgent"
    }

    fn core(&self) -> &ValueCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ValueCore {
        &mut self.core
    }

    fn learn(&mut self, choice: usize, _t: usize, reward: f64) -> Result<(), AgentError> {
        let delta = self.core.prediction_error(choice, reward)?;
        let alpha = self.rate_for(delta);
        self.core.update(choice, alpha, reward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_alpha_neg() {
        let params = CognitiveParams::new(0.4, 2.0);
        assert!(AsymmetricQLearningAgent::from_params(&params, 10, 2).is_err());
        let params = params.with_alpha_neg(0.1);
        let agent = AsymmetricQLearningAgent::from_params(&params, 10, 2).unwrap();
        assert_eq!(agent.alpha_pos(), 0.4);
        assert_eq!(agent.alpha_neg(), 0.1);
    }

    #[test]
    fn test_rejects_alpha_neg_out_of_range() {
        assert!(AsymmetricQLearningAgent::new(0.4, 1.2, 2.0, 10, 2).is_err());
    }

    #[test]
    fn test_positive_prediction_error_uses_alpha_pos() {
        let mut agent = AsymmetricQLearningAgent::new(0.8, 0.1, 1.0, 5, 2).unwrap();
        // Q[0] = 0, reward = 1: delta = +1
        agent.learn(0, 0, 1.0).unwrap();
        assert!((agent.q_values()[0] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_negative_prediction_error_uses_alpha_neg() {
        let mut agent = AsymmetricQLearningAgent::new(0.8, 0.1, 1.0, 5, 2).unwrap();
        // Q[1] = 0, reward = -1: delta = -1
        agent.learn(1, 0, -1.0).unwrap();
        assert!((agent.q_values()[1] + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_zero_prediction_error_is_a_gain() {
        let agent = AsymmetricQLearningAgent::new(0.8, 0.1, 1.0, 5, 2).unwrap();
        assert_eq!(agent.rate_for(0.0), 0.8);
        assert_eq!(agent.rate_for(-1e-12), 0.1);
    }

    #[test]
    fn test_learn_rejects_bad_choice() {
        let mut agent = AsymmetricQLearningAgent::new(0.8, 0.1, 1.0, 5, 2).unwrap();
        assert!(agent.learn(7, 0, 1.0).is_err());
    }
}
