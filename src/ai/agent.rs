use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::ai::policy::{sample_categorical, softmax};
use crate::error::{AgentError, ConfigError};

/// Cognitive parameters for one model variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CognitiveParams {
    /// Learning rate. The asymmetric variant uses it for positive
    /// prediction errors.
    pub alpha: f64,
    /// Learning rate for negative prediction errors (asymmetric variant).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha_neg: Option<f64>,
    /// Softmax inverse temperature.
    pub beta: f64,
    /// Perseveration bonus (perseveration variant).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phi: Option<f64>,
}

impl CognitiveParams {
    pub fn new(alpha: f64, beta: f64) -> Self {
        CognitiveParams {
            alpha,
            alpha_neg: None,
            beta,
            phi: None,
        }
    }

    pub fn with_alpha_neg(mut self, alpha_neg: f64) -> Self {
        self.alpha_neg = Some(alpha_neg);
        self
    }

    pub fn with_phi(mut self, phi: f64) -> Self {
        self.phi = Some(phi);
        self
    }
}

/// Per-trial log kept by an agent over one trial sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub choices: Vec<usize>,
    pub rewards: Vec<f64>,
    pub p_softmax: Vec<Vec<f64>>,
}

impl Memory {
    /// Zero-filled memory for `t_max` trials over `n_options` options.
    pub fn new(t_max: usize, n_options: usize) -> Self {
        Memory {
            choices: vec![0; t_max],
            rewards: vec![0.0; t_max],
            p_softmax: vec![vec![0.0; n_options]; t_max],
        }
    }
}

/// State shared by every Q-learning variant: the value vector, the softmax
/// temperature and the trial memory.
#[derive(Debug, Clone)]
pub struct ValueCore {
    q: Vec<f64>,
    beta: f64,
    t_max: usize,
    memory: Memory,
}

impl ValueCore {
    pub fn new(beta: f64, t_max: usize, n_options: usize) -> Result<Self, ConfigError> {
        if n_options < 2 {
            return Err(ConfigError::Validation(format!(
                "n_options must be >= 2 (got {n_options})"
            )));
        }
        if !beta.is_finite() || beta < 0.0 {
            return Err(ConfigError::Validation(format!(
                "beta must be finite and >= 0 (got {beta})"
            )));
        }
        if t_max == 0 {
            return Err(ConfigError::Validation("t_max must be > 0".into()));
        }
        Ok(ValueCore {
            q: vec![0.0; n_options],
            beta,
            t_max,
            memory: Memory::new(t_max, n_options),
        })
    }

    pub fn n_options(&self) -> usize {
        self.q.len()
    }

    pub fn t_max(&self) -> usize {
        self.t_max
    }

    pub fn q(&self) -> &[f64] {
        &self.q
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    fn check_trial(&self, t: usize) -> Result<(), AgentError> {
        if t >= self.t_max {
            return Err(AgentError::TrialOutOfRange {
                t,
                t_max: self.t_max,
            });
        }
        Ok(())
    }

    pub fn check_choice(&self, choice: usize) -> Result<(), AgentError> {
        if choice >= self.n_options() {
            return Err(AgentError::ChoiceOutOfRange {
                choice,
                n_options: self.n_options(),
            });
        }
        Ok(())
    }

    /// Softmax choice at trial `t`. `bonus` adds a value to one option
    /// before the softmax without touching `Q`.
    pub fn choose(
        &mut self,
        t: usize,
        bonus: Option<(usize, f64)>,
        rng: &mut dyn RngCore,
    ) -> Result<usize, AgentError> {
        self.check_trial(t)?;

        let probs = match bonus {
            Some((option, phi)) => {
                self.check_choice(option)?;
                let mut q_eff = self.q.clone();
                q_eff[option] += phi;
                softmax(&q_eff, self.beta)
            }
            None => softmax(&self.q, self.beta),
        };

        let choice = sample_categorical(&probs, rng);
        self.memory.p_softmax[t] = probs;
        Ok(choice)
    }

    pub fn save(&mut self, choice: usize, t: usize, reward: f64) -> Result<(), AgentError> {
        self.check_choice(choice)?;
        self.check_trial(t)?;
        self.memory.choices[t] = choice;
        self.memory.rewards[t] = reward;
        Ok(())
    }

    /// Prediction error of `reward` for `choice`.
    pub fn prediction_error(&self, choice: usize, reward: f64) -> Result<f64, AgentError> {
        self.check_choice(choice)?;
        Ok(reward - self.q[choice])
    }

    /// Delta-rule update of `Q[choice]` with learning rate `alpha`.
    pub fn update(&mut self, choice: usize, alpha: f64, reward: f64) -> Result<(), AgentError> {
        let delta = self.prediction_error(choice, reward)?;
        self.q[choice] += alpha * delta;
        Ok(())
    }
}

/// Check that a learning rate lies in [0, 1].
pub(crate) fn validate_learning_rate(name: &str, alpha: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&alpha) {
        return Err(ConfigError::Validation(format!(
            "{name} must be in [0, 1] (got {alpha})"
        )));
    }
    Ok(())
}

/// Interface shared by all choice/value models.
pub trait Agent {
    /// Model name used to key aggregated results.
    fn name(&self) -> &'static str;

    fn core(&self) -> &ValueCore;

    fn core_mut(&mut self) -> &mut ValueCore;

    /// Draw an option for trial `t` from the softmax policy and log the
    /// policy in memory.
    fn choice(&mut self, t: usize, rng: &mut dyn RngCore) -> Result<usize, AgentError> {
        self.core_mut().choose(t, None, rng)
    }

    /// Update the value of `choice` from the observed `reward`.
    fn learn(&mut self, choice: usize, t: usize, reward: f64) -> Result<(), AgentError>;

    /// Record the outcome of trial `t`. Leaves `Q` untouched.
    fn save(&mut self, choice: usize, t: usize, reward: f64) -> Result<(), AgentError> {
        self.core_mut().save(choice, t, reward)
    }

    fn q_values(&self) -> &[f64] {
        self.core().q()
    }

    fn memory(&self) -> &Memory {
        self.core().memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_core_rejects_single_option() {
        assert!(ValueCore::new(1.0, 10, 1).is_err());
    }

    #[test]
    fn test_core_rejects_negative_beta() {
        assert!(ValueCore::new(-0.1, 10, 2).is_err());
    }

    #[test]
    fn test_core_rejects_zero_horizon() {
        assert!(ValueCore::new(1.0, 0, 2).is_err());
    }

    #[test]
    fn test_memory_is_preallocated() {
        let core = ValueCore::new(1.0, 4, 3).unwrap();
        assert_eq!(core.memory().choices.len(), 4);
        assert_eq!(core.memory().rewards.len(), 4);
        assert_eq!(core.memory().p_softmax.len(), 4);
        assert!(core.memory().p_softmax.iter().all(|row| row.len() == 3));
    }

    #[test]
    fn test_choose_rejects_trial_past_horizon() {
        let mut core = ValueCore::new(1.0, 2, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            core.choose(2, None, &mut rng),
            Err(AgentError::TrialOutOfRange { t: 2, t_max: 2 })
        );
    }

    #[test]
    fn test_save_rejects_bad_choice() {
        let mut core = ValueCore::new(1.0, 2, 2).unwrap();
        assert_eq!(
            core.save(2, 0, 1.0),
            Err(AgentError::ChoiceOutOfRange {
                choice: 2,
                n_options: 2
            })
        );
    }

    #[test]
    fn test_bonus_shifts_policy_only() {
        let mut core = ValueCore::new(2.0, 1, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        core.choose(0, Some((1, 1.0)), &mut rng).unwrap();
        assert_eq!(core.q(), &[0.0, 0.0]);
        let probs = &core.memory().p_softmax[0];
        assert!(probs[1] > probs[0]);
    }

    #[test]
    fn test_learning_rate_range() {
        assert!(validate_learning_rate("alpha", 0.0).is_ok());
        assert!(validate_learning_rate("alpha", 1.0).is_ok());
        assert!(validate_learning_rate("alpha", 1.01).is_err());
        assert!(validate_learning_rate("alpha", f64::NAN).is_err());
    }

    #[test]
    fn test_cognitive_params_builder() {
        let params = CognitiveParams::new(0.3, 4.0).with_alpha_neg(0.1).with_phi(0.5);
        assert_eq!(params.alpha_neg, Some(0.1));
        assert_eq!(params.phi, Some(0.5));
    }
}
