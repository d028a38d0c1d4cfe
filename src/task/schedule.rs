use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ai::policy::sample_categorical;
use crate::error::ConfigError;

/// Tolerance used when checking that each probability row sums to 1.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Reward contingencies of the task: the possible payoffs of each option and
/// the probability of each payoff.
///
/// Row `k` of `rewards` and row `k` of `p` describe option `k`. A reversal
/// reverses the order of the rows in both matrices at once, so option 0 and
/// option 1 swap roles in a two-option task.
///
/// The schedule is a plain owned value. Each agent's trial sequence works on
/// its own clone, which keeps reversals from leaking between agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSchedule")]
pub struct RewardSchedule {
    rewards: Vec<Vec<f64>>,
    p: Vec<Vec<f64>>,
}

/// Unchecked wire form; deserialization goes through [`RewardSchedule::new`].
#[derive(Deserialize)]
struct RawSchedule {
    rewards: Vec<Vec<f64>>,
    p: Vec<Vec<f64>>,
}

impl TryFrom<RawSchedule> for RewardSchedule {
    type Error = ConfigError;

    fn try_from(raw: RawSchedule) -> Result<Self, Self::Error> {
        RewardSchedule::new(raw.rewards, raw.p)
    }
}

impl RewardSchedule {
    /// Build a schedule, checking shapes and probability rows.
    pub fn new(rewards: Vec<Vec<f64>>, p: Vec<Vec<f64>>) -> Result<Self, ConfigError> {
        if rewards.len() < 2 {
            return Err(ConfigError::Validation(format!(
                "rewards must have at least 2 option rows (got {})",
                rewards.len()
            )));
        }
        if rewards.len() != p.len() {
            return Err(ConfigError::Validation(format!(
                "rewards has {} option rows but p has {}",
                rewards.len(),
                p.len()
            )));
        }

        let n_outcomes = rewards[0].len();
        if n_outcomes == 0 {
            return Err(ConfigError::Validation(
                "each option must have at least one outcome".into(),
            ));
        }

        for (option, (reward_row, p_row)) in rewards.iter().zip(&p).enumerate() {
            if reward_row.len() != n_outcomes || p_row.len() != n_outcomes {
                return Err(ConfigError::Validation(format!(
                    "option {option}: expected {n_outcomes} outcomes, got {} rewards and {} probabilities",
                    reward_row.len(),
                    p_row.len()
                )));
            }
            if reward_row.iter().any(|r| !r.is_finite()) {
                return Err(ConfigError::Validation(format!(
                    "option {option}: rewards must be finite"
                )));
            }
            if p_row.iter().any(|&q| !(0.0..=1.0).contains(&q)) {
                return Err(ConfigError::Validation(format!(
                    "option {option}: probabilities must be in [0, 1]"
                )));
            }
            let sum: f64 = p_row.iter().sum();
            if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
                return Err(ConfigError::Validation(format!(
                    "option {option}: probabilities sum to {sum}, expected 1"
                )));
            }
        }

        Ok(RewardSchedule { rewards, p })
    }

    pub fn n_options(&self) -> usize {
        self.rewards.len()
    }

    pub fn rewards(&self) -> &[Vec<f64>] {
        &self.rewards
    }

    pub fn p(&self) -> &[Vec<f64>] {
        &self.p
    }

    /// Reverse the option order of both matrices.
    pub fn reverse(&mut self) {
        self.rewards.reverse();
        self.p.reverse();
    }

    /// Expected payoff of `option` under the current orientation.
    pub fn expected_value(&self, option: usize) -> f64 {
        self.rewards[option]
            .iter()
            .zip(&self.p[option])
            .map(|(r, q)| r * q)
            .sum()
    }

    /// Whether `choice` is at least as good as every other option.
    pub fn is_correct(&self, choice: usize) -> bool {
        let chosen = self.expected_value(choice);
        (0..self.n_options())
            .filter(|&k| k != choice)
            .all(|k| chosen >= self.expected_value(k))
    }

    /// Whether `option` can pay out `penalty`. Independent of any draw.
    pub fn is_risky(&self, option: usize, penalty: f64) -> bool {
        self.rewards[option].iter().any(|&r| r == penalty)
    }

    /// Draw the realised payoff of `option`.
    pub fn draw<R: Rng + ?Sized>(&self, option: usize, rng: &mut R) -> f64 {
        let outcome = sample_categorical(&self.p[option], rng);
        self.rewards[option][outcome]
    }
}
