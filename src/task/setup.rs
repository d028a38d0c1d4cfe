use std::collections::BTreeSet;

use crate::error::ConfigError;
use crate::task::RewardSchedule;

/// Everything a trial sequence needs from the task: the baseline schedule,
/// the horizon, the reversal trials and the penalty value.
///
/// Validated once at construction so no malformed configuration can surface
/// mid-sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSetup {
    baseline: RewardSchedule,
    t_max: usize,
    reversal_trials: BTreeSet<usize>,
    penalty: f64,
}

impl TaskSetup {
    pub fn new(
        baseline: RewardSchedule,
        t_max: usize,
        reversal_trials: BTreeSet<usize>,
        penalty: f64,
    ) -> Result<Self, ConfigError> {
        if t_max == 0 {
            return Err(ConfigError::Validation("t_max must be > 0".into()));
        }
        if let Some(&last) = reversal_trials.iter().next_back() {
            if last >= t_max {
                return Err(ConfigError::Validation(format!(
                    "reversal trial {last} is outside [0, {t_max})"
                )));
            }
        }
        if !penalty.is_finite() {
            return Err(ConfigError::Validation(format!(
                "penalty must be finite (got {penalty})"
            )));
        }
        Ok(TaskSetup {
            baseline,
            t_max,
            reversal_trials,
            penalty,
        })
    }

    /// The configured schedule, never mutated by a sequence.
    pub fn baseline(&self) -> &RewardSchedule {
        &self.baseline
    }

    pub fn n_options(&self) -> usize {
        self.baseline.n_options()
    }

    pub fn t_max(&self) -> usize {
        self.t_max
    }

    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    pub fn reversal_trials(&self) -> &BTreeSet<usize> {
        &self.reversal_trials
    }

    pub fn is_reversal(&self, t: usize) -> bool {
        self.reversal_trials.contains(&t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> RewardSchedule {
        RewardSchedule::new(
            vec![vec![-1.0, 1.0], vec![0.0, 1.0]],
            vec![vec![0.2, 0.8], vec![0.8, 0.2]],
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_reversal_past_horizon() {
        let err = TaskSetup::new(schedule(), 10, BTreeSet::from([3, 10]), -1.0);
        match err {
            Err(ConfigError::Validation(msg)) => assert!(msg.contains("reversal trial 10"), "{msg}"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_zero_horizon() {
        assert!(TaskSetup::new(schedule(), 0, BTreeSet::new(), -1.0).is_err());
    }

    #[test]
    fn test_rejects_nan_penalty() {
        assert!(TaskSetup::new(schedule(), 5, BTreeSet::new(), f64::NAN).is_err());
    }

    #[test]
    fn test_is_reversal() {
        let setup = TaskSetup::new(schedule(), 10, BTreeSet::from([0, 5]), -1.0).unwrap();
        assert!(setup.is_reversal(0));
        assert!(setup.is_reversal(5));
        assert!(!setup.is_reversal(4));
        assert_eq!(setup.n_options(), 2);
    }
}
