use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::simulation::driver::SimulationConfig;
use crate::simulation::session::SessionTrace;

/// Per-agent, per-trial tensors for one model variant. Row `n` belongs to
/// agent `n`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelResults {
    pub choices: Vec<Vec<usize>>,
    pub rewards: Vec<Vec<f64>>,
    pub correct_choices: Vec<Vec<bool>>,
    pub risky_choice: Vec<Vec<bool>>,
    pub p_softmax: Vec<Vec<Vec<f64>>>,
}

/// Aggregate rates over every agent and trial of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub correct_rate: f64,
    pub risky_rate: f64,
    pub mean_reward: f64,
}

impl ModelResults {
    pub fn with_capacity(n_agents: usize) -> Self {
        ModelResults {
            choices: Vec::with_capacity(n_agents),
            rewards: Vec::with_capacity(n_agents),
            correct_choices: Vec::with_capacity(n_agents),
            risky_choice: Vec::with_capacity(n_agents),
            p_softmax: Vec::with_capacity(n_agents),
        }
    }

    /// Append one agent's full trace as the next row.
    pub fn push_trace(&mut self, trace: SessionTrace) {
        self.choices.push(trace.memory.choices);
        self.rewards.push(trace.memory.rewards);
        self.p_softmax.push(trace.memory.p_softmax);
        self.correct_choices.push(trace.correct_choices);
        self.risky_choice.push(trace.risky_choice);
    }

    pub fn n_agents(&self) -> usize {
        self.choices.len()
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            correct_rate: mean_flag(&self.correct_choices),
            risky_rate: mean_flag(&self.risky_choice),
            mean_reward: mean(self.rewards.iter().flatten().copied()),
        }
    }

    /// Fraction of agents making the correct choice at each trial.
    pub fn correct_rate_by_trial(&self) -> Vec<f64> {
        let t_max = self.correct_choices.first().map_or(0, Vec::len);
        (0..t_max)
            .map(|t| mean(self.correct_choices.iter().map(|row| f64::from(u8::from(row[t])))))
            .collect()
    }
}

fn mean_flag(rows: &[Vec<bool>]) -> f64 {
    mean(rows.iter().flatten().map(|&b| f64::from(u8::from(b))))
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        return 0.0;
    }
    sum / n as f64
}

/// Everything produced by one run of the driver for one condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResults {
    pub params: SimulationConfig,
    pub condition: String,
    /// Keyed by model name.
    pub results: BTreeMap<String, ModelResults>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Memory;

    fn trace(choices: Vec<usize>, rewards: Vec<f64>, correct: Vec<bool>, risky: Vec<bool>) -> SessionTrace {
        let t_max = choices.len();
        SessionTrace {
            memory: Memory {
                choices,
                rewards,
                p_softmax: vec![vec![0.5, 0.5]; t_max],
            },
            correct_choices: correct,
            risky_choice: risky,
            reversals: 0,
            final_q: vec![0.0, 0.0],
        }
    }

    #[test]
    fn test_push_trace_appends_rows() {
        let mut results = ModelResults::with_capacity(2);
        results.push_trace(trace(vec![0, 1], vec![1.0, 0.0], vec![true, false], vec![false, false]));
        results.push_trace(trace(vec![1, 1], vec![0.0, 0.0], vec![false, false], vec![true, true]));
        assert_eq!(results.n_agents(), 2);
        assert_eq!(results.choices[1], vec![1, 1]);
        assert_eq!(results.p_softmax[0].len(), 2);
    }

    #[test]
    fn test_summary_rates() {
        let mut results = ModelResults::default();
        results.push_trace(trace(vec![0, 1], vec![1.0, -1.0], vec![true, false], vec![false, true]));
        results.push_trace(trace(vec![0, 0], vec![1.0, 1.0], vec![true, true], vec![false, false]));
        let summary = results.summary();
        assert!((summary.correct_rate - 0.75).abs() < 1e-12);
        assert!((summary.risky_rate - 0.25).abs() < 1e-12);
        assert!((summary.mean_reward - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_correct_rate_by_trial() {
        let mut results = ModelResults::default();
        results.push_trace(trace(vec![0, 1], vec![1.0, 0.0], vec![true, false], vec![false, false]));
        results.push_trace(trace(vec![0, 0], vec![1.0, 1.0], vec![true, true], vec![false, false]));
        assert_eq!(results.correct_rate_by_trial(), vec![1.0, 0.5]);
    }

    #[test]
    fn test_empty_summary_is_zero() {
        let summary = ModelResults::default().summary();
        assert_eq!(summary.correct_rate, 0.0);
        assert!(ModelResults::default().correct_rate_by_trial().is_empty());
    }
}
