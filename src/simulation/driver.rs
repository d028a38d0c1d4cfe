use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ai::{CognitiveParams, ModelKind};
use crate::error::{ConfigError, SimulationError};
use crate::persistence::ResultSink;
use crate::simulation::progress::ProgressTracker;
use crate::simulation::results::{ModelResults, SimulationResults};
use crate::simulation::session::{run_session, SessionTrace};
use crate::task::{RewardSchedule, TaskSetup};

/// Cognitive parameters for each model variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    pub q_learning: CognitiveParams,
    pub asymmetric_q_learning: CognitiveParams,
    pub perseveration_q_learning: CognitiveParams,
}

impl Default for ModelParams {
    fn default() -> Self {
        ModelParams {
            q_learning: CognitiveParams::new(0.3, 5.0),
            asymmetric_q_learning: CognitiveParams::new(0.4, 5.0).with_alpha_neg(0.1),
            perseveration_q_learning: CognitiveParams::new(0.3, 5.0).with_phi(0.5),
        }
    }
}

impl ModelParams {
    pub fn get(&self, kind: ModelKind) -> &CognitiveParams {
        match kind {
            ModelKind::QLearning => &self.q_learning,
            ModelKind::AsymmetricQLearning => &self.asymmetric_q_learning,
            ModelKind::PerseverationQLearning => &self.perseveration_q_learning,
        }
    }
}

/// Task and population configuration for one experimental condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Label identifying the condition; also names the output file.
    pub condition: String,
    /// Informational only.
    pub n_sessions: usize,
    pub t_max: usize,
    pub n_agents: usize,
    pub n_options: usize,
    pub rewards: Vec<Vec<f64>>,
    pub p: Vec<Vec<f64>>,
    pub t_when_reversal_occurs: BTreeSet<usize>,
    /// Outcome value that marks an option as risky.
    pub penalty: f64,
    /// Base seed from which every agent's random stream is derived.
    pub seed: u64,
    /// Run the agents of each variant on the rayon pool.
    pub parallel: bool,
    pub cognitive_params: ModelParams,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            condition: "baseline".into(),
            n_sessions: 1,
            t_max: 100,
            n_agents: 30,
            n_options: 2,
            rewards: vec![vec![-1.0, 1.0], vec![0.0, 1.0]],
            p: vec![vec![0.2, 0.8], vec![0.8, 0.2]],
            t_when_reversal_occurs: BTreeSet::from([50]),
            penalty: -1.0,
            seed: 0,
            parallel: false,
            cognitive_params: ModelParams::default(),
        }
    }
}

impl SimulationConfig {
    /// Build the validated task setup described by this configuration.
    pub fn task_setup(&self) -> Result<TaskSetup, ConfigError> {
        if self.condition.trim().is_empty() {
            return Err(ConfigError::Validation("condition must not be empty".into()));
        }
        if self.n_agents == 0 {
            return Err(ConfigError::Validation("n_agents must be > 0".into()));
        }
        if self.n_options < 2 {
            return Err(ConfigError::Validation("n_options must be >= 2".into()));
        }
        let schedule = RewardSchedule::new(self.rewards.clone(), self.p.clone())?;
        if schedule.n_options() != self.n_options {
            return Err(ConfigError::Validation(format!(
                "n_options is {} but rewards/p describe {} options",
                self.n_options,
                schedule.n_options()
            )));
        }
        TaskSetup::new(
            schedule,
            self.t_max,
            self.t_when_reversal_occurs.clone(),
            self.penalty,
        )
    }

    /// Check every variant's cognitive parameters by constructing a
    /// throwaway agent.
    pub fn validate_models(&self) -> Result<(), ConfigError> {
        for kind in ModelKind::ALL {
            kind.build(self.cognitive_params.get(kind), self.t_max, self.n_options)
                .map_err(|e| match e {
                    ConfigError::Validation(msg) => {
                        ConfigError::Validation(format!("{}: {msg}", kind.name()))
                    }
                    other => other,
                })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.task_setup()?;
        self.validate_models()
    }

    /// Trials simulated over a whole run (all variants, all agents).
    pub fn total_trials(&self) -> usize {
        ModelKind::ALL.len() * self.n_agents * self.t_max
    }
}

/// Derive a deterministic seed for one agent of one model variant.
pub fn agent_seed(base_seed: u64, model_index: usize, agent_index: usize) -> u64 {
    // FNV-1a-style mixing for deterministic, well-distributed seeds
    let mut hash = base_seed ^ 0x517cc1b727220a95;
    for index in [model_index as u64, agent_index as u64] {
        hash = hash.wrapping_mul(0x100000001b3);
        hash ^= index;
        hash = hash.wrapping_mul(0x100000001b3);
        hash ^= index >> 32;
    }
    hash
}

/// Runs every model variant over a population of independent agents.
pub struct Simulation {
    config: SimulationConfig,
    setup: TaskSetup,
}

impl Simulation {
    /// Validate `config` up front; nothing is simulated on failure.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        let setup = config.task_setup()?;
        config.validate_models()?;
        Ok(Simulation { config, setup })
    }

    pub fn setup(&self) -> &TaskSetup {
        &self.setup
    }

    /// Run all variants and collect their tensors.
    pub fn run(&self, progress: &dyn ProgressTracker) -> Result<SimulationResults, SimulationError> {
        info!(
            condition = %self.config.condition,
            n_agents = self.config.n_agents,
            t_max = self.config.t_max,
            reversals = ?self.config.t_when_reversal_occurs,
            parallel = self.config.parallel,
            "starting simulation"
        );

        let mut results = BTreeMap::new();
        for kind in ModelKind::ALL {
            let model_results = self.run_model(kind, progress)?;
            progress.close();

            let summary = model_results.summary();
            info!(
                model = kind.name(),
                correct_rate = summary.correct_rate,
                risky_rate = summary.risky_rate,
                mean_reward = summary.mean_reward,
                "model finished"
            );
            results.insert(kind.name().to_string(), model_results);
        }

        Ok(SimulationResults {
            params: self.config.clone(),
            condition: self.config.condition.clone(),
            results,
        })
    }

    /// Run all variants and hand the bundle to `sink`.
    pub fn run_and_persist(
        &self,
        progress: &dyn ProgressTracker,
        sink: &mut dyn ResultSink,
    ) -> Result<SimulationResults, SimulationError> {
        let results = self.run(progress)?;
        if let Some(path) = sink.persist(&results)? {
            info!(condition = %results.condition, path = %path.display(), "results saved");
        }
        Ok(results)
    }

    /// Run every agent of one variant. Rows are assembled only once all
    /// agents succeeded, so a failed agent never leaves a partial row.
    pub fn run_model(
        &self,
        kind: ModelKind,
        progress: &dyn ProgressTracker,
    ) -> Result<ModelResults, SimulationError> {
        let n_agents = self.config.n_agents;
        let traces: Vec<SessionTrace> = if self.config.parallel {
            (0..n_agents)
                .into_par_iter()
                .map(|n| self.run_agent(kind, n, progress))
                .collect::<Result<_, _>>()?
        } else {
            (0..n_agents)
                .map(|n| self.run_agent(kind, n, progress))
                .collect::<Result<_, _>>()?
        };

        let mut results = ModelResults::with_capacity(n_agents);
        for trace in traces {
            results.push_trace(trace);
        }
        Ok(results)
    }

    /// Run agent `index` of `kind` on its own seeded stream.
    pub fn run_agent(
        &self,
        kind: ModelKind,
        index: usize,
        progress: &dyn ProgressTracker,
    ) -> Result<SessionTrace, SimulationError> {
        let params = self.config.cognitive_params.get(kind);
        let mut agent = kind.build(params, self.setup.t_max(), self.setup.n_options())?;
        let mut rng = StdRng::seed_from_u64(agent_seed(self.config.seed, kind.index(), index));

        let trace = run_session(agent.as_mut(), &self.setup, &mut rng, progress).map_err(
            |source| SimulationError::Agent {
                model: kind.name(),
                agent: index,
                source,
            },
        )?;

        debug!(
            model = kind.name(),
            agent = index,
            reversals = trace.reversals,
            final_q = ?trace.final_q,
            "agent finished"
        );
        Ok(trace)
    }
}
