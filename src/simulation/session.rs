use rand::RngCore;
use tracing::trace;

use crate::ai::{Agent, Memory};
use crate::error::AgentError;
use crate::simulation::progress::ProgressTracker;
use crate::task::TaskSetup;

/// Everything recorded while one agent runs through the task.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionTrace {
    pub memory: Memory,
    pub correct_choices: Vec<bool>,
    pub risky_choice: Vec<bool>,
    /// Number of reversals applied during the sequence.
    pub reversals: usize,
    /// Value estimates after the last trial.
    pub final_q: Vec<f64>,
}

/// Run one agent through `task.t_max()` trials.
///
/// The sequence works on its own copy of the baseline schedule, so
/// reversals applied here are discarded with the copy and the next agent
/// starts from the configured orientation. An agent whose option count or
/// horizon differs from the task is rejected before trial 0. On error the
/// partial trace is dropped.
pub fn run_session(
    agent: &mut dyn Agent,
    task: &TaskSetup,
    rng: &mut dyn RngCore,
    progress: &dyn ProgressTracker,
) -> Result<SessionTrace, AgentError> {
    check_fits(agent, task)?;

    let t_max = task.t_max();
    let mut schedule = task.baseline().clone();
    let mut correct_choices = Vec::with_capacity(t_max);
    let mut risky_choice = Vec::with_capacity(t_max);
    let mut reversals = 0;

    for t in 0..t_max {
        if task.is_reversal(t) {
            schedule.reverse();
            reversals += 1;
        }

        let choice = agent.choice(t, rng)?;
        if choice >= schedule.n_options() {
            return Err(AgentError::ChoiceOutOfRange {
                choice,
                n_options: schedule.n_options(),
            });
        }

        correct_choices.push(schedule.is_correct(choice));
        risky_choice.push(schedule.is_risky(choice, task.penalty()));

        let reward = schedule.draw(choice, rng);

        agent.save(choice, t, reward)?;
        if t != t_max - 1 {
            agent.learn(choice, t, reward)?;
        }

        trace!(agent = agent.name(), t, choice, reward, "trial");
        progress.update();
    }

    Ok(SessionTrace {
        memory: agent.memory().clone(),
        correct_choices,
        risky_choice,
        reversals,
        final_q: agent.q_values().to_vec(),
    })
}

fn check_fits(agent: &dyn Agent, task: &TaskSetup) -> Result<(), AgentError> {
    let core = agent.core();
    if core.n_options() != task.n_options() {
        return Err(AgentError::TaskMismatch {
            field: "n_options",
            agent: core.n_options(),
            task: task.n_options(),
        });
    }
    if core.t_max() != task.t_max() {
        return Err(AgentError::TaskMismatch {
            field: "t_max",
            agent: core.t_max(),
            task: task.t_max(),
        });
    }
    Ok(())
}
