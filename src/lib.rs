//! # ML Reversal Learning
//!
//! Q-learning agents on a probabilistic two-armed bandit whose reward
//! contingencies reverse at scheduled trials. Every agent's choices, rewards,
//! softmax policies and correctness/riskiness flags are recorded per trial
//! for later analysis.
//!
//! ## Modules
//!
//! - [`ai`] — Agent trait, softmax policy, Q-learning variants
//! - [`task`] — Reward schedule, reversals, validated task setup
//! - [`simulation`] — Trial controller, population driver, progress, results
//! - [`persistence`] — Result sinks (JSON files, in-memory)
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod persistence;
pub mod simulation;
pub mod task;
