//! Choice/value models: the shared agent contract, softmax policy and the
//! three Q-learning variants.

mod agent;
pub mod algorithms;
pub mod policy;

pub use agent::{Agent, CognitiveParams, Memory, ValueCore};
pub use algorithms::{
    AsymmetricQLearningAgent, ModelKind, PerseverationQLearningAgent, QLearningAgent,
};
