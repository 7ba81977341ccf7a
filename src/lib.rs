//! Markov Press — prefix/suffix Markov chain text generation.
//!
//! Learns which words follow each run of `k` words in a corpus, then walks
//! that table at random to produce new text with the same local structure.
//! Corpora can be split into units with an end-of-unit marker so that a walk
//! starts and stops at unit boundaries.

pub mod core;

pub use crate::core::chain::{build_chain, load_chain, save_chain, Chain, MarkovError};
pub use crate::core::config::EngineConfig;
pub use crate::core::generator::{
    generate, GenerateOptions, Generated, Generator, Sampler, StopReason, TerminationMode,
};
