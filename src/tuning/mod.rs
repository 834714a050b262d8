//! Fixed-budget hyperparameter search.
//!
//! A [`Study`] drives trials through a [`Sampler`]; [`search_best_params`]
//! wires the study to the decomposable model with in-sample MAE as the
//! objective.

pub mod sampler;
pub mod search;
pub mod study;

pub use sampler::{derive_seed, RandomSampler, Sampler};
pub use search::{in_sample_mae, search_best_params, search_with, SearchOutcome, SearchSpace};
pub use study::{ParamValue, Study, Trial, TrialRecord, TrialState};
