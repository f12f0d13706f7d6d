//! Feedback generation: target-value search and message synthesis

pub mod suggest;
pub mod synth;

pub use suggest::{clamp_boolean, improves_on, suggest_target_value, Suggestion};
pub use synth::{give_feedback, CategorizedFeedback};
