//! Heuristic email analysis.
//!
//! Suggests labels, priority, sentiment and a coarse category from keywords
//! in the subject and body. No model is involved.

mod heuristics;
mod model;

pub use heuristics::analyze;
pub use model::{
    AnalysisLevel, AnalysisOptions, AnalysisResult, GENERAL_CATEGORY, Priority, Sentiment,
};
