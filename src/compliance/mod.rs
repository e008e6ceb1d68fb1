//! Compliance scoring for Ley 27.401 integrity programs.
//!
//! - [`knowledge`] — keyword table, bands and recommendation strings
//! - [`scorer`] — weighted keyword scan over free text
//! - [`evaluator`] — coverage of a checklist of implemented elements
//! - [`report`] — Markdown rendering of both results
//!
//! Both algorithms are pure functions of their inputs and the
//! [`KnowledgeBase`].

pub mod evaluator;
pub mod knowledge;
pub mod report;
pub mod scorer;

pub use evaluator::{evaluate, CoverageResult};
pub use knowledge::{CoverageLevel, KeywordEntry, KnowledgeBase, ScoreLevel};
pub use scorer::{score, ScoreResult};
