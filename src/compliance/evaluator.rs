//! Checklist coverage against the knowledge base.

use serde::Serialize;

use crate::compliance::knowledge::{CoverageLevel, KeywordEntry, KnowledgeBase};
use crate::error::{ComplianceError, ComplianceResult};

/// Outcome of evaluating a checklist of implemented elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageResult {
    /// Company being evaluated.
    pub company: String,
    /// Qualitative level for `coverage_percent`.
    pub level: CoverageLevel,
    /// Share of knowledge-base entries covered, rounded to one decimal.
    pub coverage_percent: f64,
    /// Input elements that matched at least one entry, in input order.
    pub implemented_elements: Vec<String>,
    /// Entries no input element covers, in knowledge-base order.
    pub missing_elements: Vec<KeywordEntry>,
    /// Number of entries in the knowledge base.
    pub total_elements: usize,
}

impl CoverageResult {
    /// Number of knowledge-base entries covered.
    #[must_use]
    pub fn covered_count(&self) -> usize {
        self.total_elements - self.missing_elements.len()
    }
}

/// Evaluates which knowledge-base entries `elements` cover.
///
/// An entry is covered when some element contains its phrase, or one of
/// its alternates, ignoring case.
///
/// # Errors
///
/// Returns [`ComplianceError::InvalidArgument`] if `company` is empty.
pub fn evaluate<S: AsRef<str>>(
    kb: &KnowledgeBase,
    elements: &[S],
    company: &str,
) -> ComplianceResult<CoverageResult> {
    if company.trim().is_empty() {
        return Err(ComplianceError::invalid("empresa", "company name must not be empty"));
    }

    let implemented_elements: Vec<String> = elements
        .iter()
        .map(AsRef::as_ref)
        .filter(|element| kb.entries().iter().any(|entry| entry.is_contained_in(element)))
        .map(ToString::to_string)
        .collect();

    let missing_elements: Vec<KeywordEntry> = kb
        .entries()
        .iter()
        .filter(|entry| {
            !elements
                .iter()
                .any(|element| entry.is_contained_in(element.as_ref()))
        })
        .copied()
        .collect();

    let total_elements = kb.len();
    let coverage_percent = coverage_percent(total_elements - missing_elements.len(), total_elements);
    let level = kb.coverage_level(coverage_percent);

    tracing::debug!(
        company,
        coverage_percent,
        implemented = implemented_elements.len(),
        missing = missing_elements.len(),
        "Checklist evaluated"
    );

    Ok(CoverageResult {
        company: company.to_string(),
        level,
        coverage_percent,
        implemented_elements,
        missing_elements,
        total_elements,
    })
}

#[allow(clippy::cast_precision_loss)] // Entry counts are tiny
fn coverage_percent(covered: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = 100.0 * covered as f64 / total as f64;
    (raw * 10.0).round() / 10.0
}
