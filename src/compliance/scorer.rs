//! Free-text keyword scoring.

use serde::Serialize;

use crate::compliance::knowledge::{KeywordEntry, KnowledgeBase, ScoreLevel, MISSING_CRITICAL_LIMIT};
use crate::error::{ComplianceError, ComplianceResult};

/// Company name used when the caller does not give one.
pub const DEFAULT_COMPANY: &str = "unspecified";

/// Warning appended when the text or industry names a high-risk sector.
pub const HIGH_RISK_INDUSTRY_WARNING: &str = "⚠️ Industria de alto riesgo - reforzar controles";

/// Outcome of scoring one text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Company the text belongs to.
    pub company: String,
    /// Industry as supplied by the caller (may be empty).
    pub industry: String,
    /// Qualitative level for `score`.
    pub level: ScoreLevel,
    /// Sum of the weights of `detected_elements`.
    pub score: u32,
    /// Entries found in the text, in knowledge-base order.
    pub detected_elements: Vec<KeywordEntry>,
    /// Risk-factor phrases found in the text.
    pub risk_factors: Vec<String>,
    /// Whether the industry or the text names a high-risk sector.
    pub industry_is_high_risk: bool,
    /// Level advice followed by any risk warnings.
    pub recommendations: Vec<String>,
    /// First entries not detected, in knowledge-base order.
    pub missing_critical_elements: Vec<KeywordEntry>,
}

/// Scores `text` against the knowledge base.
///
/// # Errors
///
/// Returns [`ComplianceError::InvalidArgument`] if `text` is empty or only
/// whitespace.
pub fn score(
    kb: &KnowledgeBase,
    text: &str,
    company: &str,
    industry: &str,
) -> ComplianceResult<ScoreResult> {
    if text.trim().is_empty() {
        return Err(ComplianceError::invalid("texto", "text to analyse must not be empty"));
    }

    let detected_elements: Vec<KeywordEntry> = kb.entries_in_text(text).copied().collect();
    let score = detected_elements.iter().map(|e| e.weight).sum();

    let risk_factors = kb.risk_factors_in(text);
    let industry_is_high_risk =
        kb.mentions_high_risk_industry(industry) || kb.mentions_high_risk_industry(text);

    let band = kb.score_band(score);
    let level = band.map_or(ScoreLevel::Poor, |b| b.level);

    let mut recommendations: Vec<String> = band
        .map(|b| b.recommendations)
        .unwrap_or_default()
        .iter()
        .map(ToString::to_string)
        .collect();
    if !risk_factors.is_empty() {
        recommendations.push(format!(
            "⚠️ Factores de riesgo detectados: {}",
            risk_factors.join(", ")
        ));
    }
    if industry_is_high_risk {
        recommendations.push(HIGH_RISK_INDUSTRY_WARNING.to_string());
    }

    let missing_critical_elements = kb
        .entries()
        .iter()
        .filter(|entry| !detected_elements.contains(entry))
        .take(MISSING_CRITICAL_LIMIT)
        .copied()
        .collect();

    tracing::debug!(
        company,
        score,
        detected = detected_elements.len(),
        risks = risk_factors.len(),
        "Text scored"
    );

    Ok(ScoreResult {
        company: company.to_string(),
        industry: industry.to_string(),
        level,
        score,
        detected_elements,
        risk_factors,
        industry_is_high_risk,
        recommendations,
        missing_critical_elements,
    })
}
