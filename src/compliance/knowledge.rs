//! Ley 27.401 knowledge base.
//!
//! Every number the algorithms depend on lives in this module as data: the
//! keyword weights, the score and coverage bands, and the recommendation
//! strings attached to each band. The tables are immutable; a
//! [`KnowledgeBase`] is built once at startup and shared by reference.

use regex::{Regex, RegexBuilder};
use serde::Serialize;

/// A compliance-program element the scorer looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeywordEntry {
    /// Canonical phrase, as displayed in reports.
    pub phrase: &'static str,
    /// Points awarded when the phrase is found.
    pub weight: u32,
    /// Short explanation of the element.
    pub description: &'static str,
    /// Additional spellings that count as the same element.
    #[serde(skip)]
    pub alternates: &'static [&'static str],
}

impl KeywordEntry {
    /// Iterates over the canonical phrase followed by its alternates.
    pub fn phrases(&self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.phrase).chain(self.alternates.iter().copied())
    }

    /// Returns `true` if `element` contains any of this entry's phrases,
    /// ignoring case.
    #[must_use]
    pub fn is_contained_in(&self, element: &str) -> bool {
        let element = element.to_lowercase();
        self.phrases()
            .any(|phrase| element.contains(&phrase.to_lowercase()))
    }
}

/// Qualitative level assigned by the text scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreLevel {
    /// Score of 80 or more.
    Excellent,
    /// Score from 60 to 79.
    Good,
    /// Score from 40 to 59.
    Basic,
    /// Score below 40.
    Poor,
}

impl ScoreLevel {
    /// Report label for this level.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "🟢 EXCELENTE",
            Self::Good => "🟡 BUENO",
            Self::Basic => "🟠 BÁSICO",
            Self::Poor => "🔴 INSUFICIENTE",
        }
    }
}

/// Qualitative level assigned by the checklist evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageLevel {
    /// Coverage of 80% or more.
    Excellent,
    /// Coverage from 60% up to 80%.
    Good,
    /// Coverage below 60%.
    Poor,
}

impl CoverageLevel {
    /// Report label for this level.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "🟢 EXCELENTE",
            Self::Good => "🟡 BUENO",
            Self::Poor => "🔴 INSUFICIENTE",
        }
    }
}

/// A score band: inclusive lower bound, level and fixed advice.
#[derive(Debug, Clone, Copy)]
pub struct ScoreBand {
    /// Lowest score that falls in this band.
    pub min_score: u32,
    /// Level reported for the band.
    pub level: ScoreLevel,
    /// Recommendations emitted for the band.
    pub recommendations: &'static [&'static str],
}

/// A coverage band: inclusive lower bound in percent and level.
#[derive(Debug, Clone, Copy)]
pub struct CoverageBand {
    /// Lowest coverage percentage that falls in this band.
    pub min_percent: f64,
    /// Level reported for the band.
    pub level: CoverageLevel,
}

/// Program elements, in declaration order. Weights sum to 100.
pub const PROGRAM_ELEMENTS: &[KeywordEntry] = &[
    KeywordEntry {
        phrase: "código de ética",
        weight: 15,
        description: "Conjunto de principios y valores organizacionales",
        alternates: &["codigo de etica"],
    },
    KeywordEntry {
        phrase: "capacitación",
        weight: 12,
        description: "Entrenamiento en integridad y compliance",
        alternates: &["capacitacion"],
    },
    KeywordEntry {
        phrase: "canal de denuncias",
        weight: 18,
        description: "Mecanismo seguro para reportar irregularidades",
        alternates: &["línea ética", "linea etica"],
    },
    KeywordEntry {
        phrase: "evaluación de riesgos",
        weight: 20,
        description: "Identificación y mapeo de riesgos de corrupción",
        alternates: &["evaluacion de riesgos", "matriz de riesgos"],
    },
    KeywordEntry {
        phrase: "monitoreo",
        weight: 15,
        description: "Supervisión continua del programa",
        alternates: &["auditoría", "auditoria"],
    },
    KeywordEntry {
        phrase: "due diligence",
        weight: 10,
        description: "Evaluación de terceros y socios comerciales",
        alternates: &["debida diligencia"],
    },
    KeywordEntry {
        phrase: "procedimientos disciplinarios",
        weight: 10,
        description: "Sanciones por incumplimiento",
        alternates: &["régimen disciplinario", "regimen disciplinario"],
    },
];

/// Phrases that flag exposure to corruption risk.
pub const RISK_FACTORS: &[&str] = &[
    "funcionarios públicos",
    "contrataciones estatales",
    "regulación sectorial",
    "jurisdicciones alto riesgo",
    "intermediarios",
    "pagos facilitadores",
];

/// Industries considered high risk under Ley 27.401.
pub const HIGH_RISK_INDUSTRIES: &[&str] = &[
    "construcción",
    "energía",
    "farmacéutica",
    "defensa",
    "telecomunicaciones",
    "banca",
    "seguros",
    "minería",
];

/// Score bands, highest first. The last band must start at zero.
pub const SCORE_BANDS: &[ScoreBand] = &[
    ScoreBand {
        min_score: 80,
        level: ScoreLevel::Excellent,
        recommendations: &[
            "Mantener programa vigente",
            "Revisar anualmente efectividad",
            "Actualizar según cambios normativos",
        ],
    },
    ScoreBand {
        min_score: 60,
        level: ScoreLevel::Good,
        recommendations: &[
            "Mantener y fortalecer elementos existentes",
            "Documentar evidencias de implementación",
        ],
    },
    ScoreBand {
        min_score: 40,
        level: ScoreLevel::Basic,
        recommendations: &[
            "Implementar elementos faltantes prioritarios",
            "Capacitar a personal en compliance",
        ],
    },
    ScoreBand {
        min_score: 0,
        level: ScoreLevel::Poor,
        recommendations: &[
            "Desarrollar programa de integridad integral",
            "Implementar elementos básicos urgentemente",
        ],
    },
];

/// Coverage bands, highest first.
pub const COVERAGE_BANDS: &[CoverageBand] = &[
    CoverageBand {
        min_percent: 80.0,
        level: CoverageLevel::Excellent,
    },
    CoverageBand {
        min_percent: 60.0,
        level: CoverageLevel::Good,
    },
    CoverageBand {
        min_percent: 0.0,
        level: CoverageLevel::Poor,
    },
];

/// Number of missing elements listed by the scorer.
pub const MISSING_CRITICAL_LIMIT: usize = 3;

/// The immutable table both algorithms consult.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<KeywordEntry>,
    /// One matcher per entry, same order as `entries`.
    matchers: Vec<Regex>,
    risk_factors: &'static [&'static str],
    high_risk_industries: &'static [&'static str],
    score_bands: &'static [ScoreBand],
    coverage_bands: &'static [CoverageBand],
}

impl KnowledgeBase {
    /// Builds the Ley 27.401 knowledge base from the built-in tables.
    ///
    /// # Errors
    ///
    /// Returns an error if a phrase matcher cannot be compiled.
    pub fn ley_27401() -> Result<Self, regex::Error> {
        Self::new(
            PROGRAM_ELEMENTS,
            RISK_FACTORS,
            HIGH_RISK_INDUSTRIES,
            SCORE_BANDS,
            COVERAGE_BANDS,
        )
    }

    /// Builds a knowledge base from explicit tables.
    ///
    /// # Errors
    ///
    /// Returns an error if a phrase matcher cannot be compiled.
    pub fn new(
        entries: &[KeywordEntry],
        risk_factors: &'static [&'static str],
        high_risk_industries: &'static [&'static str],
        score_bands: &'static [ScoreBand],
        coverage_bands: &'static [CoverageBand],
    ) -> Result<Self, regex::Error> {
        let matchers = entries
            .iter()
            .map(compile_matcher)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            entries = entries.len(),
            risk_factors = risk_factors.len(),
            industries = high_risk_industries.len(),
            "Knowledge base loaded"
        );

        Ok(Self {
            entries: entries.to_vec(),
            matchers,
            risk_factors,
            high_risk_industries,
            score_bands,
            coverage_bands,
        })
    }

    /// Entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[KeywordEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entry weights; the highest reachable score.
    #[must_use]
    pub fn total_weight(&self) -> u32 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    /// Entries whose phrase (or an alternate) occurs in `text`.
    pub fn entries_in_text<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a KeywordEntry> {
        self.entries
            .iter()
            .zip(&self.matchers)
            .filter(move |(_, matcher)| matcher.is_match(text))
            .map(|(entry, _)| entry)
    }

    /// Risk-factor phrases present in `text`, in table order.
    #[must_use]
    pub fn risk_factors_in(&self, text: &str) -> Vec<String> {
        let text = text.to_lowercase();
        self.risk_factors
            .iter()
            .filter(|risk| text.contains(&risk.to_lowercase()))
            .map(ToString::to_string)
            .collect()
    }

    /// Returns `true` if any high-risk industry name occurs in `haystack`.
    #[must_use]
    pub fn mentions_high_risk_industry(&self, haystack: &str) -> bool {
        let haystack = haystack.to_lowercase();
        self.high_risk_industries
            .iter()
            .any(|industry| haystack.contains(&industry.to_lowercase()))
    }

    /// The band a score falls into.
    #[must_use]
    pub fn score_band(&self, score: u32) -> Option<&ScoreBand> {
        self.score_bands
            .iter()
            .find(|band| score >= band.min_score)
            .or_else(|| self.score_bands.last())
    }

    /// The level a coverage percentage falls into.
    #[must_use]
    pub fn coverage_level(&self, percent: f64) -> CoverageLevel {
        self.coverage_bands
            .iter()
            .find(|band| percent >= band.min_percent)
            .map_or(CoverageLevel::Poor, |band| band.level)
    }
}

/// Compiles one case-insensitive matcher for an entry, with each run of
/// whitespace in a phrase relaxed to `\s*`.
fn compile_matcher(entry: &KeywordEntry) -> Result<Regex, regex::Error> {
    let alternatives: Vec<String> = entry.phrases().map(phrase_pattern).collect();
    RegexBuilder::new(&format!("(?:{})", alternatives.join("|")))
        .case_insensitive(true)
        .build()
}

fn phrase_pattern(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s*")
}
