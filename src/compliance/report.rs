//! Markdown rendering of scoring and evaluation results.
//!
//! These are the texts returned in a tool's `content[0].text`.

use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::assist::AssistStatus;
use crate::compliance::evaluator::CoverageResult;
use crate::compliance::scorer::ScoreResult;

/// Renders a text-analysis report.
#[must_use]
pub fn score_report(
    result: &ScoreResult,
    max_score: u32,
    assist: &AssistStatus,
    date: NaiveDate,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "**📊 ANÁLISIS COMPLIANCE LEY 27401**\n");
    let _ = writeln!(out, "**Empresa:** {}", result.company);
    let _ = writeln!(out, "**Industria:** {}", display_industry(&result.industry));
    let _ = writeln!(out, "**Fecha:** {}", date.format("%d/%m/%Y"));
    let _ = writeln!(out, "**Nivel de Cumplimiento:** {}", result.level.label());
    let _ = writeln!(out, "**Score:** {}/{max_score}\n", result.score);

    let _ = writeln!(
        out,
        "**✅ Elementos Detectados ({}):**",
        result.detected_elements.len()
    );
    if result.detected_elements.is_empty() {
        let _ = writeln!(out, "• Ningún elemento de programa de integridad identificado");
    }
    for e in &result.detected_elements {
        let _ = writeln!(out, "• {} ({}pts) - {}", e.phrase, e.weight, e.description);
    }

    let _ = writeln!(out, "\n**⚠️ Factores de Riesgo:**");
    if result.risk_factors.is_empty() {
        let _ = writeln!(out, "• No se detectaron factores de riesgo específicos");
    }
    for risk in &result.risk_factors {
        let _ = writeln!(out, "• {risk}");
    }

    let _ = writeln!(out, "\n**🎯 Recomendaciones:**");
    for rec in &result.recommendations {
        let _ = writeln!(out, "• {rec}");
    }

    if !result.missing_critical_elements.is_empty() {
        let _ = writeln!(out, "\n**📋 Elementos Faltantes Críticos:**");
        for e in &result.missing_critical_elements {
            let _ = writeln!(out, "• {} - {}", e.phrase, e.description);
        }
    }

    let _ = writeln!(out, "\n**🤖 Análisis IA:** {}", assist.summary());
    out.truncate(out.trim_end().len());
    out
}

/// Renders a checklist-evaluation report.
#[must_use]
pub fn coverage_report(result: &CoverageResult, industry: &str, date: NaiveDate) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "**📈 EVALUACIÓN PROGRAMA INTEGRIDAD - {}**\n",
        result.company
    );
    if !industry.trim().is_empty() {
        let _ = writeln!(out, "**Industria:** {industry}");
    }
    let _ = writeln!(out, "**Fecha:** {}", date.format("%d/%m/%Y"));
    let _ = writeln!(out, "**Resultado:** {}", result.level.label());
    let _ = writeln!(
        out,
        "**Cobertura:** {:.1}% ({}/{})\n",
        result.coverage_percent,
        result.covered_count(),
        result.total_elements
    );

    let _ = writeln!(out, "**✅ Elementos Implementados:**");
    if result.implemented_elements.is_empty() {
        let _ = writeln!(out, "Ninguno detectado");
    }
    for e in &result.implemented_elements {
        let _ = writeln!(out, "• {e}");
    }

    let _ = writeln!(out, "\n**❌ Elementos Faltantes:**");
    if result.missing_elements.is_empty() {
        let _ = writeln!(out, "Ninguno");
    }
    for e in &result.missing_elements {
        let _ = writeln!(out, "• {} - {}", e.phrase, e.description);
    }

    out.truncate(out.trim_end().len());
    out
}

fn display_industry(industry: &str) -> &str {
    if industry.trim().is_empty() {
        "No especificada"
    } else {
        industry
    }
}
