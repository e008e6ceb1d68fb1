//! Integration tests for the keyword scorer and the checklist evaluator.
//!
//! These exercise the public compliance API end to end against the
//! built-in Ley 27.401 knowledge base.

use integridai_mcp::compliance::{evaluate, score, CoverageLevel, KnowledgeBase, ScoreLevel};

fn kb() -> KnowledgeBase {
    KnowledgeBase::ley_27401().expect("built-in knowledge base compiles")
}

// =============================================================================
// Text Scoring
// =============================================================================

#[test]
fn test_ethics_code_and_whistleblower_channel() {
    let result = score(
        &kb(),
        "Nuestra empresa tiene código de ética y canal de denuncias",
        "Acme",
        "",
    )
    .unwrap();

    assert_eq!(result.score, 33);
    assert_eq!(result.level, ScoreLevel::Poor);
    let phrases: Vec<&str> = result.detected_elements.iter().map(|e| e.phrase).collect();
    assert_eq!(phrases, ["código de ética", "canal de denuncias"]);
    assert_eq!(result.missing_critical_elements.len(), 3);
    assert_eq!(result.missing_critical_elements[0].phrase, "capacitación");
}

#[test]
fn test_full_program_is_excellent() {
    let text = "Contamos con CÓDIGO DE ÉTICA, capacitación anual, canal de denuncias, \
                evaluación de riesgos, monitoreo continuo, due diligence de terceros y \
                procedimientos disciplinarios.";
    let result = score(&kb(), text, "Acme", "").unwrap();

    assert_eq!(result.score, 100);
    assert_eq!(result.level, ScoreLevel::Excellent);
    assert!(result.missing_critical_elements.is_empty());
}

#[test]
fn test_score_counts_each_entry_once() {
    let result = score(
        &kb(),
        "monitoreo, monitoreo y auditoría externa",
        "Acme",
        "",
    )
    .unwrap();

    assert_eq!(result.score, 15);
    assert_eq!(result.detected_elements.len(), 1);
}

#[test]
fn test_whitespace_between_words_is_tolerated() {
    let result = score(&kb(), "Implementamos   due\ndiligence", "Acme", "").unwrap();
    assert_eq!(result.score, 10);
}

#[test]
fn test_high_risk_industry_warning_comes_last() {
    let result = score(
        &kb(),
        "Operamos con intermediarios ante funcionarios públicos",
        "Acme",
        "Construcción",
    )
    .unwrap();

    assert!(result.industry_is_high_risk);
    assert_eq!(result.risk_factors.len(), 2);
    let n = result.recommendations.len();
    assert!(result.recommendations[n - 2].contains("Factores de riesgo"));
    assert!(result.recommendations[n - 1].contains("alto riesgo"));
}

#[test]
fn test_unrelated_text_scores_zero() {
    let result = score(&kb(), "Vendemos pan y facturas", "Panadería", "").unwrap();
    assert_eq!(result.score, 0);
    assert_eq!(result.level, ScoreLevel::Poor);
    assert!(result.detected_elements.is_empty());
}

// =============================================================================
// Checklist Evaluation
// =============================================================================

#[test]
fn test_checklist_coverage_bands() {
    let kb = kb();

    let two = evaluate(&kb, &["Código de ética", "Canal de denuncias"], "Acme").unwrap();
    assert!((two.coverage_percent - 28.6).abs() < f64::EPSILON);
    assert_eq!(two.level, CoverageLevel::Poor);

    let five = evaluate(
        &kb,
        &[
            "código de ética",
            "capacitación",
            "canal de denuncias",
            "evaluación de riesgos",
            "monitoreo",
        ],
        "Acme",
    )
    .unwrap();
    assert!((five.coverage_percent - 71.4).abs() < f64::EPSILON);
    assert_eq!(five.level, CoverageLevel::Good);
}

#[test]
fn test_checklist_duplicates_do_not_inflate_coverage() {
    let result = evaluate(
        &kb(),
        &["monitoreo", "Monitoreo trimestral", "auditoría"],
        "Acme",
    )
    .unwrap();

    assert!((result.coverage_percent - 14.3).abs() < f64::EPSILON);
    assert_eq!(result.covered_count(), 1);
    assert_eq!(result.missing_elements.len(), 6);
}

#[test]
fn test_checklist_requires_company() {
    assert!(evaluate::<&str>(&kb(), &[], "  ").is_err());
}

#[test]
fn test_empty_checklist_is_poor() {
    let result = evaluate::<&str>(&kb(), &[], "Acme").unwrap();
    assert!(result.coverage_percent.abs() < f64::EPSILON);
    assert_eq!(result.level, CoverageLevel::Poor);
    assert_eq!(result.missing_elements.len(), result.total_elements);
}
