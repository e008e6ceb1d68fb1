//! Tool catalogue and handlers.
//!
//! Each handler validates its own arguments and returns
//! [`ToolError::InvalidParams`] when a required argument is missing, has
//! the wrong type, or an unknown argument is present.

use chrono::Local;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::assist::AiAssist;
use crate::compliance::{evaluator, report, scorer, KnowledgeBase};
use crate::error::ToolError;

/// Health-check tool.
pub const TEST_TOOL: &str = "test_integridai";
/// Free-text analysis tool.
pub const ANALYSE_TOOL: &str = "analizar_cumplimiento_ley27401";
/// Checklist evaluation tool.
pub const EVALUATE_TOOL: &str = "evaluar_programa_integridad";

/// A tool definition for tools/list response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
}

/// Content item in a tool call response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Result of a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
}

impl ToolCallResult {
    /// Creates a text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
        }
    }
}

/// Runs tools by name on behalf of the dispatcher.
pub trait ToolHandler {
    /// Runs the named tool with its `arguments` object.
    ///
    /// # Errors
    ///
    /// Returns a [`ToolError`] when the tool is unknown or fails.
    fn run_tool(&self, name: &str, arguments: &Value) -> Result<ToolCallResult, ToolError>;
}

/// The three compliance tools over a shared knowledge base.
#[derive(Debug, Clone)]
pub struct Toolbox {
    kb: KnowledgeBase,
    assist: AiAssist,
}

impl Toolbox {
    /// Creates the toolbox.
    #[must_use]
    pub const fn new(kb: KnowledgeBase, assist: AiAssist) -> Self {
        Self { kb, assist }
    }

    /// Runs the named tool.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::NotFound`] for an unknown name and
    /// [`ToolError::InvalidParams`] for bad arguments.
    pub fn call(&self, name: &str, arguments: &Value) -> Result<ToolCallResult, ToolError> {
        tracing::info!(tool = name, "Running tool");

        match name {
            TEST_TOOL => self.call_test(arguments),
            ANALYSE_TOOL => self.call_analyse(arguments),
            EVALUATE_TOOL => self.call_evaluate(arguments),
            _ => Err(ToolError::NotFound {
                name: name.to_string(),
            }),
        }
    }

    fn call_test(&self, arguments: &Value) -> Result<ToolCallResult, ToolError> {
        let args = arguments_object(arguments, &["mensaje"])?;
        let message = optional_str(args, "mensaje")?.unwrap_or("test");

        Ok(ToolCallResult::text(format!(
            "✅ **IntegridAI MCP v{} funcionando**\n\n\
             **Mensaje:** {message}\n\
             **Protocolo:** JSON-RPC 2.0\n\
             **Herramientas:** {} disponibles\n\
             **Base de conocimiento:** Ley 27401 ({} elementos)",
            env!("CARGO_PKG_VERSION"),
            tool_definitions().len(),
            self.kb.len(),
        )))
    }

    fn call_analyse(&self, arguments: &Value) -> Result<ToolCallResult, ToolError> {
        let args = arguments_object(arguments, &["texto", "empresa", "industria"])?;
        let text = required_str(args, "texto")?;
        let company = optional_str(args, "empresa")?
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(scorer::DEFAULT_COMPANY);
        let industry = optional_str(args, "industria")?.unwrap_or("");

        let result = scorer::score(&self.kb, text, company, industry)?;
        let text = report::score_report(
            &result,
            self.kb.total_weight(),
            &self.assist.status(),
            Local::now().date_naive(),
        );
        Ok(ToolCallResult::text(text))
    }

    fn call_evaluate(&self, arguments: &Value) -> Result<ToolCallResult, ToolError> {
        let args = arguments_object(arguments, &["elementos", "empresa", "industria"])?;
        let elements = required_str_array(args, "elementos")?;
        let company = required_str(args, "empresa")?;
        let industry = optional_str(args, "industria")?.unwrap_or("");

        let result = evaluator::evaluate(&self.kb, &elements, company)?;
        let text = report::coverage_report(&result, industry, Local::now().date_naive());
        Ok(ToolCallResult::text(text))
    }
}

impl ToolHandler for Toolbox {
    fn run_tool(&self, name: &str, arguments: &Value) -> Result<ToolCallResult, ToolError> {
        self.call(name, arguments)
    }
}

fn arguments_object<'a>(
    arguments: &'a Value,
    allowed: &[&str],
) -> Result<&'a Map<String, Value>, ToolError> {
    let args = arguments
        .as_object()
        .ok_or_else(|| ToolError::invalid_params("arguments must be an object"))?;

    if let Some(key) = args.keys().find(|k| !allowed.contains(&k.as_str())) {
        return Err(ToolError::invalid_params(format!(
            "Unknown parameter: {key}"
        )));
    }
    Ok(args)
}

fn required_str<'a>(args: &'a Map<String, Value>, key: &str) -> Result<&'a str, ToolError> {
    optional_str(args, key)?.ok_or_else(|| {
        ToolError::invalid_params(format!("Missing required parameter: {key} (string)"))
    })
}

/// An absent or `null` argument is `None`; any other non-string is an error.
fn optional_str<'a>(
    args: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a str>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(ToolError::invalid_params(format!(
            "Parameter '{key}' must be a string"
        ))),
    }
}

fn required_str_array<'a>(
    args: &'a Map<String, Value>,
    key: &str,
) -> Result<Vec<&'a str>, ToolError> {
    let Some(Value::Array(items)) = args.get(key) else {
        return Err(ToolError::invalid_params(format!(
            "Missing required parameter: {key} (array of strings)"
        )));
    };

    items
        .iter()
        .map(|item| {
            item.as_str().ok_or_else(|| {
                ToolError::invalid_params(format!("Parameter '{key}' must be an array of strings"))
            })
        })
        .collect()
}

/// Returns the static tool catalogue.
#[must_use]
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: TEST_TOOL.to_string(),
            description: "Verifica el funcionamiento del servidor IntegridAI MCP".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "mensaje": {
                        "type": "string",
                        "description": "Mensaje de prueba (opcional)",
                        "default": "test"
                    }
                },
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: ANALYSE_TOOL.to_string(),
            description: "Analiza texto corporativo (políticas, manuales, documentos) para \
                          identificar elementos de programa de integridad según la Ley 27401"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "texto": {
                        "type": "string",
                        "description": "Texto a analizar para cumplimiento Ley 27401"
                    },
                    "empresa": {
                        "type": "string",
                        "description": "Nombre de la empresa",
                        "default": scorer::DEFAULT_COMPANY
                    },
                    "industria": {
                        "type": "string",
                        "description": "Sector industrial (opcional)",
                        "default": ""
                    }
                },
                "required": ["texto"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: EVALUATE_TOOL.to_string(),
            description: "Evalúa la cobertura de un programa de integridad según los \
                          elementos de la Ley 27401"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "elementos": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Lista de elementos implementados del programa"
                    },
                    "empresa": {
                        "type": "string",
                        "description": "Nombre de la empresa"
                    },
                    "industria": {
                        "type": "string",
                        "description": "Sector industrial (opcional)",
                        "default": ""
                    }
                },
                "required": ["elementos", "empresa"],
                "additionalProperties": false
            }),
        },
    ]
}
