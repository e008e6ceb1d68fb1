//! HTTP body mapping for the compliance tools.
//!
//! An HTTP front end posts a JSON body to one of three paths and receives
//! the raw tool result, without a JSON-RPC envelope:
//!
//! | path        | tool                              |
//! |-------------|-----------------------------------|
//! | `/test`     | `test_integridai`                 |
//! | `/analizar` | `analizar_cumplimiento_ley27401`  |
//! | `/evaluar`  | `evaluar_programa_integridad`     |
//!
//! Only the mapping lives here; this crate does not run an HTTP listener.

use serde_json::Value;

use crate::error::ToolError;
use crate::mcp::tools::{Toolbox, ANALYSE_TOOL, EVALUATE_TOOL, TEST_TOOL};

/// Returns the tool served at `path`, if any.
#[must_use]
pub fn tool_for_path(path: &str) -> Option<&'static str> {
    match path.trim_end_matches('/') {
        "/test" => Some(TEST_TOOL),
        "/analizar" => Some(ANALYSE_TOOL),
        "/evaluar" => Some(EVALUATE_TOOL),
        _ => None,
    }
}

/// Runs the tool mapped to `path` with `body` as its arguments.
///
/// # Errors
///
/// Returns [`ToolError::NotFound`] for an unmapped path, or the tool's own
/// error.
pub fn route(tools: &Toolbox, path: &str, body: &Value) -> Result<Value, ToolError> {
    let tool = tool_for_path(path).ok_or_else(|| ToolError::NotFound {
        name: path.to_string(),
    })?;

    let result = tools.call(tool, body)?;
    serde_json::to_value(result).map_err(|e| ToolError::Internal {
        message: e.to_string(),
    })
}

/// HTTP status an adapter should send for a tool error.
#[must_use]
pub const fn status_for(err: &ToolError) -> u16 {
    match err {
        ToolError::NotFound { .. } => 404,
        ToolError::InvalidParams { .. } => 400,
        ToolError::Internal { .. } => 500,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::assist::AiAssist;
    use crate::compliance::KnowledgeBase;

    fn toolbox() -> Toolbox {
        Toolbox::new(KnowledgeBase::ley_27401().unwrap(), AiAssist::default())
    }

    #[test]
    fn paths_map_to_tools() {
        assert_eq!(tool_for_path("/test"), Some(TEST_TOOL));
        assert_eq!(tool_for_path("/analizar/"), Some(ANALYSE_TOOL));
        assert_eq!(tool_for_path("/evaluar"), Some(EVALUATE_TOOL));
        assert_eq!(tool_for_path("/"), None);
    }

    #[test]
    fn route_returns_raw_tool_result() {
        let value = route(&toolbox(), "/test", &json!({"mensaje": "API Test"})).unwrap();
        assert_eq!(value["content"][0]["type"], "text");
        assert!(value["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("API Test"));
        assert!(value.get("jsonrpc").is_none());
    }

    #[test]
    fn unknown_path_is_404() {
        let err = route(&toolbox(), "/borrar", &json!({})).unwrap_err();
        assert_eq!(status_for(&err), 404);
    }

    #[test]
    fn bad_body_is_400() {
        let err = route(&toolbox(), "/evaluar", &json!({"empresa": "Acme"})).unwrap_err();
        assert_eq!(status_for(&err), 400);
    }
}
