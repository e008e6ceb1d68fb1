//! Integration tests for MCP protocol handling.
//!
//! These tests drive the server loop over in-memory transports and verify
//! the JSON-RPC 2.0 behaviour seen by a client: one response per non-blank
//! line, id echoing, error codes and tool round trips.

use serde_json::{json, Value};
use tokio::io::{AsyncWriteExt, BufReader};

use integridai_mcp::assist::AiAssist;
use integridai_mcp::compliance::KnowledgeBase;
use integridai_mcp::mcp::protocol::{parse_message, RequestId};
use integridai_mcp::mcp::{LineTransport, McpServer, Toolbox};

fn server() -> McpServer {
    McpServer::new(Toolbox::new(
        KnowledgeBase::ley_27401().expect("built-in knowledge base compiles"),
        AiAssist::from_keys(None, None),
    ))
}

/// Feeds `input` to a fresh server and returns every response line as JSON.
async fn exchange(input: &str) -> Vec<Value> {
    let mut transport = LineTransport::new(input.as_bytes(), Vec::new());
    server()
        .serve(&mut transport, std::future::pending())
        .await
        .unwrap();

    let written = String::from_utf8(transport.into_writer()).unwrap();
    written
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

// =============================================================================
// Protocol Parsing Tests
// =============================================================================

#[test]
fn test_parse_initialize_request() {
    let json = r#"{
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": {"name": "test-client", "version": "1.0.0"}
        }
    }"#;

    let req = parse_message(json).unwrap();
    assert_eq!(req.method, "initialize");
    assert_eq!(req.id, RequestId::from(1));
}

#[test]
fn test_parse_invalid_json() {
    let err = parse_message("not valid json").unwrap_err();
    assert_eq!(err.error.code, -32700);
    assert_eq!(err.id, RequestId::Null);
}

#[test]
fn test_parse_wrong_version() {
    let err = parse_message(r#"{"jsonrpc":"1.0","id":1,"method":"tools/list"}"#).unwrap_err();
    assert_eq!(err.error.code, -32600);
}

// =============================================================================
// Server Loop Tests
// =============================================================================

#[tokio::test]
async fn test_every_non_blank_line_is_answered() {
    let responses = exchange(concat!(
        "{not json\n",
        "\n",
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        "\n",
        "   \n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        "\n",
    ))
    .await;

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert_eq!(responses[0]["id"], Value::Null);
    assert_eq!(responses[1]["id"], 1);
    assert_eq!(responses[1]["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(responses[2]["id"], 2);
}

#[tokio::test]
async fn test_responses_have_result_or_error_never_both() {
    let responses = exchange(concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"shutdown"}"#,
        "\n",
        r#"[1,2,3]"#,
        "\n",
    ))
    .await;

    for response in &responses {
        assert_eq!(response["jsonrpc"], "2.0");
        assert!(response.get("result").is_some() != response.get("error").is_some());
    }
}

#[tokio::test]
async fn test_listed_tools_are_callable() {
    let responses = exchange(concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#,
        "\n"
    ))
    .await;
    let tools = responses[0]["result"]["tools"].as_array().unwrap().clone();
    assert_eq!(tools.len(), 3);

    let mut input = String::new();
    for (i, tool) in tools.iter().enumerate() {
        let name = tool["name"].as_str().unwrap();
        let arguments = match name {
            "analizar_cumplimiento_ley27401" => json!({"texto": "código de ética"}),
            "evaluar_programa_integridad" => json!({"elementos": [], "empresa": "Acme"}),
            _ => json!({}),
        };
        let request = json!({
            "jsonrpc": "2.0",
            "id": i + 10,
            "method": "tools/call",
            "params": {"name": name, "arguments": arguments}
        });
        input.push_str(&request.to_string());
        input.push('\n');
    }

    let responses = exchange(&input).await;
    assert_eq!(responses.len(), 3);
    for response in responses {
        assert!(response.get("error").is_none(), "unexpected error: {response}");
        assert_eq!(response["result"]["content"][0]["type"], "text");
    }
}

#[tokio::test]
async fn test_analysis_scenario_report() {
    let request = json!({
        "jsonrpc": "2.0",
        "id": "analisis-1",
        "method": "tools/call",
        "params": {
            "name": "analizar_cumplimiento_ley27401",
            "arguments": {
                "texto": "Nuestra empresa tiene código de ética y canal de denuncias",
                "empresa": "Acme SA"
            }
        }
    });

    let responses = exchange(&format!("{request}\n")).await;
    assert_eq!(responses[0]["id"], "analisis-1");
    let text = responses[0]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("**Empresa:** Acme SA"));
    assert!(text.contains("**Score:** 33/100"));
    assert!(text.contains("INSUFICIENTE"));
}

#[tokio::test]
async fn test_unknown_method_and_tool() {
    let responses = exchange(concat!(
        r#"{"jsonrpc":"2.0","id":7,"method":"prompts/list"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":8,"method":"tools/call","params":{"name":"nonexistent_tool","arguments":{}}}"#,
        "\n",
    ))
    .await;

    assert_eq!(responses[0]["id"], 7);
    assert_eq!(responses[0]["error"]["code"], -32601);
    assert_eq!(responses[1]["id"], 8);
    assert_eq!(responses[1]["error"]["code"], -32601);
}

#[tokio::test]
async fn test_bad_tool_arguments_are_invalid_params() {
    let responses = exchange(concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"evaluar_programa_integridad","arguments":{"empresa":"Acme"}}}"#,
        "\n",
    ))
    .await;

    assert_eq!(responses[0]["error"]["code"], -32602);
}

#[tokio::test]
async fn test_missing_id_gets_generated_id() {
    let responses = exchange(concat!(
        r#"{"jsonrpc":"2.0","method":"tools/list"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":null,"method":"tools/list"}"#,
        "\n",
    ))
    .await;

    let generated = responses[0]["id"].as_str().unwrap();
    assert!(!generated.is_empty());
    assert_eq!(responses[1]["id"], Value::Null);
}

#[tokio::test]
async fn test_input_split_across_reads() {
    let mock = tokio_test::io::Builder::new()
        .read(br#"{"jsonrpc":"2.0","id":1,"#)
        .read(b"\"method\":\"initialize\"}\n")
        .read(b"\n")
        .build();
    let mut transport = LineTransport::new(BufReader::new(mock), Vec::new());

    server()
        .serve(&mut transport, std::future::pending())
        .await
        .unwrap();

    let written = String::from_utf8(transport.into_writer()).unwrap();
    assert_eq!(written.lines().count(), 1);
    assert!(written.contains("\"protocolVersion\""));
}

#[tokio::test]
async fn test_shutdown_with_open_input() {
    let (mut client, server_end) = tokio::io::duplex(4096);
    client
        .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/list\"}\n")
        .await
        .unwrap();
    let mut transport = LineTransport::new(BufReader::new(server_end), Vec::new());

    // Input stays open, so only the shutdown future can end the loop.
    let shutdown = async {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    };
    server().serve(&mut transport, shutdown).await.unwrap();

    let written = String::from_utf8(transport.into_writer()).unwrap();
    assert!(written.ends_with('\n'));
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 1);
    let response: Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(response["id"], 1);
    assert_eq!(response["result"]["tools"].as_array().unwrap().len(), 3);

    drop(client);
}
