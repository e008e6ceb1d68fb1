//! integridai-mcp: MCP server for Ley 27.401 compliance keyword scoring
//!
//! This library scores corporate text for the presence of integrity-program
//! elements (code of ethics, whistleblower channel, risk assessment, ...) and
//! evaluates checklists of implemented elements, exposing both as MCP tools.
//!
//! # Architecture
//!
//! The analysis is superficial by design: keyword presence, not meaning.
//!
//! - **Text scoring**: weighted keyword scan, level bands, fixed advice
//! - **Checklist evaluation**: coverage ratio against the knowledge base
//! - **JSON-RPC over stdio**: one request per line, always answered
//!
//! # Modules
//!
//! - [`compliance`] — Knowledge base, scorer, evaluator and reports
//! - [`mcp`] — MCP protocol implementation
//! - [`assist`] — Optional AI-assist status
//! - [`adapter`] — HTTP body to tool mapping
//! - [`config`] — Configuration loading and validation
//! - [`error`] — Error types

pub mod adapter;
pub mod assist;
pub mod compliance;
pub mod config;
pub mod error;
pub mod mcp;
