//! integridai-mcp: MCP server for Ley 27.401 compliance keyword scoring
//!
//! Reads JSON-RPC requests from stdin, one per line, and writes responses
//! to stdout. Logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

use integridai_mcp::assist::{AiAssist, AssistStatus};
use integridai_mcp::compliance::KnowledgeBase;
use integridai_mcp::config;
use integridai_mcp::mcp::server::McpServer;
use integridai_mcp::mcp::tools::{tool_definitions, Toolbox};

/// MCP server for Ley 27.401 compliance keyword scoring.
///
/// Exposes text analysis and integrity-program evaluation tools to AI
/// assistants over JSON-RPC 2.0 on stdio.
#[derive(Parser, Debug)]
#[command(name = "integridai-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Startup notice shown on stderr.
fn license_notice() -> String {
    format!(
        "integridai-mcp {}  Copyright (C) 2026  IntegridAI\n\
         This program comes with ABSOLUTELY NO WARRANTY.\n\
         This is free software, licensed under GPL-3.0-or-later.\n\
         Source: {}",
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_REPOSITORY"),
    )
}

/// Entry point for the integridai-mcp server.
fn main() -> ExitCode {
    let args = Args::parse();

    let config_path = args.config.as_deref();
    let cfg = match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    // Display GPL license notice (required by GPLv3 Section 5d)
    eprintln!("{}", license_notice());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting integridai-mcp server"
    );

    let kb = match KnowledgeBase::ley_27401() {
        Ok(kb) => kb,
        Err(e) => {
            error!(error = %e, "Failed to build knowledge base");
            return ExitCode::FAILURE;
        }
    };

    let assist = AiAssist::from_config(&cfg.assist);
    match assist.status() {
        AssistStatus::Unavailable => {
            warn!("No AI provider configured, running in basic mode");
        }
        status @ AssistStatus::Available { .. } => info!("{}", status.summary()),
    }

    let tool_names: Vec<String> = tool_definitions().into_iter().map(|t| t.name).collect();
    info!(
        tools = ?tool_names,
        elements = kb.len(),
        "MCP server ready, waiting for requests on stdin"
    );

    let server = McpServer::new(Toolbox::new(kb, assist));

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to create Tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(server.run()) {
        Ok(()) => {
            info!("Server shut down gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn license_notice_names_crate_and_source() {
        let notice = license_notice();
        assert!(notice.starts_with(&format!("integridai-mcp {}", env!("CARGO_PKG_VERSION"))));
        assert!(notice.contains("ABSOLUTELY NO WARRANTY"));
        assert!(notice.contains("GPL-3.0-or-later"));
        assert!(notice.contains("https://github.com/integridai/integridai-mcp"));
        assert_eq!(notice.lines().count(), 4);
    }

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(get_log_level(3, true, "trace"), Level::ERROR);
    }

    #[test]
    fn config_level_used_without_flags() {
        assert_eq!(get_log_level(0, false, "DEBUG"), Level::DEBUG);
        assert_eq!(get_log_level(0, false, "bogus"), Level::WARN);
        assert_eq!(get_log_level(2, false, "error"), Level::DEBUG);
    }
}
