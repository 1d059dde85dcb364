//! brlcad-mcp: MCP server and agent CLI for AI-assisted BRL-CAD modeling
//!
//! Two subcommands: `serve` runs the MCP tool server on stdio, `chat` runs
//! the interactive terminal agent against an OpenAI-compatible backend.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use brlcad_mcp::agent::{self, ChatClient};
use brlcad_mcp::bridge::TcpBridge;
use brlcad_mcp::config;
use brlcad_mcp::mcp::McpServer;
use brlcad_mcp::tools::ToolRegistry;

/// BRL-CAD Model Context Protocol agent and server.
///
/// Exposes typed geometry-creation and boolean-combination tools that let
/// AI assistants drive a live BRL-CAD modeling session.
#[derive(Parser, Debug)]
#[command(name = "brlcad-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the MCP tool server (stdio transport)
    Serve,
    /// Start the interactive agent CLI
    Chat,
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
            _ => Level::WARN, // Default to warn for unknown levels
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
///
/// Logs go to stderr; stdout belongs to the MCP transport.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Entry point for the brlcad-mcp binary.
fn main() -> ExitCode {
    let args = Args::parse();

    let cfg = match config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    // Display GPL license notice (required by GPLv3 Section 5d)
    eprintln!(
        "brlcad-mcp {}  Copyright (C) 2026  The Embedded Society",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("This program comes with ABSOLUTELY NO WARRANTY.");
    eprintln!("This is free software, licensed under GPL-3.0-or-later.");
    eprintln!();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to create Tokio runtime");

    match args.command {
        Command::Serve => {
            info!(
                version = env!("CARGO_PKG_VERSION"),
                listener = %cfg.bridge.address(),
                "Starting brlcad-mcp server"
            );

            let bridge = Arc::new(TcpBridge::new(cfg.bridge));
            let mut server = McpServer::new(ToolRegistry::builtin(), bridge);

            info!("MCP server ready, waiting for client connection...");

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
        Command::Chat => {
            let client = match ChatClient::new(cfg.llm) {
                Ok(client) => client,
                Err(e) => {
                    eprintln!("ERROR: {e}");
                    return ExitCode::FAILURE;
                }
            };

            let bridge = TcpBridge::new(cfg.bridge);
            let registry = ToolRegistry::builtin();

            match runtime.block_on(agent::run_chat(&client, &registry, &bridge)) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    error!(error = %e, "Agent error");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
