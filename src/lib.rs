//! brlcad-mcp: MCP server and agent CLI for AI-assisted BRL-CAD modeling
//!
//! This library lets a tool-calling LLM agent drive a live BRL-CAD session
//! through typed geometry operations. Each operation renders a single-line
//! MGED command and relays it over a one-shot TCP exchange to the session's
//! Tcl listener.
//!
//! # Architecture
//!
//! - **Formatter** ([`geometry`]): pure parameter → command-string mapping
//! - **Bridge** ([`bridge`]): one connection per command, uniform timeout,
//!   timeouts and connection failures kept distinguishable
//! - **Tool surface** ([`tools`]): the typed operation catalog; validates
//!   inputs before any I/O and composes human-readable summaries
//! - **Hosting** ([`mcp`], [`agent`]): the stdio MCP server (`serve`) and
//!   the interactive terminal agent (`chat`)
//!
//! The CAD engine itself, the LLM backend, and the MCP client are external
//! collaborators reached only through their wire contracts.

pub mod agent;
pub mod bridge;
pub mod config;
pub mod error;
pub mod geometry;
pub mod mcp;
pub mod tools;
