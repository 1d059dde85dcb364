//! Model Context Protocol (MCP) server implementation.
//!
//! Exposes the CAD tool surface to AI assistants over stdio using JSON-RPC
//! 2.0 messages, targeting MCP protocol version 2024-11-05.

pub mod protocol;
pub mod server;
pub mod transport;

pub use protocol::{ErrorResponse, Request, Response, MCP_PROTOCOL_VERSION};
pub use server::McpServer;
pub use transport::StdioTransport;
