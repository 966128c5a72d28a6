//! Agentify MCP Server
//!
//! Model Context Protocol server for integration with AI assistants.

pub mod protocol;
pub mod server;
pub mod tools;

pub use server::{start_server, McpServer};
pub use tools::Services;
