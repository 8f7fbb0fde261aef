//! Transports carrying MCP JSON-RPC to the server

pub mod http;
pub mod stdio;
