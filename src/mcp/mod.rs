//! MCP Server for the Fabidrop storefront
//!
//! Exposes product search, nearby sellers and catalog lookups to AI
//! assistants over stdio.

mod server;

pub use server::run_mcp_server;
