//! MCP (Model Context Protocol) tool surface
//!
//! Tool definitions, an explicit registry of handlers, and the specification
//! tools built on the generator. Wire framing is out of scope.


pub mod errors;
pub mod protocol;
pub mod tools;

pub use errors::{McpError, McpResult};
pub use protocol::{CallToolParams, CallToolResult, Tool, ToolContent};
pub use tools::{
    GenerateSpecificationHandler, ToolHandler, ToolRegistry, ValidateRequirementsHandler,
};
