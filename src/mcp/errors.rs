//! MCP Error Handling
//!
//! Errors raised by the tool registry itself, as opposed to failures inside a
//! tool, which are reported in the tool result.

use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum McpError {
    #[error("Tool not found: {name}")]
    ToolNotFound { name: String },

    #[error("Tool already registered: {name}")]
    DuplicateTool { name: String },

    #[error("Invalid tool name: {name:?}")]
    InvalidToolName { name: String },

    #[error("Invalid tool parameters for {tool}: {message}")]
    InvalidToolParameters { tool: String, message: String },

    #[error("Tool execution failed for {tool}: {message}")]
    ToolExecutionFailed { tool: String, message: String },
}

impl McpError {
    /// Log the error with appropriate level
    #[inline]
    pub fn log(&self) {
        match self {
            Self::InvalidToolParameters { .. } => {
                error!("Client error: {}", self);
            }
            Self::ToolNotFound { .. } => {
                error!("Not found error: {}", self);
            }
            Self::ToolExecutionFailed { .. } => {
                error!("Server error: {}", self);
            }
            Self::DuplicateTool { .. } | Self::InvalidToolName { .. } => {
                error!("Registration error: {}", self);
            }
        }
    }
}

/// Result type for MCP operations
pub type McpResult<T> = Result<T, McpError>;
