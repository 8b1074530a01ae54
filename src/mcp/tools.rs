//! MCP Tools Implementation
//!
//! This module provides the tool registration and dispatch system,
//! along with the specification tools exposed to clients.

use crate::config::GeneratorConfig;
use crate::generator::{
    SpecificationGenerator, ValidationResult, identifier, normalize, validate_path_security,
    validate_requirements,
};
use crate::mcp::errors::{McpError, McpResult};
use crate::mcp::protocol::*;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// A capability that can be registered under a tool name
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn description(&self) -> &str;

    /// JSON schema of the `arguments` object
    fn input_schema(&self) -> Value;

    async fn handle(&self, params: CallToolParams) -> Result<CallToolResult>;
}

/// Specification generation tool handler
pub struct GenerateSpecificationHandler {
    generator: Arc<SpecificationGenerator>,
    default_output_dir: String,
    budget: Duration,
}

/// Dry-run validation tool handler
#[derive(Debug, Default)]
pub struct ValidateRequirementsHandler;

impl GenerateSpecificationHandler {
    pub const NAME: &'static str = "generate_specification";

    /// Create a new generation handler writing to `config.output_dir` by default
    #[inline]
    pub fn new(generator: Arc<SpecificationGenerator>, config: &GeneratorConfig) -> Self {
        Self {
            generator,
            default_output_dir: config.output_dir.clone(),
            budget: config.timeout(),
        }
    }
}

#[async_trait]
impl ToolHandler for GenerateSpecificationHandler {
    #[inline]
    fn description(&self) -> &str {
        "Generate a JSON specification from business requirements and save it to disk"
    }

    #[inline]
    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "requirements": {
                    "type": "string",
                    "description": "Business requirements text"
                },
                "output_directory": {
                    "type": "string",
                    "description": "Optional: Directory to write the specification to"
                }
            },
            "required": ["requirements"],
            "additionalProperties": false
        })
    }

    #[inline]
    async fn handle(&self, params: CallToolParams) -> Result<CallToolResult> {
        let requirements = params.str_arg("requirements").ok_or_else(|| {
            McpError::InvalidToolParameters {
                tool: Self::NAME.to_string(),
                message: "Missing required parameter: requirements".to_string(),
            }
        })?;
        let output_directory = params
            .str_arg("output_directory")
            .unwrap_or(&self.default_output_dir);

        debug!(
            "Generating specification: output_directory='{}', budget={:?}",
            output_directory, self.budget
        );

        match Arc::clone(&self.generator)
            .generate_with_budget(
                requirements.to_string(),
                output_directory.to_string(),
                self.budget,
            )
            .await
        {
            Ok(generated) => {
                let response = json!({
                    "id": generated.result.id(),
                    "filename": generated.result.filename(),
                    "path": generated.path,
                    "specification": generated.result.content(),
                });
                Ok(CallToolResult::text(serde_json::to_string_pretty(
                    &response,
                )?))
            }
            Err(e) => {
                error!("Specification generation failed: {}", e);
                let response = json!({
                    "error": {
                        "kind": e.kind(),
                        "message": e.to_string(),
                    }
                });
                Ok(CallToolResult::error(serde_json::to_string_pretty(
                    &response,
                )?))
            }
        }
    }
}

impl ValidateRequirementsHandler {
    pub const NAME: &'static str = "validate_requirements";
}

#[async_trait]
impl ToolHandler for ValidateRequirementsHandler {
    #[inline]
    fn description(&self) -> &str {
        "Check business requirements and an output directory without writing anything"
    }

    #[inline]
    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "requirements": {
                    "type": "string",
                    "description": "Business requirements text"
                },
                "output_directory": {
                    "type": "string",
                    "description": "Optional: Directory to check for traversal"
                }
            },
            "required": ["requirements"],
            "additionalProperties": false
        })
    }

    #[inline]
    async fn handle(&self, params: CallToolParams) -> Result<CallToolResult> {
        let requirements = params.str_arg("requirements").ok_or_else(|| {
            McpError::InvalidToolParameters {
                tool: Self::NAME.to_string(),
                message: "Missing required parameter: requirements".to_string(),
            }
        })?;

        let normalized = normalize::normalize(requirements);
        let raw_check = validate_requirements(requirements);
        let requirements_check = if raw_check.is_valid() {
            validate_requirements(normalized.as_str())
        } else {
            raw_check
        };

        let path_check: Option<ValidationResult> = params
            .str_arg("output_directory")
            .map(validate_path_security);

        let is_valid = requirements_check.is_valid()
            && path_check.as_ref().is_none_or(ValidationResult::is_valid);

        let response = json!({
            "valid": is_valid,
            "requirements": requirements_check,
            "normalized": normalized,
            "filename": identifier::derive_filename(&normalized),
            "output_directory": path_check,
        });
        let text = serde_json::to_string_pretty(&response)?;

        Ok(if is_valid {
            CallToolResult::text(text)
        } else {
            CallToolResult::error(text)
        })
    }
}

/// Tool registry for managing tool registration and dispatch.
///
/// Built once at startup and passed to whatever serves the tools.
#[derive(Default)]
pub struct ToolRegistry {
    handlers: BTreeMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Create a new tool registry
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under `name`. Names must be unique.
    #[inline]
    pub fn add(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn ToolHandler>,
    ) -> McpResult<()> {
        let name = name.into();
        if name.trim().is_empty() || name.chars().any(char::is_whitespace) {
            return Err(McpError::InvalidToolName { name });
        }
        if self.handlers.contains_key(&name) {
            return Err(McpError::DuplicateTool { name });
        }

        debug!("Registered tool '{}'", name);
        self.handlers.insert(name, handler);
        Ok(())
    }

    /// Get all registered tools, ordered by name
    #[inline]
    pub fn list_tools(&self) -> Vec<Tool> {
        self.handlers
            .iter()
            .map(|(name, handler)| definition(name, handler.as_ref()))
            .collect()
    }

    /// Get a specific tool by name
    #[inline]
    pub fn get_tool(&self, name: &str) -> Option<Tool> {
        self.handlers
            .get(name)
            .map(|handler| definition(name, handler.as_ref()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Dispatch a call to the handler registered under `params.name`
    #[inline]
    pub async fn call(&self, params: CallToolParams) -> McpResult<CallToolResult> {
        let name = params.name.clone();
        let handler = self
            .handlers
            .get(&name)
            .ok_or_else(|| McpError::ToolNotFound { name: name.clone() })?;

        handler.handle(params).await.map_err(|e| {
            let error = e
                .downcast::<McpError>()
                .unwrap_or_else(|other| McpError::ToolExecutionFailed {
                    tool: name,
                    message: other.to_string(),
                });
            error.log();
            error
        })
    }

    /// Create a registry with the specification tools
    #[inline]
    pub fn create_default(
        generator: Arc<SpecificationGenerator>,
        config: &GeneratorConfig,
    ) -> McpResult<Self> {
        let mut registry = Self::new();

        registry.add(
            GenerateSpecificationHandler::NAME,
            Arc::new(GenerateSpecificationHandler::new(generator, config)),
        )?;
        registry.add(
            ValidateRequirementsHandler::NAME,
            Arc::new(ValidateRequirementsHandler),
        )?;

        Ok(registry)
    }
}

fn definition(name: &str, handler: &dyn ToolHandler) -> Tool {
    Tool {
        name: name.to_string(),
        description: Some(handler.description().to_string()),
        input_schema: handler.input_schema(),
    }
}
