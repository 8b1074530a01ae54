use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::GeneratorConfig;
use crate::generator::{
    GeneratedSpecification, SpecificationGenerator, SpecificationWriter, ValidationResult,
    identifier, normalize, validate_path_security, validate_requirements,
};
use crate::logging::TracingLogger;
use crate::mcp::{CallToolParams, ToolRegistry};

/// Build a generator that writes with the configured mode and logs through `tracing`
#[inline]
pub fn build_generator(config: &GeneratorConfig) -> Arc<SpecificationGenerator> {
    Arc::new(SpecificationGenerator::new(
        SpecificationWriter::new(config.write_mode),
        Arc::new(TracingLogger),
    ))
}

/// Build the tool registry served to MCP clients
#[inline]
pub fn build_registry(config: &GeneratorConfig) -> Result<ToolRegistry> {
    let registry = ToolRegistry::create_default(build_generator(config), config)
        .context("Failed to register specification tools")?;
    info!("Registered {} tools", registry.len());
    Ok(registry)
}

/// Generate a specification into `config.output_dir` and report where it went
#[inline]
pub async fn generate_spec(
    config: &GeneratorConfig,
    requirements: &str,
) -> crate::Result<GeneratedSpecification> {
    let generator = build_generator(config);

    let generated = match generator
        .generate_with_budget(
            requirements.to_string(),
            config.output_dir.clone(),
            config.timeout(),
        )
        .await
    {
        Ok(generated) => generated,
        Err(e) => {
            println!("❌ Specification not generated [{}]: {}", e.kind(), e);
            return Err(e.into());
        }
    };

    println!("✅ Specification generated");
    println!("   ID: {}", generated.result.id());
    println!("   Title: {}", generated.result.content().title);
    println!("   Filename: {}", generated.result.filename());
    println!("   File: {}", generated.path.display());

    Ok(generated)
}

/// Check requirements (and optionally an output directory) without writing
#[inline]
pub fn check_requirements(requirements: &str, output_dir: Option<&str>) -> Result<()> {
    let normalized = normalize::normalize(requirements);
    let raw_check = validate_requirements(requirements);
    let requirements_check = if raw_check.is_valid() {
        validate_requirements(normalized.as_str())
    } else {
        raw_check
    };
    let path_check = output_dir.map(|dir| (dir, validate_path_security(dir)));

    print_check("Requirements", &requirements_check);
    if requirements_check.is_valid() {
        println!("   Normalized: {}", normalized);
        println!("   Filename: {}", identifier::derive_filename(&normalized));
    }

    if let Some((dir, check)) = &path_check {
        print_check(&format!("Output directory '{}'", dir), check);
    }

    let is_valid = requirements_check.is_valid()
        && path_check
            .as_ref()
            .is_none_or(|(_, check)| check.is_valid());
    if !is_valid {
        anyhow::bail!("Validation failed");
    }

    Ok(())
}

fn print_check(label: &str, check: &ValidationResult) {
    if check.is_valid() {
        println!("✅ {}: valid", label);
    } else {
        println!("❌ {}: invalid", label);
    }
    for message in check.errors() {
        println!("   Error: {}", message);
    }
    for message in check.warnings() {
        println!("   ⚠️  Warning: {}", message);
    }
}

/// List registered tools with their descriptions
#[inline]
pub fn list_tools(registry: &ToolRegistry) {
    if registry.is_empty() {
        println!("No tools are registered.");
        return;
    }

    println!("Available Tools ({} total):", registry.len());
    println!();

    for tool in registry.list_tools() {
        println!("🔧 {}", tool.name);
        if let Some(description) = &tool.description {
            println!("   {}", description);
        }
        let required = tool
            .input_schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        if !required.is_empty() {
            println!("   Required: {}", required);
        }
        println!();
    }
}

/// Invoke a registered tool with JSON arguments and print its text content
#[inline]
pub async fn call_tool(
    registry: &ToolRegistry,
    name: &str,
    arguments: Option<&str>,
) -> Result<()> {
    let arguments: Value = match arguments {
        Some(raw) => serde_json::from_str(raw)
            .with_context(|| format!("Tool arguments are not valid JSON: {}", raw))?,
        None => Value::Object(serde_json::Map::new()),
    };
    if !arguments.is_object() {
        anyhow::bail!("Tool arguments must be a JSON object");
    }

    let result = registry
        .call(CallToolParams::new(name, arguments))
        .await
        .with_context(|| format!("Failed to call tool '{}'", name))?;

    println!("{}", result.joined_text());

    if result.is_error() {
        error!("Tool '{}' reported an error", name);
        anyhow::bail!("Tool '{}' reported an error", name);
    }

    Ok(())
}
