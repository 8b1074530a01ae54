#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Select};
use std::path::Path;

use super::{Config, GeneratorConfig, LoggingConfig};
use crate::generator::{WriteMode, validate_path_security};
use crate::logging::LogFormat;

#[inline]
pub fn run_interactive_config(config_dir: &Path) -> Result<()> {
    eprintln!("{}", style("🔧 ctxfy Configuration Setup").bold().cyan());
    eprintln!();

    let mut config = load_existing_config(config_dir)?;

    eprintln!("{}", style("Generator Configuration").bold().yellow());
    eprintln!("Choose where specifications are written and how conflicts are handled.");
    eprintln!();

    configure_generator(&mut config.generator)?;

    eprintln!();
    eprintln!("{}", style("Logging Configuration").bold().yellow());
    eprintln!();

    configure_logging(&mut config.logging)?;

    eprintln!();
    if Confirm::new()
        .with_prompt("Save configuration?")
        .default(true)
        .interact()?
    {
        config.save().context("Failed to save configuration")?;
        eprintln!("{}", style("✓ Configuration saved successfully!").green());
        eprintln!(
            "Configuration saved to: {}",
            style(config.config_file_path().display()).cyan()
        );
    } else {
        eprintln!("Configuration not saved.");
    }

    Ok(())
}

#[inline]
pub fn show_config(config_dir: &Path) -> Result<()> {
    let config = Config::load(config_dir).context("Failed to load configuration")?;

    eprintln!("{}", style("📋 Current Configuration").bold().cyan());
    eprintln!();

    eprintln!("{}", style("Generator Settings:").bold().yellow());
    eprintln!(
        "  Output Directory: {}",
        style(&config.generator.output_dir).cyan()
    );
    eprintln!("  Write Mode: {}", style(config.generator.write_mode).cyan());
    eprintln!("  Timeout: {}ms", style(config.generator.timeout_ms).cyan());

    eprintln!();
    eprintln!("{}", style("Logging Settings:").bold().yellow());
    eprintln!("  Level: {}", style(&config.logging.level).cyan());
    eprintln!("  Format: {}", style(config.logging.format).cyan());

    eprintln!();
    eprintln!(
        "Config file: {}",
        style(config.config_file_path().display()).dim()
    );

    Ok(())
}

fn load_existing_config(config_dir: &Path) -> Result<Config> {
    Config::load(config_dir).map_or_else(
        |_| {
            eprintln!(
                "{}",
                style("No valid configuration found. Using defaults.").yellow()
            );
            Ok(Config {
                base_dir: config_dir.to_path_buf(),
                ..Config::default()
            })
        },
        |config| {
            if config.config_file_path().exists() {
                eprintln!("{}", style("Found existing configuration.").green());
            }
            Ok(config)
        },
    )
}

fn configure_generator(generator: &mut GeneratorConfig) -> Result<()> {
    let output_dir: String = Input::new()
        .with_prompt("Output directory")
        .default(generator.output_dir.clone())
        .validate_with(|input: &String| -> Result<(), String> {
            let check = validate_path_security(input);
            if check.is_valid() {
                Ok(())
            } else {
                Err(check.error_summary())
            }
        })
        .interact_text()?;

    let modes = [WriteMode::Overwrite, WriteMode::FailIfExists];
    let default_index = modes
        .iter()
        .position(|&mode| mode == generator.write_mode)
        .unwrap_or(0);

    let mode_index = Select::new()
        .with_prompt("When a specification file already exists")
        .default(default_index)
        .items(&["overwrite it", "fail"])
        .interact()?;

    let timeout_ms: u64 = Input::new()
        .with_prompt("Generation timeout (ms)")
        .default(generator.timeout_ms)
        .validate_with(|input: &u64| -> Result<(), &str> {
            if *input == 0 || *input > 60_000 {
                Err("Timeout must be between 1 and 60000 ms")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    generator.set_output_dir(output_dir)?;
    generator.set_write_mode(modes[mode_index]);
    generator.set_timeout_ms(timeout_ms)?;

    Ok(())
}

fn configure_logging(logging: &mut LoggingConfig) -> Result<()> {
    let levels = ["trace", "debug", "info", "warn", "error"];
    let level_index = Select::new()
        .with_prompt("Log level")
        .default(levels.iter().position(|&l| l == logging.level).unwrap_or(2))
        .items(&levels)
        .interact()?;

    let formats = [LogFormat::Text, LogFormat::Json];
    let format_index = Select::new()
        .with_prompt("Log format")
        .default(
            formats
                .iter()
                .position(|&f| f == logging.format)
                .unwrap_or(0),
        )
        .items(&["text", "json"])
        .interact()?;

    logging.set_level(levels[level_index].to_string())?;
    logging.set_format(formats[format_index]);

    Ok(())
}
