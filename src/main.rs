use clap::{Parser, Subcommand};
use ctxfy::Result;
use ctxfy::commands::{build_registry, call_tool, check_requirements, generate_spec, list_tools};
use ctxfy::config::{Config, get_config_dir, run_interactive_config, show_config};
use ctxfy::generator::WriteMode;
use ctxfy::logging::init_tracing;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ctxfy")]
#[command(about = "Turn business requirements into JSON specification files")]
#[command(version)]
struct Cli {
    /// Directory holding config.toml (defaults to ~/.ctxfy)
    #[arg(long, global = true, env = "CTXFY_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a specification file from requirements text
    Generate {
        /// Business requirements text
        requirements: String,
        /// Directory to write the specification to, overriding the configured one
        #[arg(long)]
        output_dir: Option<String>,
        /// Refuse to replace an existing specification file
        #[arg(long)]
        fail_if_exists: bool,
    },
    /// Check requirements and an output directory without writing anything
    Validate {
        /// Business requirements text
        requirements: String,
        /// Output directory to check for traversal
        #[arg(long)]
        output_dir: Option<String>,
    },
    /// List the tools exposed to MCP clients
    Tools,
    /// Call an MCP tool directly
    Call {
        /// Tool name, e.g. "generate_specification"
        name: String,
        /// Tool arguments as a JSON object
        #[arg(long)]
        args: Option<String>,
    },
    /// Configure output and logging settings
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => get_config_dir()?,
    };

    if let Commands::Config { show } = cli.command {
        if show {
            show_config(&config_dir)?;
        } else {
            run_interactive_config(&config_dir)?;
        }
        return Ok(());
    }

    let config = Config::load(&config_dir)?;
    init_tracing(&config.logging);

    match cli.command {
        Commands::Generate {
            requirements,
            output_dir,
            fail_if_exists,
        } => {
            let mut generator_config = config.generator.clone();
            if let Some(output_dir) = output_dir {
                generator_config.output_dir = output_dir;
            }
            if fail_if_exists {
                generator_config.set_write_mode(WriteMode::FailIfExists);
            }
            generate_spec(&generator_config, &requirements).await?;
        }
        Commands::Validate {
            requirements,
            output_dir,
        } => {
            check_requirements(&requirements, output_dir.as_deref())?;
        }
        Commands::Tools => {
            list_tools(&build_registry(&config.generator)?);
        }
        Commands::Call { name, args } => {
            let registry = build_registry(&config.generator)?;
            call_tool(&registry, &name, args.as_deref()).await?;
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}
