mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{
    DiffCommand, GroupBy, GroupsCommand, InspectCommand, OutputFormat, ShowCommand, ShowOptions,
    SummaryCommand,
};
use planscope::RenderConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "planscope")]
#[command(about = "Structural diff, grouping and sensitivity views over Terraform/OpenTofu JSON plans", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a YAML configuration file (defaults to ./.planscope.yaml)
    #[arg(long, global = true, env = "PLANSCOPE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show counts of planned changes by action
    Summary {
        /// Plan JSON file (output of `tofu show -json`), or - for stdin
        plan: PathBuf,
    },

    /// Render the planned changes of every resource
    Show {
        /// Plan JSON file, or - for stdin
        plan: PathBuf,

        /// Compare against the drift snapshot
        #[arg(long)]
        drift: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Reveal values marked sensitive
        #[arg(long)]
        show_sensitive: bool,

        /// Include unchanged attributes and no-op resources
        #[arg(long)]
        show_unchanged: bool,

        /// Two-column old/new view (text only)
        #[arg(long)]
        side_by_side: bool,

        /// No blank lines between resources
        #[arg(long)]
        compact: bool,
    },

    /// Group resources by module, type or construct path
    Groups {
        /// Plan JSON file, or - for stdin
        plan: PathBuf,

        /// Grouping to apply
        #[arg(long, value_enum, default_value = "module")]
        by: GroupBy,

        /// Construct metadata JSON (required for --by construct)
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Show property differences of one resource
    Diff {
        /// Plan JSON file, or - for stdin
        plan: PathBuf,

        /// Resource address, e.g. module.net.aws_subnet.x[0]
        address: String,

        /// Compare against the drift snapshot
        #[arg(long)]
        drift: bool,

        /// Include unchanged properties
        #[arg(long)]
        all: bool,

        /// Reveal values marked sensitive
        #[arg(long)]
        show_sensitive: bool,
    },

    /// Report sensitivity, unknown and replacement markers of one property
    Inspect {
        /// Plan JSON file, or - for stdin
        plan: PathBuf,

        /// Resource address
        address: String,

        /// Property path, e.g. ingress[0].cidr_blocks or ingress.0.cidr_blocks
        path: String,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("planscope=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = RenderConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Summary { plan } => {
            SummaryCommand::execute(&plan)?;
        }
        Commands::Show {
            plan,
            drift,
            format,
            output,
            show_sensitive,
            show_unchanged,
            side_by_side,
            compact,
        } => {
            let options = ShowOptions {
                drift,
                show_sensitive,
                show_unchanged,
                side_by_side,
                compact,
                output,
            };
            ShowCommand::execute(&plan, format, &options, &config)?;
        }
        Commands::Groups { plan, by, metadata } => {
            GroupsCommand::execute(&plan, by, metadata.as_deref())?;
        }
        Commands::Diff {
            plan,
            address,
            drift,
            all,
            show_sensitive,
        } => {
            DiffCommand::execute(
                &plan,
                &address,
                drift || config.use_drift,
                all,
                show_sensitive || config.show_sensitive,
            )?;
        }
        Commands::Inspect {
            plan,
            address,
            path,
        } => {
            InspectCommand::execute(&plan, &address, &path)?;
        }
    }

    Ok(())
}
