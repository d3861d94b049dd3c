//! Vitae: render résumé templates to LaTeX, plain text or PDF.
//!
//! # Usage
//!
//! ```text
//! vitae templates list [--json]
//! vitae templates show <id>
//! vitae render <id> [--fields FILE|-] [--format source|summary|pdf] [--out DIR] [--stdout]
//! ```
//!
//! Global options: `--templates-dir`, `--compiler`, `--timeout-secs`.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{render::RenderArgs, templates::TemplatesCommand, GlobalArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "vitae",
    version,
    about = "Render document templates to LaTeX source, plain text or PDF",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect the available templates.
    Templates {
        #[command(subcommand)]
        command: TemplatesCommand,
    },

    /// Render a submission with a template and write the artifact.
    Render(RenderArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Templates { command } => commands::templates::run(command, &cli.global),
        Commands::Render(args) => args.run(&cli.global),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
