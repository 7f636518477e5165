mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, score::ScoreArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "roadmap",
    about = "Score a specification and plan its roadmap: domains, complexity, personas, templates, milestones",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .roadmap/ or .git/)
    #[arg(long, global = true, env = "ROADMAP_ROOT")]
    root: Option<PathBuf>,

    /// Pipeline config file (default: <root>/.roadmap/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a specification for emptiness, length, title and requirements
    Validate {
        /// Specification file
        spec: PathBuf,
    },

    /// Print the requirements, scope, dependencies, risks and criteria of a specification
    Extract {
        /// Specification file
        spec: PathBuf,
    },

    /// Run the full scoring pipeline over a specification
    Analyze {
        /// Specification file
        spec: PathBuf,
        /// Risk severity label (e.g. high_risks)
        #[arg(long)]
        risk: Option<String>,
        /// Scope size label (e.g. large)
        #[arg(long)]
        scope: Option<String>,
        /// Override the dependency count found in the document
        #[arg(long)]
        dependency_depth: Option<u32>,
    },

    /// Combine quality and review scores into a PASS/REVISE/REJECT decision
    Score(ScoreArgs),

    /// Check a generated roadmap output directory
    Artifacts {
        /// Output directory
        dir: PathBuf,
    },

    /// Manage the pipeline configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Validate { spec } => cmd::validate::run(&spec, cli.json),
        Commands::Extract { spec } => cmd::extract::run(&spec, cli.json),
        Commands::Analyze {
            spec,
            risk,
            scope,
            dependency_depth,
        } => cmd::analyze::run(
            &root,
            config,
            &spec,
            cmd::analyze::Overrides {
                risk,
                scope,
                dependency_depth,
            },
            cli.json,
        ),
        Commands::Score(args) => cmd::score::run(&root, config, args, cli.json),
        Commands::Artifacts { dir } => cmd::artifacts::run(&dir, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, config, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
