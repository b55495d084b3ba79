//! `thinmediactl`: run ThinMedia indexing passes from the command line.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use thinmedia_core::model::{ExternalId, MediaKind};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod candidates;
mod commands;

#[derive(Parser)]
#[command(name = "thinmediactl", version, about = "ThinMedia library indexer")]
struct Cli {
    /// Configuration file (TOML or JSON). Defaults to THINMEDIA_CONFIG_PATH,
    /// THINMEDIA_CONFIG_JSON, then thinmedia.toml in the working directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate configuration and provider credentials
    Check,
    /// Refresh the file map of every catalog entry
    Rescan,
    /// Find unknown library folders and try to identify them
    Discover {
        /// Candidate accumulator, created when missing
        #[arg(long)]
        candidates: PathBuf,
    },
    /// Record an identity for a library folder by hand
    Choose {
        #[arg(long)]
        candidates: PathBuf,
        #[arg(long)]
        path: PathBuf,
        #[arg(long, value_enum)]
        kind: KindArg,
        #[arg(long)]
        id: u64,
    },
    /// Create catalog entries for every identified candidate
    Confirm {
        #[arg(long)]
        candidates: PathBuf,
    },
    /// Search the local catalog
    Search {
        query: Option<String>,
        /// Keep entries with any of these genres
        #[arg(long = "genre")]
        genres: Vec<String>,
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
    /// List every genre in the local catalog
    Genres,
    /// Point an existing entry at a different provider record
    Reidentify {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, value_enum)]
        kind: KindArg,
        #[arg(long)]
        id: u64,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum KindArg {
    Movie,
    #[value(alias = "tv")]
    Series,
}

impl From<KindArg> for MediaKind {
    fn from(val: KindArg) -> Self {
        match val {
            KindArg::Movie => MediaKind::Movie,
            KindArg::Series => MediaKind::Series,
        }
    }
}

fn external_id(kind: KindArg, id: u64) -> ExternalId {
    ExternalId::new(kind.into(), id)
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config.as_deref();
    match cli.command {
        Command::Check => commands::check(config),
        Command::Rescan => commands::rescan(config),
        Command::Discover { candidates } => commands::discover(config, &candidates),
        Command::Choose {
            candidates,
            path,
            kind,
            id,
        } => commands::choose(&candidates, &path, external_id(kind, id)),
        Command::Confirm { candidates } => commands::confirm(config, &candidates),
        Command::Search {
            query,
            genres,
            kind,
        } => commands::search(config, query.as_deref(), &genres, kind.map(Into::into)),
        Command::Genres => commands::genres(config),
        Command::Reidentify { path, kind, id } => {
            commands::reidentify(config, &path, external_id(kind, id))
        }
    }
}
