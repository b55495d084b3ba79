use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use thinmedia_config::{ConfigLoad, ConfigLoader, IndexerConfig};
use thinmedia_core::catalog::{apply_filters, unique_genres};
use thinmedia_core::model::{CatalogEntry, ExternalId, MatchCandidate, MediaKind};
use thinmedia_core::{
    CatalogStore, IndexerContext, JsonCatalogStore, ScanOrchestrator, ScanStart, TmdbProvider,
};
use tracing::{info, warn};

use crate::candidates;

fn load_config(path: Option<&Path>) -> anyhow::Result<IndexerConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = path {
        loader = loader.with_path(path);
    }
    let ConfigLoad {
        config,
        source,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    info!(source = %source, "configuration loaded");
    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => warn!(message = %warning.message, hint = %hint, "configuration warning"),
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }
    Ok(config)
}

fn open_store(config: &IndexerConfig) -> anyhow::Result<JsonCatalogStore> {
    let path = config.catalog_path();
    JsonCatalogStore::open(&path)
        .with_context(|| format!("failed to open catalog {}", path.display()))
}

/// Build the engine and make sure the provider accepts our credential.
fn connect(config: &IndexerConfig) -> anyhow::Result<ScanOrchestrator> {
    let provider = TmdbProvider::with_endpoints(&config.metadata.api_key, config.endpoints())
        .context("failed to build metadata client")?;
    let store = open_store(config)?;
    let ctx = IndexerContext::new(Arc::new(provider), Arc::new(store), config.to_settings())
        .context("failed to start indexer")?;

    ctx.limiter().consume(1);
    let valid = ctx
        .provider()
        .validate_credentials()
        .context("could not reach metadata provider")?;
    if !valid {
        bail!("metadata provider rejected the API key");
    }
    info!(provider = %config.metadata.provider, "connected to metadata provider");

    Ok(ScanOrchestrator::new(ctx))
}

pub fn check(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let orchestrator = connect(&config)?;
    let settings = orchestrator.context().settings();

    println!("provider:           {}", config.metadata.provider);
    println!("catalog:            {}", config.catalog_path().display());
    println!("data dir:           {}", settings.data_dir.display());
    println!("artwork height:     {}", settings.artwork_height);
    println!("episode thumbnails: {}", settings.episode_thumbnails);
    println!("min match:          {}", settings.min_match);
    println!(
        "rate limit:         {} per {:?}",
        settings.rate_limit.capacity, settings.rate_limit.interval
    );
    println!("extensions:         {}", settings.media_extensions.join(", "));
    for path in &settings.library_paths {
        println!("library:            {}", path.display());
    }
    Ok(())
}

pub fn rescan(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let orchestrator = connect(&config)?;

    match orchestrator.rescan()? {
        ScanStart::Started(progress) => {
            for line in progress {
                println!("{line}");
            }
        }
        ScanStart::AlreadyRunning => println!("rescan already running"),
    }
    Ok(())
}

pub fn discover(config_path: Option<&Path>, candidates_path: &Path) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let orchestrator = connect(&config)?;

    let mut candidates = candidates::load(candidates_path)?;
    let added = orchestrator.discover(&mut candidates)?;
    candidates::save(candidates_path, &candidates)?;

    info!(added, total = candidates.len(), "candidates saved");
    for candidate in candidates.iter() {
        println!("{}", describe(candidate));
    }
    Ok(())
}

pub fn choose(candidates_path: &Path, path: &Path, id: ExternalId) -> anyhow::Result<()> {
    let mut candidates = candidates::load(candidates_path)?;
    candidates.choose(path, id);
    candidates::save(candidates_path, &candidates)?;

    println!("{} -> {id}", path.display());
    Ok(())
}

pub fn confirm(config_path: Option<&Path>, candidates_path: &Path) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let orchestrator = connect(&config)?;
    let mut candidates = candidates::load(candidates_path)?;

    let report = match orchestrator.confirm(&candidates)? {
        ScanStart::Started(report) => report,
        ScanStart::AlreadyRunning => {
            println!("auto-match already running");
            return Ok(());
        }
    };

    for title in &report.created {
        println!("created: {title}");
    }
    for title in &report.existing {
        println!("exists:  {title}");
    }
    for path in &report.unidentified {
        println!("skipped: {} (no identity)", path.display());
    }
    for path in &report.failed {
        println!("failed:  {}", path.display());
    }

    let store = orchestrator.context().store();
    let catalogued: Vec<_> = candidates
        .iter()
        .filter(|candidate| matches!(store.get_by_path(&candidate.path), Ok(Some(_))))
        .map(|candidate| candidate.path.clone())
        .collect();
    for path in &catalogued {
        candidates.remove(path);
    }
    candidates::save(candidates_path, &candidates)?;
    Ok(())
}

pub fn search(
    config_path: Option<&Path>,
    query: Option<&str>,
    genres: &[String],
    kind: Option<MediaKind>,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let entries = open_store(&config)?.list_all()?;

    let matches = apply_filters(&entries, query, genres, kind);
    if matches.is_empty() {
        println!("no matches");
    }
    for entry in matches {
        println!("{}", summary(entry));
    }
    Ok(())
}

pub fn genres(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let entries = open_store(&config)?.list_all()?;
    for genre in unique_genres(&entries) {
        println!("{genre}");
    }
    Ok(())
}

pub fn reidentify(config_path: Option<&Path>, path: &Path, id: ExternalId) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let orchestrator = connect(&config)?;

    match orchestrator.reidentify(path, id)? {
        Some(title) => {
            println!("{} is now {title}", path.display());
            Ok(())
        }
        None => bail!(
            "could not re-identify {}: no catalog entry there, {id} is unavailable, or its title is already catalogued",
            path.display()
        ),
    }
}

fn describe(candidate: &MatchCandidate) -> String {
    let path = candidate.path.display();
    match (&candidate.proposed, &candidate.resolved) {
        (Some(id), _) => format!("{path} -> {id} (chosen)"),
        (None, Some(result)) => format!("{path} -> {} ({})", result.display_name, result.id),
        (None, None) => format!("{path} -> unidentified"),
    }
}

fn summary(entry: &CatalogEntry) -> String {
    format!(
        "{} ({}) [{}] {:.1} {}",
        entry.title,
        entry.year,
        entry.kind,
        entry.rating,
        entry.genres.join(", ")
    )
}
