use std::path::{Path, PathBuf};

use thinmedia_model::{CatalogEntry, ExternalId, MatchCandidate, MatchCandidates};
use tracing::{debug, info, warn};

use super::assemble::EntryAssembler;
use super::progress::RescanProgress;
use super::run_state::{RunFlag, ScanStart};
use crate::catalog::StoreError;
use crate::context::IndexerContext;
use crate::error::Result;

/// What an auto-match confirm pass did with each candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmReport {
    /// Titles of the entries created.
    pub created: Vec<String>,
    /// Candidates with neither a chosen nor a resolved identity.
    pub unidentified: Vec<PathBuf>,
    /// Candidates whose metadata could not be fetched.
    pub failed: Vec<PathBuf>,
    /// Titles already present in the catalog.
    pub existing: Vec<String>,
}

/// Top-level scan state machine.
///
/// Rescan and auto-match each allow one active run at a time; the two kinds
/// may overlap.
#[derive(Debug)]
pub struct ScanOrchestrator {
    ctx: IndexerContext,
    rescan: RunFlag,
    auto_match: RunFlag,
}

impl ScanOrchestrator {
    pub fn new(ctx: IndexerContext) -> Self {
        Self {
            ctx,
            rescan: RunFlag::new("rescan"),
            auto_match: RunFlag::new("auto-match"),
        }
    }

    pub fn context(&self) -> &IndexerContext {
        &self.ctx
    }

    pub fn is_rescan_running(&self) -> bool {
        self.rescan.is_running()
    }

    pub fn is_auto_match_running(&self) -> bool {
        self.auto_match.is_running()
    }

    /// Start a full rescan. The work happens as the returned stream is
    /// consumed.
    pub fn rescan(&self) -> Result<ScanStart<RescanProgress<'_>>> {
        let Some(guard) = self.rescan.try_start() else {
            return Ok(ScanStart::AlreadyRunning);
        };
        let entries = self.ctx.store().list_all()?;
        Ok(ScanStart::Started(RescanProgress::new(&self.ctx, entries, guard)))
    }

    /// Add every unknown library folder to `candidates`, with its best-effort
    /// identity. Existing candidates are never overwritten. Returns how many
    /// were added.
    pub fn discover(&self, candidates: &mut MatchCandidates) -> Result<usize> {
        let mapper = self.ctx.file_mapper();
        let resolver = self.ctx.resolver();
        let mut added = 0;

        for root in &self.ctx.settings().library_paths {
            if !root.is_dir() {
                warn!(root = %root.display(), "library path is not a directory");
                continue;
            }

            for folder in mapper.library_folders(root) {
                if candidates.contains(&folder) {
                    continue;
                }
                if let Some(existing) = self.ctx.store().get_by_path(&folder)? {
                    debug!(path = %folder.display(), title = %existing.title, "already catalogued");
                    continue;
                }

                let name = folder_name(&folder);
                info!(path = %folder.display(), "resolving library folder");
                let resolved = resolver.resolve(&name);
                if resolved.is_none() {
                    debug!(path = %folder.display(), "no automatic match");
                }

                if candidates.insert_if_absent(MatchCandidate::new(folder, resolved)) {
                    added += 1;
                }
            }
        }

        info!(added, total = candidates.len(), "discovery finished");
        Ok(added)
    }

    /// Create a catalog entry for every identified candidate.
    pub fn confirm(&self, candidates: &MatchCandidates) -> Result<ScanStart<ConfirmReport>> {
        let Some(_guard) = self.auto_match.try_start() else {
            return Ok(ScanStart::AlreadyRunning);
        };

        let assembler = EntryAssembler::new(&self.ctx);
        let mut report = ConfirmReport::default();

        for candidate in candidates.iter() {
            let Some(id) = candidate.identity() else {
                debug!(path = %candidate.path.display(), "candidate has no identity");
                report.unidentified.push(candidate.path.clone());
                continue;
            };

            let Some(fields) = assembler.assemble(id, &candidate.path) else {
                warn!(path = %candidate.path.display(), %id, "could not create entry");
                report.failed.push(candidate.path.clone());
                continue;
            };

            let title = fields.title.clone();
            if self.ctx.store().create(CatalogEntry::new(&candidate.path, fields))? {
                info!(title = %title, path = %candidate.path.display(), "entry created");
                report.created.push(title);
            } else {
                report.existing.push(title);
            }
        }

        Ok(ScanStart::Started(report))
    }

    /// Point the entry rooted at `root_path` at a different external record,
    /// replacing all of its metadata. Returns the new title, or `None` when
    /// there is no such entry, the record cannot be fetched, or its title
    /// already belongs to another entry.
    pub fn reidentify(&self, root_path: &Path, id: ExternalId) -> Result<Option<String>> {
        let Some(entry) = self.ctx.store().get_by_path(root_path)? else {
            debug!(path = %root_path.display(), "no entry at path");
            return Ok(None);
        };

        let Some(fields) = EntryAssembler::new(&self.ctx).assemble(id, root_path) else {
            return Ok(None);
        };

        let title = fields.title.clone();
        match self.ctx.store().update_full(entry.id, fields) {
            Ok(()) => {}
            Err(StoreError::DuplicateTitle(taken)) => {
                warn!(path = %root_path.display(), title = %taken, "title already used by another entry");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        }
        info!(from = %entry.title, to = %title, "entry re-identified");
        Ok(Some(title))
    }
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
