use std::vec;

use thinmedia_model::CatalogEntry;
use tracing::{debug, info, warn};

use super::run_state::RunGuard;
use crate::context::IndexerContext;

/// Terminal message of every rescan stream.
pub const RESCAN_DONE: &str = "done";

/// Lazy full rescan: each call to `next` recomputes and stores one entry's
/// file map, then yields `"Indexing: <title>"`. The stream ends with
/// [`RESCAN_DONE`].
///
/// The rescan flag is held until the stream is exhausted or dropped.
pub struct RescanProgress<'a> {
    ctx: &'a IndexerContext,
    entries: vec::IntoIter<CatalogEntry>,
    guard: Option<RunGuard<'a>>,
    refreshed: usize,
}

impl std::fmt::Debug for RescanProgress<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RescanProgress")
            .field("remaining", &self.entries.len())
            .field("refreshed", &self.refreshed)
            .field("running", &self.guard.is_some())
            .finish()
    }
}

impl<'a> RescanProgress<'a> {
    pub(crate) fn new(
        ctx: &'a IndexerContext,
        entries: Vec<CatalogEntry>,
        guard: RunGuard<'a>,
    ) -> Self {
        info!(entries = entries.len(), "rescan started");
        Self {
            ctx,
            entries: entries.into_iter(),
            guard: Some(guard),
            refreshed: 0,
        }
    }

    fn refresh(&mut self, entry: &CatalogEntry) {
        let mapping = self
            .ctx
            .file_mapper()
            .map(&entry.root_path, &entry.episodes, entry.kind);
        let files = mapping.len();

        match self.ctx.store().update_file_map(&entry.title, mapping) {
            Ok(()) => {
                self.refreshed += 1;
                debug!(title = %entry.title, files, "file map updated");
            }
            Err(e) => warn!(title = %entry.title, error = %e, "could not store file map"),
        }
    }
}

impl Iterator for RescanProgress<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if let Some(entry) = self.entries.next() {
            self.refresh(&entry);
            return Some(format!("Indexing: {}", entry.title));
        }

        // Release the flag before announcing completion
        self.guard.take().map(|guard| {
            drop(guard);
            info!(refreshed = self.refreshed, "rescan finished");
            RESCAN_DONE.to_string()
        })
    }
}
