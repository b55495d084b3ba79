use std::path::Path;

use thinmedia_model::{
    EntryFields, EpisodeRecord, EpisodeTable, ExternalId, ImageMap, MediaDetails, MediaKind,
};
use tracing::{debug, info};

use crate::context::IndexerContext;
use crate::image::ThumbnailTask;
use crate::naming::clean_title;

/// Which image-map value an artwork task fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArtworkSlot {
    Backdrop,
    Still { season: u32, episode: u32 },
}

#[derive(Debug, Default)]
struct ArtworkPlan {
    tasks: Vec<ThumbnailTask>,
    slots: Vec<(ArtworkSlot, String)>,
}

impl ArtworkPlan {
    fn push(&mut self, slot: ArtworkSlot, task: ThumbnailTask, relative: String) {
        self.tasks.push(task);
        self.slots.push((slot, relative));
    }
}

/// Builds the full field set of a catalog entry from an external identity:
/// metadata, episode table, artwork and file map.
#[derive(Debug)]
pub struct EntryAssembler<'a> {
    ctx: &'a IndexerContext,
}

impl<'a> EntryAssembler<'a> {
    pub fn new(ctx: &'a IndexerContext) -> Self {
        Self { ctx }
    }

    /// `None` when the provider has no usable record for `id`.
    pub fn assemble(&self, id: ExternalId, root: &Path) -> Option<EntryFields> {
        self.ctx.limiter().consume(1);
        let details = match self.ctx.provider().details(id) {
            Ok(details) => details,
            Err(e) => {
                debug!(%id, error = %e, "could not fetch details");
                return None;
            }
        };

        let clean = clean_title(&details.title);
        let mut plan = ArtworkPlan::default();
        let mut images = ImageMap::default();
        self.plan_backdrop(&details, &clean, &mut plan);

        let episodes = match id.kind {
            MediaKind::Movie => EpisodeTable::movie(&details.title, &details.synopsis),
            MediaKind::Series => self.series_episodes(id.id, &details, &clean, &mut plan, &mut images),
        };

        self.fetch_artwork(plan, &mut images);
        if id.kind.is_movie() {
            let backdrop = images.base.clone();
            images.set_thumbnail(0, 0, backdrop);
        }

        let files = self.ctx.file_mapper().map(root, &episodes, id.kind);
        info!(
            %id,
            title = %details.title,
            episodes = episodes.episode_count(),
            files = files.len(),
            "entry assembled"
        );

        Some(EntryFields {
            kind: id.kind,
            title: details.title,
            clean_title: clean,
            year: details.year,
            rating: details.rating,
            rating_count: details.rating_count,
            synopsis: details.synopsis,
            genres: details.genres,
            episodes,
            files,
            images,
        })
    }

    fn plan_backdrop(&self, details: &MediaDetails, clean: &str, plan: &mut ArtworkPlan) {
        let Some(backdrop) = &details.backdrop_path else {
            return;
        };
        let target = self.ctx.artwork_layout().backdrop(clean);
        let task = ThumbnailTask::new(backdrop, target.absolute, self.ctx.settings().artwork_height);
        plan.push(ArtworkSlot::Backdrop, task, target.relative);
    }

    /// Fetch every announced season. A season that cannot be fetched is kept
    /// with no episodes.
    fn series_episodes(
        &self,
        series_id: u64,
        details: &MediaDetails,
        clean: &str,
        plan: &mut ArtworkPlan,
        images: &mut ImageMap,
    ) -> EpisodeTable {
        let settings = self.ctx.settings();
        let layout = self.ctx.artwork_layout();
        let mut table = EpisodeTable::new();

        for &season in &details.seasons {
            table.ensure_season(season);
            images.ensure_season(season);

            self.ctx.limiter().consume(1);
            let listing = match self.ctx.provider().season(series_id, season) {
                Ok(listing) => listing,
                Err(e) => {
                    debug!(series_id, season, error = %e, "could not fetch season");
                    continue;
                }
            };

            for ep in listing {
                let episode = ep.episode_number;
                table.insert(EpisodeRecord::new(season, episode, ep.title, ep.synopsis));
                images.set_thumbnail(season, episode, "");

                if let Some(still) = ep.still_path.filter(|_| settings.episode_thumbnails) {
                    let target = layout.episode_still(clean, season, episode);
                    let task = ThumbnailTask::new(still, target.absolute, settings.artwork_height);
                    plan.push(ArtworkSlot::Still { season, episode }, task, target.relative);
                }
            }
        }
        table
    }

    /// One pool run for the whole entry; only written files are referenced.
    fn fetch_artwork(&self, plan: ArtworkPlan, images: &mut ImageMap) {
        if plan.tasks.is_empty() {
            return;
        }
        let outcomes = self.ctx.thumbnail_pool().fetch(&plan.tasks);

        for ((slot, relative), outcome) in plan.slots.into_iter().zip(outcomes) {
            let value = if outcome.is_saved() { relative } else { String::new() };
            match slot {
                ArtworkSlot::Backdrop => images.base = value,
                ArtworkSlot::Still { season, episode } => {
                    images.set_thumbnail(season, episode, value)
                }
            }
        }
    }
}
