use std::fs;
use std::path::PathBuf;
use std::thread;

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::providers::MetadataProvider;
use crate::rate_limit::RateLimiter;

/// Remote artwork path to fetch and where to store the resized copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailTask {
    pub remote: String,
    pub local_path: PathBuf,
    pub target_height: u32,
}

impl ThumbnailTask {
    pub fn new(remote: impl Into<String>, local_path: impl Into<PathBuf>, target_height: u32) -> Self {
        Self {
            remote: remote.into(),
            local_path: local_path.into(),
            target_height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailOutcome {
    /// The resized image was written to `local_path`.
    Saved,
    /// No remote artwork; nothing was fetched.
    Skipped,
    /// Download, decode or write failed; logged and dropped.
    Failed,
}

impl ThumbnailOutcome {
    pub fn is_saved(self) -> bool {
        matches!(self, ThumbnailOutcome::Saved)
    }
}

/// Providers send empty strings or the literal `None` for missing artwork.
pub fn is_placeholder(remote: &str) -> bool {
    let remote = remote.trim();
    remote.is_empty() || remote == "None"
}

/// Scale `image` to `height`, keeping the aspect ratio.
pub fn resize_to_height(image: &DynamicImage, height: u32) -> DynamicImage {
    let height = height.max(1);
    let (w, h) = (image.width().max(1), image.height().max(1));
    let width = ((u64::from(height) * u64::from(w)) / u64::from(h)).max(1);
    let width = u32::try_from(width).unwrap_or(u32::MAX);
    image.resize_exact(width, height, FilterType::CatmullRom)
}

fn save_resized(bytes: &[u8], task: &ThumbnailTask) -> Result<()> {
    let decoded = image::load_from_memory(bytes)?;
    let resized = resize_to_height(&decoded, task.target_height);
    if let Some(parent) = task.local_path.parent() {
        fs::create_dir_all(parent)?;
    }
    // JPEG has no alpha channel
    resized.to_rgb8().save(&task.local_path)?;
    Ok(())
}

/// Downloads artwork in synchronous batches, one worker thread per task and
/// at most `workers` tasks per batch. Each batch is joined before the next
/// one starts.
pub struct ThumbnailPool<'a> {
    provider: &'a dyn MetadataProvider,
    limiter: &'a RateLimiter,
    workers: usize,
}

impl std::fmt::Debug for ThumbnailPool<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThumbnailPool")
            .field("workers", &self.workers)
            .finish_non_exhaustive()
    }
}

impl<'a> ThumbnailPool<'a> {
    pub fn new(provider: &'a dyn MetadataProvider, limiter: &'a RateLimiter) -> Self {
        Self {
            provider,
            limiter,
            workers: num_cpus::get().max(1),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run every task; outcomes come back in task order. Individual failures
    /// never stop the remaining tasks.
    pub fn fetch(&self, tasks: &[ThumbnailTask]) -> Vec<ThumbnailOutcome> {
        let mut outcomes = Vec::with_capacity(tasks.len());

        for batch in tasks.chunks(self.workers) {
            thread::scope(|scope| {
                let handles: Vec<_> = batch
                    .iter()
                    .map(|task| scope.spawn(move || self.run_task(task)))
                    .collect();
                for handle in handles {
                    outcomes.push(handle.join().unwrap_or(ThumbnailOutcome::Failed));
                }
            });
        }

        debug!(
            tasks = tasks.len(),
            saved = outcomes.iter().filter(|o| o.is_saved()).count(),
            "thumbnail batch finished"
        );
        outcomes
    }

    fn run_task(&self, task: &ThumbnailTask) -> ThumbnailOutcome {
        if is_placeholder(&task.remote) {
            trace!(path = %task.local_path.display(), "no remote artwork");
            return ThumbnailOutcome::Skipped;
        }

        self.limiter.consume(1);
        let bytes = match self.provider.download_image(&task.remote) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(remote = %task.remote, error = %e, "image download failed");
                return ThumbnailOutcome::Failed;
            }
        };

        match save_resized(&bytes, task) {
            Ok(()) => {
                trace!(path = %task.local_path.display(), "image saved");
                ThumbnailOutcome::Saved
            }
            Err(e) => {
                warn!(remote = %task.remote, path = %task.local_path.display(), error = %e, "could not store image");
                ThumbnailOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderError;
    use crate::providers::traits::MockMetadataProvider;
    use crate::rate_limit::RateLimitSettings;
    use image::{ImageBuffer, ImageFormat, Rgb};
    use std::io::Cursor;
    use std::time::Duration;
    use tempfile::TempDir;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let buffer = ImageBuffer::from_pixel(width, height, Rgb([200u8, 40, 40]));
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(buffer)
            .write_to(&mut bytes, ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    fn limiter() -> RateLimiter {
        RateLimiter::new(RateLimitSettings {
            capacity: 100,
            interval: Duration::from_secs(3600),
        })
        .unwrap()
    }

    #[test]
    fn resize_keeps_aspect_ratio() {
        let image = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(1920, 1080, Rgb([0u8, 0, 0])));
        let resized = resize_to_height(&image, 360);
        assert_eq!((resized.width(), resized.height()), (640, 360));
    }

    #[test]
    fn placeholders_are_skipped_without_a_token() {
        let dir = TempDir::new().unwrap();
        let provider = MockMetadataProvider::new();
        let limiter = limiter();
        let pool = ThumbnailPool::new(&provider, &limiter);

        let tasks = vec![
            ThumbnailTask::new("", dir.path().join("a.jpg"), 100),
            ThumbnailTask::new("None", dir.path().join("b.jpg"), 100),
        ];
        let outcomes = pool.fetch(&tasks);

        assert_eq!(outcomes, vec![ThumbnailOutcome::Skipped; 2]);
        assert!(!dir.path().join("a.jpg").exists());
        assert_eq!(limiter.available(), 100);
    }

    #[test]
    fn failures_do_not_stop_the_batch() {
        let dir = TempDir::new().unwrap();
        let mut provider = MockMetadataProvider::new();
        provider.expect_download_image().returning(|remote| match remote {
            "/ok.jpg" => Ok(png(40, 20)),
            "/garbage.jpg" => Ok(b"not an image".to_vec()),
            _ => Err(ProviderError::NotFound),
        });
        let limiter = limiter();
        let pool = ThumbnailPool::new(&provider, &limiter).with_workers(2);

        let saved = dir.path().join("show").join("S1E1").join("base.jpg");
        let tasks = vec![
            ThumbnailTask::new("/missing.jpg", dir.path().join("x.jpg"), 10),
            ThumbnailTask::new("/garbage.jpg", dir.path().join("y.jpg"), 10),
            ThumbnailTask::new("/ok.jpg", &saved, 10),
        ];
        let outcomes = pool.fetch(&tasks);

        assert_eq!(
            outcomes,
            vec![
                ThumbnailOutcome::Failed,
                ThumbnailOutcome::Failed,
                ThumbnailOutcome::Saved
            ]
        );
        assert_eq!(image::image_dimensions(&saved).unwrap(), (20, 10));
        assert_eq!(limiter.available(), 97);
    }

    #[test]
    fn batches_are_bounded_and_joined_in_order() {
        use parking_lot::Mutex;
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        #[derive(Debug, PartialEq)]
        enum Event {
            Start(String),
            End(String),
        }

        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_in_flight = Arc::new(AtomicUsize::new(0));
        let events = Arc::new(Mutex::new(Vec::new()));

        let mut provider = MockMetadataProvider::new();
        {
            let in_flight = Arc::clone(&in_flight);
            let max_in_flight = Arc::clone(&max_in_flight);
            let events = Arc::clone(&events);
            provider.expect_download_image().returning(move |remote| {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_in_flight.fetch_max(now, Ordering::SeqCst);
                events.lock().push(Event::Start(remote.to_string()));
                thread::sleep(Duration::from_millis(20));
                events.lock().push(Event::End(remote.to_string()));
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Err(ProviderError::NotFound)
            });
        }

        let dir = TempDir::new().unwrap();
        let limiter = limiter();
        let pool = ThumbnailPool::new(&provider, &limiter).with_workers(2);
        let tasks: Vec<_> = (0..5)
            .map(|i| ThumbnailTask::new(format!("/{i}.jpg"), dir.path().join(format!("{i}.jpg")), 10))
            .collect();

        let outcomes = pool.fetch(&tasks);
        assert_eq!(outcomes, vec![ThumbnailOutcome::Failed; 5]);
        assert!(max_in_flight.load(Ordering::SeqCst) <= 2);

        let events = events.lock();
        let position = |event: Event| events.iter().position(|e| *e == event).unwrap();
        let batches: Vec<Vec<usize>> = vec![vec![0, 1], vec![2, 3], vec![4]];
        for pair in batches.windows(2) {
            let last_end = pair[0]
                .iter()
                .map(|i| position(Event::End(format!("/{i}.jpg"))))
                .max()
                .unwrap();
            for i in &pair[1] {
                assert!(position(Event::Start(format!("/{i}.jpg"))) > last_end);
            }
        }
    }
}
