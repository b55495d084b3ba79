//! Scan orchestration: file mapping, entry assembly and the rescan /
//! auto-match runs built on them.

pub mod assemble;
pub mod file_mapper;
pub mod orchestrator;
pub mod progress;
pub mod run_state;
pub mod settings;

pub use assemble::EntryAssembler;
pub use file_mapper::FileMapper;
pub use orchestrator::{ConfirmReport, ScanOrchestrator};
pub use progress::{RESCAN_DONE, RescanProgress};
pub use run_state::{RunFlag, RunGuard, ScanStart};
pub use settings::{
    DEFAULT_ARTWORK_HEIGHT, DEFAULT_MEDIA_EXTENSIONS, IndexerSettings,
    default_media_extensions_vec,
};
