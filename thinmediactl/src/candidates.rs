use std::fs;
use std::path::Path;

use anyhow::Context;
use thinmedia_core::model::MatchCandidates;

/// Read the accumulator, starting empty when the file is missing or blank.
pub fn load(path: &Path) -> anyhow::Result<MatchCandidates> {
    if !path.exists() {
        return Ok(MatchCandidates::new());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read candidates from {}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(MatchCandidates::new());
    }
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid candidates file {}", path.display()))
}

pub fn save(path: &Path, candidates: &MatchCandidates) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(candidates)?)
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}
