//! Locates the newest campaign directory when the caller names none.
//!
//! Campaign runs land under the logs directory as
//! `final_campaign_<timestamp>/`; the runner defaults to the most
//! recently modified one.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// The most recently modified `final_campaign_*` directory under
/// `logs_dir`, if any exists. Unreadable entries are skipped.
pub fn latest_campaign(logs_dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(logs_dir).ok()?;

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.starts_with("final_campaign_") {
            continue;
        }
        let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };
        match &newest {
            Some((best, _)) if *best >= modified => {}
            _ => newest = Some((modified, path)),
        }
    }
    newest.map(|(_, path)| path)
}
