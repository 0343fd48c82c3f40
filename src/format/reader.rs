//! Reads JSON snapshots.

use std::io::Read;
use std::path::Path;

use crate::types::ScoreResult;

use super::Snapshot;

/// Reader for JSON discussion snapshots.
pub struct SnapshotReader;

impl SnapshotReader {
    /// Read a snapshot file.
    pub fn read_from_file(path: &Path) -> ScoreResult<Snapshot> {
        let file = std::fs::File::open(path)?;
        Self::read_from(std::io::BufReader::new(file))
    }

    /// Read a snapshot from any reader.
    pub fn read_from(reader: impl Read) -> ScoreResult<Snapshot> {
        let snapshot: Snapshot = serde_json::from_reader(reader)?;
        for vote in &snapshot.votes {
            if let Some(placement) = &vote.placement {
                placement.location.validate()?;
            }
        }
        Ok(snapshot)
    }
}
