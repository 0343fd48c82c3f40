//! Writes JSON snapshots.

use std::io::Write;
use std::path::Path;

use crate::types::ScoreResult;

use super::Snapshot;

/// Writer for JSON discussion snapshots.
pub struct SnapshotWriter {
    pretty: bool,
}

impl SnapshotWriter {
    /// Create a writer; `pretty` indents the output.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Write a snapshot to a file, replacing it.
    pub fn write_to_file(&self, snapshot: &Snapshot, path: &Path) -> ScoreResult<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        self.write_to(snapshot, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write a snapshot to any writer.
    pub fn write_to(&self, snapshot: &Snapshot, writer: &mut impl Write) -> ScoreResult<()> {
        if self.pretty {
            serde_json::to_writer_pretty(writer, snapshot)?;
        } else {
            serde_json::to_writer(writer, snapshot)?;
        }
        Ok(())
    }
}

impl Default for SnapshotWriter {
    fn default() -> Self {
        Self::new(false)
    }
}
