//! Save/load of the AI layer.
//!
//! Snapshots are bincode inside a zlib stream, the same container the map
//! files use. The host world is persisted by the host.

use std::fs::File;
use std::io::{BufReader, BufWriter};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::ai::controller::ControllerSnapshot;
use crate::game::formation::CrowdAllocator;
use crate::game::pathfinding::{PathMailbox, SchedulerSnapshot};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] bincode::Error),
    #[error("snapshot version {found} is not supported (expected {expected})")]
    Version { found: u32, expected: u32 },
}

/// Everything needed to resume the AI layer on the same tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AiSnapshot {
    pub version: u32,
    pub tick: u64,
    pub scheduler: SchedulerSnapshot,
    /// In ascending unit order.
    pub controllers: Vec<ControllerSnapshot>,
    pub mailbox: PathMailbox,
    pub crowds: CrowdAllocator,
}

impl AiSnapshot {
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        bincode::serialize_into(&mut encoder, self)?;
        Ok(encoder.finish()?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let mut decoder = ZlibDecoder::new(bytes);
        let snapshot: AiSnapshot = bincode::deserialize_from(&mut decoder)?;
        snapshot.check_version()
    }

    fn check_version(self) -> Result<Self, SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::Version { found: self.version, expected: SNAPSHOT_VERSION });
        }
        Ok(self)
    }
}

pub fn save_snapshot(path: &str, snapshot: &AiSnapshot) -> Result<(), SnapshotError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let mut encoder = ZlibEncoder::new(writer, Compression::default());
    bincode::serialize_into(&mut encoder, snapshot)?;
    encoder.finish()?;
    Ok(())
}

pub fn load_snapshot(path: &str) -> Result<AiSnapshot, SnapshotError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut decoder = ZlibDecoder::new(reader);
    let snapshot: AiSnapshot = bincode::deserialize_from(&mut decoder)?;
    snapshot.check_version()
}
