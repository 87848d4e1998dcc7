//! Versioned binary snapshots of mazes and generation logs.
//!
//! Each snapshot is a single frame:
//! `[magic: u32][version: u32][kind: u8][len: u32][payload: [u8; len]]`,
//! integers little-endian, payload encoded with bincode.
//!
//! Loading never trusts the payload: the decoded graph is rebuilt through the same
//! validation as live mutations, so a corrupt snapshot fails instead of producing
//! a maze that breaks the adjacency invariants.

use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{MazeError, Result};
use crate::maze::GraphMaze;

const MAGIC: u32 = 0x5247_5A4D; // "MZGR"
pub const FORMAT_VERSION: u32 = 1;

/// Maximum payload size (64 MiB). Prevents OOM on corrupted length fields.
const MAX_PAYLOAD_SIZE: u32 = 64 * 1024 * 1024;

/// What a frame holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SnapshotKind {
    Maze = 0,
    GenLog = 1,
}

impl SnapshotKind {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(SnapshotKind::Maze),
            1 => Some(SnapshotKind::GenLog),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct MazeSnapshot {
    width: usize,
    height: usize,
    start: Option<usize>,
    end: Option<usize>,
    edges: Vec<Vec<usize>>,
}

fn read_err(what: &str, e: io::Error) -> MazeError {
    match e.kind() {
        io::ErrorKind::UnexpectedEof => MazeError::Serialization(format!("truncated {what}")),
        _ => MazeError::Serialization(format!("read {what}: {e}")),
    }
}

fn read_u32(reader: &mut impl Read, what: &str) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf).map_err(|e| read_err(what, e))?;
    Ok(u32::from_le_bytes(buf))
}

/// Encode `value` and write it as one frame of the given kind.
pub(crate) fn write_frame<T: Serialize>(
    writer: &mut impl Write,
    kind: SnapshotKind,
    value: &T,
) -> Result<usize> {
    let payload = bincode::serialize(value)?;
    let len = u32::try_from(payload.len())
        .ok()
        .filter(|&len| len <= MAX_PAYLOAD_SIZE)
        .ok_or_else(|| {
            MazeError::Serialization(format!("payload too large: {} bytes", payload.len()))
        })?;

    writer.write_all(&MAGIC.to_le_bytes())?;
    writer.write_all(&FORMAT_VERSION.to_le_bytes())?;
    writer.write_all(&[kind as u8])?;
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(&payload)?;
    writer.flush()?;
    Ok(payload.len())
}

/// Read one frame, check its header against `kind`, and decode the payload.
pub(crate) fn read_frame<T: DeserializeOwned>(
    reader: &mut impl Read,
    kind: SnapshotKind,
) -> Result<T> {
    let magic = read_u32(reader, "magic")?;
    if magic != MAGIC {
        return Err(MazeError::IncompatibleSnapshot {
            expected: format!("magic {MAGIC:#010x}"),
            found: format!("magic {magic:#010x}"),
        });
    }

    let version = read_u32(reader, "version")?;
    if version != FORMAT_VERSION {
        return Err(MazeError::IncompatibleSnapshot {
            expected: format!("version {FORMAT_VERSION}"),
            found: format!("version {version}"),
        });
    }

    let mut kind_buf = [0u8; 1];
    reader
        .read_exact(&mut kind_buf)
        .map_err(|e| read_err("kind", e))?;
    match SnapshotKind::from_byte(kind_buf[0]) {
        Some(found) if found == kind => {}
        found => {
            return Err(MazeError::IncompatibleSnapshot {
                expected: format!("{kind:?} snapshot"),
                found: match found {
                    Some(other) => format!("{other:?} snapshot"),
                    None => format!("unknown kind {}", kind_buf[0]),
                },
            });
        }
    }

    let len = read_u32(reader, "length")?;
    if len > MAX_PAYLOAD_SIZE {
        return Err(MazeError::Serialization(format!(
            "payload length {len} exceeds the {MAX_PAYLOAD_SIZE} byte limit"
        )));
    }
    let mut payload = vec![0u8; len as usize];
    reader
        .read_exact(&mut payload)
        .map_err(|e| read_err("payload", e))?;

    Ok(bincode::deserialize(&payload)?)
}

impl GraphMaze {
    /// Writes a complete snapshot of this maze (dimensions, endpoints, adjacency).
    pub fn save(&self, mut writer: impl Write) -> Result<()> {
        let snapshot = MazeSnapshot {
            width: self.width(),
            height: self.height(),
            start: self.start(),
            end: self.end(),
            edges: self.adjacency().to_vec(),
        };
        let size = write_frame(&mut writer, SnapshotKind::Maze, &snapshot)?;
        tracing::debug!(
            "[codec] saved {}x{} maze ({} bytes)",
            self.width(),
            self.height(),
            size
        );
        Ok(())
    }

    /// Reads a maze written by [`GraphMaze::save`].
    ///
    /// # Errors
    /// * [`MazeError::IncompatibleSnapshot`] on a wrong magic, version or snapshot kind
    /// * [`MazeError::Serialization`] on truncated or undecodable input
    /// * any validation error if the decoded graph breaks a maze invariant
    pub fn load(mut reader: impl Read) -> Result<Self> {
        let snapshot: MazeSnapshot = read_frame(&mut reader, SnapshotKind::Maze)?;
        let maze = GraphMaze::from_parts(
            snapshot.width,
            snapshot.height,
            snapshot.start,
            snapshot.end,
            snapshot.edges,
        )?;
        tracing::debug!(
            "[codec] loaded {}x{} maze with {} edges",
            maze.width(),
            maze.height(),
            maze.num_edges()
        );
        Ok(maze)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.save(&mut buf)?;
        Ok(buf)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        GraphMaze::load(bytes)
    }
}
