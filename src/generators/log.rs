use std::fmt;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::{MazeError, Result};
use crate::maze::GraphMaze;
use crate::maze::codec::{SnapshotKind, read_frame, write_frame};

/// Largest grid a loaded log may describe. A log payload carries no adjacency to check the
/// dimensions against, and replaying allocates one list per cell.
pub const MAX_CELLS: usize = 1 << 22;

/// One step of a maze generation algorithm. Self-describing, so a log of events can be
/// replayed onto a fresh maze to rebuild any intermediate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenEvent {
    /// The wall between two vertices was broken.
    Connect { a: usize, b: usize },
    /// The wall between two vertices was built.
    Disconnect { a: usize, b: usize },
    /// Start and end vertices were set (`None` clears).
    SetEndpoints {
        start: Option<usize>,
        end: Option<usize>,
    },
}

impl GenEvent {
    /// Short label for logging.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "CONNECT",
            Self::Disconnect { .. } => "DISCONNECT",
            Self::SetEndpoints { .. } => "SET_ENDPOINTS",
        }
    }

    /// Applies this event to `maze`. Returns whether the maze changed.
    pub fn apply(&self, maze: &mut GraphMaze) -> Result<bool> {
        match *self {
            Self::Connect { a, b } => maze.connect(a, b),
            Self::Disconnect { a, b } => maze.disconnect(a, b),
            Self::SetEndpoints { start, end } => {
                let changed = maze.start() != start || maze.end() != end;
                maze.set_endpoints(start, end)?;
                Ok(changed)
            }
        }
    }
}

impl fmt::Display for GenEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<usize>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
        match self {
            Self::Connect { a, b } => write!(f, "Connect {a} <-> {b}"),
            Self::Disconnect { a, b } => write!(f, "Disconnect {a} <-> {b}"),
            Self::SetEndpoints { start, end } => {
                write!(f, "SetEndpoints start={} end={}", show(*start), show(*end))
            }
        }
    }
}

/// Ordered, append-only record of every mutation performed by a generation run.
///
/// [`GenLog::build_maze_until`] replays a prefix of the log onto a fresh maze, which lets
/// callers scrub through the generation step by step. Replay is always computed from
/// scratch, so its cost is linear in the requested index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenLog {
    maze_width: usize,
    maze_height: usize,
    events: Vec<GenEvent>,
}

impl GenLog {
    pub fn new(maze_width: usize, maze_height: usize) -> Result<Self> {
        if maze_width == 0 || maze_height == 0 {
            return Err(MazeError::InvalidDimensions {
                width: maze_width,
                height: maze_height,
            });
        }
        Ok(GenLog {
            maze_width,
            maze_height,
            events: Vec::new(),
        })
    }

    pub fn maze_width(&self) -> usize {
        self.maze_width
    }

    pub fn maze_height(&self) -> usize {
        self.maze_height
    }

    /// Appends an event without validating it.
    pub fn add(&mut self, event: GenEvent) {
        self.events.push(event);
    }

    /// Applies an event to `maze`, then appends it. Nothing is appended if the event fails.
    pub fn add_applied(&mut self, maze: &mut GraphMaze, event: GenEvent) -> Result<bool> {
        let changed = Self::apply_event(maze, &event)?;
        self.events.push(event);
        Ok(changed)
    }

    pub fn apply_event(maze: &mut GraphMaze, event: &GenEvent) -> Result<bool> {
        event.apply(maze)
    }

    pub fn get(&self, idx: usize) -> Option<&GenEvent> {
        self.events.get(idx)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[GenEvent] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GenEvent> {
        self.events.iter()
    }

    /// Builds the maze as it was before event `max_event_index`, by replaying events
    /// `[0, max_event_index)` on a maze with every wall up.
    ///
    /// `0` gives the initial maze, [`GenLog::len`] gives the final one.
    pub fn build_maze_until(&self, max_event_index: usize) -> Result<GraphMaze> {
        if max_event_index > self.events.len() {
            return Err(MazeError::IndexOutOfRange {
                index: max_event_index,
                len: self.events.len(),
            });
        }
        let mut maze = GraphMaze::new(self.maze_width, self.maze_height)?;
        for event in &self.events[..max_event_index] {
            event.apply(&mut maze)?;
        }
        Ok(maze)
    }

    /// Builds the final maze by replaying every event.
    pub fn build_maze(&self) -> Result<GraphMaze> {
        self.build_maze_until(self.events.len())
    }

    /// Writes this log as a versioned snapshot, in the same framing as maze snapshots.
    pub fn save(&self, mut writer: impl Write) -> Result<()> {
        let size = write_frame(&mut writer, SnapshotKind::GenLog, self)?;
        tracing::debug!(
            "[codec] saved generation log with {} events ({} bytes)",
            self.len(),
            size
        );
        Ok(())
    }

    /// Reads a log written by [`GenLog::save`]. Events are checked by replaying them once.
    pub fn load(mut reader: impl Read) -> Result<Self> {
        let log: GenLog = read_frame(&mut reader, SnapshotKind::GenLog)?;
        let num_cells = log.maze_width.checked_mul(log.maze_height);
        if !matches!(num_cells, Some(1..=MAX_CELLS)) {
            return Err(MazeError::InvalidDimensions {
                width: log.maze_width,
                height: log.maze_height,
            });
        }
        log.build_maze()?;
        Ok(log)
    }
}

impl<'a> IntoIterator for &'a GenLog {
    type Item = &'a GenEvent;
    type IntoIter = std::slice::Iter<'a, GenEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl fmt::Display for GenLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "GenLog [{}x{}] {} events:",
            self.maze_width,
            self.maze_height,
            self.events.len()
        )?;
        for (i, event) in self.events.iter().enumerate() {
            writeln!(f, "  {i:<3} : {event}")?;
        }
        Ok(())
    }
}

/// The outcome of a generation run: the final maze and the log that built it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenResult {
    pub maze: GraphMaze,
    pub log: GenLog,
}

impl fmt::Display for GenResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.maze)?;
        write!(f, "{}", self.log)
    }
}
