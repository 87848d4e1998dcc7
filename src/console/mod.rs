mod playback;
mod term;

use std::{
    fs::File,
    io::{BufReader, BufWriter, Stdout, Write},
    path::{Path, PathBuf},
};

use crossterm::{
    ExecutableCommand, QueueableCommand,
    style::{self, Attribute, Color, Stylize},
};

pub use playback::{Playback, PlaybackAction};
pub use term::TerminalGuard;

use crate::{
    error::MazeError,
    generators::{GenLog, Generator, generate_maze, introduce_chaos},
    maze::GraphMaze,
    solvers::{Solver, solve_maze, solve_maze_steps},
};

/// Settings for the interactive console and its log output.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// Smallest accepted maze width or height
    pub min_dimension: usize,
    /// Largest accepted maze width or height
    pub max_dimension: usize,
    /// Fraction of remaining walls broken when an imperfect maze is requested without a value
    pub default_chaos: f64,
    /// Directory the log file is written to
    pub log_dir: PathBuf,
    pub log_file: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            min_dimension: 2,
            max_dimension: 50,
            default_chaos: 0.2,
            log_dir: PathBuf::from("logs"),
            log_file: "mazegraph.log".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Generate,
    Display,
    Solve,
    ReplayGeneration,
    Save,
    Load,
    Quit,
}

impl std::fmt::Display for MenuAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MenuAction::Generate => write!(f, "Generate a new maze"),
            MenuAction::Display => write!(f, "Display the maze"),
            MenuAction::Solve => write!(f, "Solve the maze"),
            MenuAction::ReplayGeneration => write!(f, "Replay the generation step by step"),
            MenuAction::Save => write!(f, "Save to file"),
            MenuAction::Load => write!(f, "Load from file"),
            MenuAction::Quit => write!(f, "Quit"),
        }
    }
}

/// What a file holds: a whole maze, or the log of the run that generated one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Maze,
    GenLog,
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileKind::Maze => write!(f, "Maze"),
            FileKind::GenLog => write!(f, "Generation log"),
        }
    }
}

/// Interactive terminal front-end. Holds the current maze and, when it was generated in this
/// session or loaded from a log, the log that built it.
pub struct Console {
    config: ConsoleConfig,
    maze: Option<GraphMaze>,
    log: Option<GenLog>,
}

impl Console {
    /// Available maze generators
    const GENERATORS: [Generator; 2] = [Generator::Dfs, Generator::Prim];
    /// Available maze solvers
    const SOLVERS: [Solver; 5] = [
        Solver::Dfs,
        Solver::LeftHand,
        Solver::Clockwise,
        Solver::Dijkstra,
        Solver::AStar,
    ];
    const ACTIONS: [MenuAction; 7] = [
        MenuAction::Generate,
        MenuAction::Display,
        MenuAction::Solve,
        MenuAction::ReplayGeneration,
        MenuAction::Save,
        MenuAction::Load,
        MenuAction::Quit,
    ];

    pub fn new(config: ConsoleConfig) -> Self {
        Console {
            config,
            maze: None,
            log: None,
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Main menu loop. Returns when the user quits or presses Esc on the main menu.
    /// Failures of maze operations are shown to the user; only terminal I/O errors end the loop.
    pub fn run(&mut self, stdout: &mut Stdout) -> std::io::Result<()> {
        tracing::info!("Started console loop");
        loop {
            term::clear(stdout)?;
            stdout.queue(style::PrintStyledContent(
                format!("{}\r\n\r\n", self.status_line())
                    .with(Color::Blue)
                    .attribute(Attribute::Bold),
            ))?;
            stdout.flush()?;

            let action = match term::select(
                stdout,
                "Choose an action (use arrow keys and Enter, or Esc to quit):",
                &Console::ACTIONS,
            )? {
                Some(MenuAction::Quit) | None => break,
                Some(action) => action,
            };
            tracing::debug!("[console] selected action: {}", action);

            let outcome = match action {
                MenuAction::Generate => self.generate(stdout),
                MenuAction::Display => self.display(stdout),
                MenuAction::Solve => self.solve(stdout),
                MenuAction::ReplayGeneration => self.replay_generation(stdout),
                MenuAction::Save => self.save(stdout),
                MenuAction::Load => self.load(stdout),
                MenuAction::Quit => break,
            };
            match outcome {
                Ok(()) => {}
                Err(ActionError::Io(e)) => return Err(e),
                Err(ActionError::Maze(e)) => {
                    tracing::info!("[console] {} failed: {}", action, e);
                    term::print_message(stdout, &format!("Error: {}", e), Color::Red)?;
                }
                Err(ActionError::Unavailable(reason)) => {
                    let msg = format!("Cannot do that: {}", reason);
                    term::print_message(stdout, &msg, Color::Red)?;
                }
            }

            stdout.execute(style::PrintStyledContent(
                "Press Esc to return to the menu...\r\n"
                    .with(Color::Blue)
                    .attribute(Attribute::Bold),
            ))?;
            term::wait_for_esc()?;
        }
        tracing::info!("Exiting console loop");
        Ok(())
    }

    fn status_line(&self) -> String {
        match &self.maze {
            Some(maze) => format!(
                "Current maze: {}x{}, {} passages{}",
                maze.width(),
                maze.height(),
                maze.num_edges(),
                match &self.log {
                    Some(log) => format!(", generated in {} events", log.len()),
                    None => String::new(),
                }
            ),
            None => "No maze yet. Generate or load one.".to_string(),
        }
    }

    fn current_maze(&self) -> Result<&GraphMaze, ActionError> {
        self.maze
            .as_ref()
            .ok_or(ActionError::Unavailable("there is no maze yet"))
    }

    fn generate(&mut self, stdout: &mut Stdout) -> Result<(), ActionError> {
        let (min, max) = (self.config.min_dimension, self.config.max_dimension);
        stdout.execute(style::PrintStyledContent(
            format!(
                "Enter maze dimensions (between {} and {}), or press Esc to cancel.\r\n",
                min, max
            )
            .with(Color::Blue),
        ))?;
        let Some(width) = term::prompt(stdout, "Width: ", |s| parse_dimension(s, min, max))? else {
            return Ok(());
        };
        let Some(height) = term::prompt(stdout, "Height: ", |s| parse_dimension(s, min, max))?
        else {
            return Ok(());
        };
        let Some(seed) = term::prompt(stdout, "Seed (leave empty for a random maze): ", parse_seed)?
        else {
            return Ok(());
        };
        let Some(generator) = term::select(
            stdout,
            "Select maze generation algorithm:",
            &Console::GENERATORS,
        )?
        else {
            return Ok(());
        };
        let Some(perfect) = term::select(
            stdout,
            "Perfect maze (a single path between any two cells)?",
            &["Yes", "No"],
        )?
        else {
            return Ok(());
        };
        let chaos = if perfect == "No" {
            let default = self.config.default_chaos;
            let prompt = format!("Chaos fraction in [0, 1] (default {}): ", default);
            match term::prompt(stdout, &prompt, |s| parse_fraction(s, default))? {
                Some(fraction) => Some(fraction),
                None => return Ok(()),
            }
        } else {
            None
        };

        let mut result = generate_maze(generator, width, height, seed)?;
        if let Some(fraction) = chaos {
            introduce_chaos(&mut result, fraction, seed)?;
        }
        term::print_message(
            stdout,
            &format!(
                "Generated a {}x{} maze with {} in {} events.",
                width,
                height,
                generator,
                result.log.len()
            ),
            Color::Green,
        )?;
        self.maze = Some(result.maze);
        self.log = Some(result.log);
        Ok(())
    }

    fn display(&self, stdout: &mut Stdout) -> Result<(), ActionError> {
        let maze = self.current_maze()?;
        term::print_block(stdout, &maze.to_string())?;
        Ok(())
    }

    fn solve(&self, stdout: &mut Stdout) -> Result<(), ActionError> {
        let maze = self.current_maze()?;
        let Some(solver) =
            term::select(stdout, "Select maze solving algorithm:", &Console::SOLVERS)?
        else {
            return Ok(());
        };
        let Some(mode) = term::select(
            stdout,
            "Show the final path or every step?",
            &["Final path", "Step by step"],
        )?
        else {
            return Ok(());
        };

        let array = maze.to_array_maze(false);
        let path = if mode == "Step by step" {
            let steps = solve_maze_steps(maze, solver)?;
            let title = solver.to_string();
            Playback::new(steps.len()).run(stdout, &title, |i| array.render(&steps[i]))?;
            steps.last().cloned().unwrap_or_default()
        } else {
            solve_maze(maze, solver)?
        };

        term::clear(stdout)?;
        term::print_block(stdout, &array.render(&path))?;
        if path.is_empty() {
            term::print_message(stdout, "No path found.", Color::Red)?;
        } else {
            term::print_message(
                stdout,
                &format!("Path found: {} cells.", path.len()),
                Color::Green,
            )?;
        }
        Ok(())
    }

    fn replay_generation(&self, stdout: &mut Stdout) -> Result<(), ActionError> {
        let log = self
            .log
            .as_ref()
            .ok_or(ActionError::Unavailable("no generation log for this maze"))?;
        Playback::new(log.len() + 1)
            .run(stdout, "Generation replay", |i| replay_frame(log, i))?;
        Ok(())
    }

    fn save(&self, stdout: &mut Stdout) -> Result<(), ActionError> {
        let Some(kind) = term::select(
            stdout,
            "What do you want to save?",
            &[FileKind::Maze, FileKind::GenLog],
        )?
        else {
            return Ok(());
        };
        let Some(path) = term::prompt(stdout, "File: ", parse_file_path)? else {
            return Ok(());
        };
        match kind {
            FileKind::Maze => save_maze(self.current_maze()?, &path)?,
            FileKind::GenLog => {
                let log = self
                    .log
                    .as_ref()
                    .ok_or(ActionError::Unavailable("no generation log for this maze"))?;
                save_log(log, &path)?;
            }
        }
        term::print_message(
            stdout,
            &format!("{} saved to {}", kind, path.display()),
            Color::Green,
        )?;
        Ok(())
    }

    fn load(&mut self, stdout: &mut Stdout) -> Result<(), ActionError> {
        let Some(kind) = term::select(
            stdout,
            "What does the file hold?",
            &[FileKind::Maze, FileKind::GenLog],
        )?
        else {
            return Ok(());
        };
        let Some(path) = term::prompt(stdout, "File: ", parse_file_path)? else {
            return Ok(());
        };
        match kind {
            FileKind::Maze => {
                self.maze = Some(load_maze(&path)?);
                self.log = None;
            }
            FileKind::GenLog => {
                let log = load_log(&path)?;
                self.maze = Some(log.build_maze()?);
                self.log = Some(log);
            }
        }
        term::print_message(
            stdout,
            &format!("{} loaded from {}", kind, path.display()),
            Color::Green,
        )?;
        Ok(())
    }
}

/// Frame `index` of a generation replay: the maze before event `index`, rebuilt from scratch,
/// with that event underneath. The frame after the last event shows the finished maze.
fn replay_frame(log: &GenLog, index: usize) -> String {
    let maze = match log.build_maze_until(index) {
        Ok(maze) => maze,
        Err(e) => return format!("cannot replay to event {}: {}", index, e),
    };
    match log.get(index) {
        Some(event) => format!("{}\nnext: {}", maze, event),
        None => format!("{}\ndone", maze),
    }
}

/// Why a menu action stopped early.
enum ActionError {
    /// Terminal I/O failed; the console cannot continue
    Io(std::io::Error),
    /// The maze operation failed; reported to the user
    Maze(MazeError),
    /// The action needs something the session does not have yet
    Unavailable(&'static str),
}

impl From<std::io::Error> for ActionError {
    fn from(e: std::io::Error) -> Self {
        ActionError::Io(e)
    }
}

impl From<MazeError> for ActionError {
    fn from(e: MazeError) -> Self {
        ActionError::Maze(e)
    }
}

/// Environment variable holding the log level.
pub const LOG_LEVEL_ENV: &str = "MAZEGRAPH_LOG";

/// Level named by `value` (case-insensitive), `INFO` when unset or unknown.
pub fn log_level(value: Option<&str>) -> tracing::Level {
    value
        .and_then(|v| v.trim().parse::<tracing::Level>().ok())
        .unwrap_or(tracing::Level::INFO)
}

/// Sends `tracing` output to a file under `config.log_dir`, since the terminal belongs to the
/// menus. Logs are flushed until the returned guard is dropped.
pub fn init_logging(config: &ConsoleConfig) -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = tracing_appender::rolling::never(&config.log_dir, &config.log_file);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let level = log_level(std::env::var(LOG_LEVEL_ENV).ok().as_deref());
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    guard
}

/// Width or height typed by the user.
pub fn parse_dimension(s: &str, min: usize, max: usize) -> Result<usize, String> {
    let error_msg = format!("Please enter a number between {} and {}.", min, max);
    s.trim()
        .parse::<usize>()
        .map_err(|_| error_msg.clone())
        .and_then(|n| {
            if (min..=max).contains(&n) {
                Ok(n)
            } else {
                Err(error_msg)
            }
        })
}

/// Optional seed; empty input means "random".
pub fn parse_seed(s: &str) -> Result<Option<u64>, String> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    s.parse::<u64>()
        .map(Some)
        .map_err(|_| "Please enter a non-negative integer, or nothing.".to_string())
}

/// Chaos fraction in `[0, 1]`; empty input takes `default`.
pub fn parse_fraction(s: &str, default: f64) -> Result<f64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(default);
    }
    match s.parse::<f64>() {
        Ok(f) if (0.0..=1.0).contains(&f) => Ok(f),
        _ => Err("Please enter a number between 0 and 1.".to_string()),
    }
}

pub fn parse_file_path(s: &str) -> Result<PathBuf, String> {
    let s = s.trim();
    if s.is_empty() {
        Err("Please enter a file name.".to_string())
    } else {
        Ok(PathBuf::from(s))
    }
}

pub fn save_maze(maze: &GraphMaze, path: &Path) -> crate::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    maze.save(&mut writer)?;
    writer.flush()?;
    tracing::info!("[console] maze saved to {}", path.display());
    Ok(())
}

pub fn load_maze(path: &Path) -> crate::Result<GraphMaze> {
    let maze = GraphMaze::load(BufReader::new(File::open(path)?))?;
    tracing::info!("[console] maze loaded from {}", path.display());
    Ok(maze)
}

pub fn save_log(log: &GenLog, path: &Path) -> crate::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    log.save(&mut writer)?;
    writer.flush()?;
    tracing::info!("[console] generation log saved to {}", path.display());
    Ok(())
}

pub fn load_log(path: &Path) -> crate::Result<GenLog> {
    let log = GenLog::load(BufReader::new(File::open(path)?))?;
    tracing::info!("[console] generation log loaded from {}", path.display());
    Ok(log)
}
