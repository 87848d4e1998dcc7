mod dfs;
mod dijkstra;
mod wall_follower;

pub use dfs::{solve_dfs, solve_dfs_steps};
pub use dijkstra::{solve_astar, solve_astar_steps, solve_dijkstra, solve_dijkstra_steps};
pub use wall_follower::{
    Hand, solve_clockwise, solve_clockwise_steps, solve_left_hand, solve_left_hand_steps,
};

use crate::error::Result;
use crate::maze::GraphMaze;

/// Vertex ids from start to end, inclusive. Empty when the end cannot be reached.
pub type Path = Vec<usize>;

/// Intermediate states observed while solving. The last element is the final [`Path`].
pub type Steps = Vec<Path>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solver {
    Dfs,
    LeftHand,
    Clockwise,
    Dijkstra,
    AStar,
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::Dfs => write!(f, "Exhaustive Depth-First Search (DFS)"),
            Solver::LeftHand => write!(f, "Left-Hand Wall Follower"),
            Solver::Clockwise => write!(f, "Clockwise Wall Follower"),
            Solver::Dijkstra => write!(f, "Dijkstra's Algorithm"),
            Solver::AStar => write!(f, "A* Search"),
        }
    }
}

/// Closes a step sequence with the final path, unless it is already the last snapshot.
fn finish_steps(mut steps: Steps, path: &[usize]) -> Steps {
    if steps.last().map(Vec::as_slice) != Some(path) {
        steps.push(path.to_vec());
    }
    steps
}

/// Finds a path from the maze's start to its end.
///
/// # Errors
/// [`crate::MazeError::MissingEndpoints`] when start or end is unset. An unreachable end is
/// not an error: the returned path is empty.
pub fn solve_maze(maze: &GraphMaze, solver: Solver) -> Result<Path> {
    tracing::debug!("[solve] {} on {}x{}", solver, maze.width(), maze.height());
    let path = match solver {
        Solver::Dfs => solve_dfs(maze),
        Solver::LeftHand => solve_left_hand(maze),
        Solver::Clockwise => solve_clockwise(maze),
        Solver::Dijkstra => solve_dijkstra(maze),
        Solver::AStar => solve_astar(maze),
    }?;
    tracing::info!("[solve] {} found a path of {} vertices", solver, path.len());
    Ok(path)
}

/// Like [`solve_maze`], but returns every intermediate state for playback.
pub fn solve_maze_steps(maze: &GraphMaze, solver: Solver) -> Result<Steps> {
    tracing::debug!("[solve] {} step by step on {}x{}", solver, maze.width(), maze.height());
    let steps = match solver {
        Solver::Dfs => solve_dfs_steps(maze),
        Solver::LeftHand => solve_left_hand_steps(maze),
        Solver::Clockwise => solve_clockwise_steps(maze),
        Solver::Dijkstra => solve_dijkstra_steps(maze),
        Solver::AStar => solve_astar_steps(maze),
    }?;
    tracing::info!(
        "[solve] {} recorded {} steps, final path has {} vertices",
        solver,
        steps.len(),
        steps.last().map_or(0, Vec::len)
    );
    Ok(steps)
}
