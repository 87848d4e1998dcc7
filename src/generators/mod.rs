use rand::{SeedableRng, rngs::StdRng};

mod chaos;
mod dfs;
pub mod log;
mod prim;

pub use chaos::introduce_chaos;
pub use dfs::randomized_dfs;
pub use log::{GenEvent, GenLog, GenResult, MAX_CELLS};
pub use prim::randomized_prim;

use crate::error::Result;
use crate::maze::GraphMaze;

/// Get a random number generator, optionally seeded for reproducibility.
fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Opens the run: an all-walls maze and an empty log of the same size.
fn start_run(width: usize, height: usize) -> Result<(GraphMaze, GenLog)> {
    Ok((GraphMaze::new(width, height)?, GenLog::new(width, height)?))
}

/// Closes the run by placing the endpoints at opposite corners. A 1x1 maze has no endpoints.
fn finish_run(mut maze: GraphMaze, mut log: GenLog) -> Result<GenResult> {
    let last = maze.num_cells() - 1;
    if last > 0 {
        log.add_applied(
            &mut maze,
            GenEvent::SetEndpoints {
                start: Some(0),
                end: Some(last),
            },
        )?;
    }
    Ok(GenResult { maze, log })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    Dfs,
    Prim,
}

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generator::Dfs => write!(f, "Randomized Depth-First Search (DFS)"),
            Generator::Prim => write!(f, "Prim's Algorithm"),
        }
    }
}

/// Generates a perfect maze with the chosen algorithm.
/// The same `(width, height, seed)` always yields the same maze and log.
pub fn generate_maze(
    generator: Generator,
    width: usize,
    height: usize,
    seed: Option<u64>,
) -> Result<GenResult> {
    tracing::debug!("[generate] {} on {}x{} (seed {:?})", generator, width, height, seed);
    let result = match generator {
        Generator::Dfs => randomized_dfs(width, height, seed),
        Generator::Prim => randomized_prim(width, height, seed),
    }?;
    tracing::info!(
        "[generate] {} finished: {} edges, {} events",
        generator,
        result.maze.num_edges(),
        result.log.len()
    );
    Ok(result)
}
