use rand::{Rng, seq::SliceRandom};

use crate::error::Result;
use crate::generators::{GenEvent, GenLog, GenResult, finish_run, get_rng, start_run};
use crate::maze::GraphMaze;

/// A vertex being visited, with its shuffled neighbours and how many were already tried.
struct Frame {
    vertex: usize,
    neighbors: Vec<usize>,
    next: usize,
}

/// Marks `vertex` visited and shuffles its neighbours (Fisher-Yates).
fn enter(maze: &GraphMaze, visited: &mut [bool], rng: &mut impl Rng, vertex: usize) -> Frame {
    visited[vertex] = true;
    let mut neighbors = maze.grid().neighbors(vertex).collect::<Vec<_>>();
    neighbors.shuffle(rng);
    Frame {
        vertex,
        neighbors,
        next: 0,
    }
}

/// Generates a perfect maze by a randomized depth-first traversal from vertex 0.
///
/// Each unvisited neighbour, in shuffled order, is connected to the current vertex and
/// visited in turn. The traversal uses an explicit stack of frames, so it yields exactly
/// the events of the recursive formulation without being bounded by the call stack.
pub fn randomized_dfs(width: usize, height: usize, seed: Option<u64>) -> Result<GenResult> {
    let (mut maze, mut log): (GraphMaze, GenLog) = start_run(width, height)?;
    let mut rng = get_rng(seed);
    let mut visited = vec![false; maze.num_cells()];

    let root = enter(&maze, &mut visited, &mut rng, 0);
    let mut stack = vec![root];

    while let Some(frame) = stack.last_mut() {
        let Some(&neighbor) = frame.neighbors.get(frame.next) else {
            // Every neighbour tried, backtrack
            stack.pop();
            continue;
        };
        frame.next += 1;
        let vertex = frame.vertex;

        if !visited[neighbor] {
            log.add_applied(&mut maze, GenEvent::Connect { a: vertex, b: neighbor })?;
            let frame = enter(&maze, &mut visited, &mut rng, neighbor);
            stack.push(frame);
        }
    }

    finish_run(maze, log)
}
