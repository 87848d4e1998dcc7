use super::{Path, Steps, finish_steps};
use crate::error::Result;
use crate::maze::GraphMaze;

/// Exhaustive backtracking search over every simple path from start to end.
///
/// Neighbours are tried in adjacency order, and a path replaces the best one only when it
/// is strictly shorter, so ties go to the first path found. Branches that cannot beat the
/// best path even in a straight line are cut, which keeps the result exact.
///
/// `on_enter` sees the current path each time a vertex is entered.
fn search(
    maze: &GraphMaze,
    start: usize,
    end: usize,
    mut on_enter: impl FnMut(&[usize]),
) -> Path {
    let grid = maze.grid();
    let mut on_path = vec![false; maze.num_cells()];
    let mut best = Path::new();

    // Parallel stacks: the path, and for each vertex on it the next neighbour to try
    let mut path = vec![start];
    let mut next = vec![0];
    on_path[start] = true;
    on_enter(&path);

    while let (Some(&vertex), Some(tried)) = (path.last(), next.last_mut()) {
        let neighbors = maze.neighbors_of(vertex);
        let hopeless = !best.is_empty()
            && path.len() + grid.manhattan_distance(vertex, end) >= best.len();

        if vertex == end || hopeless || *tried >= neighbors.len() {
            on_path[vertex] = false;
            path.pop();
            next.pop();
            continue;
        }

        let neighbor = neighbors[*tried];
        *tried += 1;
        if on_path[neighbor] {
            continue;
        }

        on_path[neighbor] = true;
        path.push(neighbor);
        next.push(0);
        on_enter(&path);

        if neighbor == end && (best.is_empty() || path.len() < best.len()) {
            best.clone_from(&path);
        }
    }

    best
}

/// Shortest path by exhaustive depth-first search.
///
/// Exact, but exponential on mazes with many cycles.
pub fn solve_dfs(maze: &GraphMaze) -> Result<Path> {
    let (start, end) = maze.endpoints()?;
    Ok(search(maze, start, end, |_| {}))
}

/// Every path explored by [`solve_dfs`], in order, then the shortest one.
pub fn solve_dfs_steps(maze: &GraphMaze) -> Result<Steps> {
    let (start, end) = maze.endpoints()?;
    let mut steps = Steps::new();
    let path = search(maze, start, end, |p| steps.push(p.to_vec()));
    Ok(finish_steps(steps, &path))
}
