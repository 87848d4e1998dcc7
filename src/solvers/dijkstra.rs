use std::{cmp::Ordering, cmp::Reverse, collections::BinaryHeap};

use super::{Path, Steps, finish_steps};
use crate::error::Result;
use crate::maze::GraphMaze;

/// Frontier entry for best-first search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TrackedVertex {
    vertex: usize,
    /// Cost to reach this vertex from the start
    traveling_cost: usize,
    /// Estimated cost to reach the goal from this vertex (zero for Dijkstra)
    heuristic_cost: usize,
}

impl TrackedVertex {
    fn total_cost(&self) -> usize {
        self.traveling_cost + self.heuristic_cost
    }
}

impl Ord for TrackedVertex {
    fn cmp(&self, other: &Self) -> Ordering {
        // Closer to the goal first among equal totals, then by id for a stable order
        self.total_cost()
            .cmp(&other.total_cost())
            .then_with(|| self.heuristic_cost.cmp(&other.heuristic_cost))
            .then_with(|| self.vertex.cmp(&other.vertex))
    }
}

impl PartialOrd for TrackedVertex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Best-first search with unit edge costs. With a zero heuristic this is Dijkstra; with an
/// admissible, consistent one it is A*. Either way every vertex is settled once and the
/// returned path is a shortest one.
///
/// `on_settle` sees the sequence of settled vertices each time one is added.
fn best_first(
    maze: &GraphMaze,
    start: usize,
    end: usize,
    heuristic: impl Fn(usize) -> usize,
    mut on_settle: impl FnMut(&[usize]),
) -> Path {
    let n = maze.num_cells();
    let mut costs = vec![usize::MAX; n];
    let mut parents: Vec<Option<usize>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut order = Vec::new();

    // Using Reverse to turn the max-heap into a min-heap
    let mut pq = BinaryHeap::new();
    costs[start] = 0;
    pq.push(Reverse(TrackedVertex {
        vertex: start,
        traveling_cost: 0,
        heuristic_cost: heuristic(start),
    }));

    while let Some(Reverse(current)) = pq.pop() {
        // Stale entry, a cheaper one was already settled
        if settled[current.vertex] {
            continue;
        }
        settled[current.vertex] = true;
        order.push(current.vertex);
        on_settle(&order);

        if current.vertex == end {
            break;
        }

        let new_cost = current.traveling_cost + 1;
        for &neighbor in maze.neighbors_of(current.vertex) {
            if !settled[neighbor] && new_cost < costs[neighbor] {
                costs[neighbor] = new_cost;
                parents[neighbor] = Some(current.vertex);
                pq.push(Reverse(TrackedVertex {
                    vertex: neighbor,
                    traveling_cost: new_cost,
                    heuristic_cost: heuristic(neighbor),
                }));
            }
        }
    }

    tracing::debug!("[solve] settled {} of {} vertices", order.len(), n);

    if !settled[end] {
        return Path::new();
    }
    // Backtrack from the goal through the parents
    let mut path = vec![end];
    let mut child = end;
    while let Some(parent) = parents[child] {
        path.push(parent);
        child = parent;
    }
    path.reverse();
    path
}

pub fn solve_dijkstra(maze: &GraphMaze) -> Result<Path> {
    let (start, end) = maze.endpoints()?;
    Ok(best_first(maze, start, end, |_| 0, |_| {}))
}

/// Settled vertices after each settle, then the shortest path.
pub fn solve_dijkstra_steps(maze: &GraphMaze) -> Result<Steps> {
    let (start, end) = maze.endpoints()?;
    let mut steps = Steps::new();
    let path = best_first(maze, start, end, |_| 0, |s| steps.push(s.to_vec()));
    Ok(finish_steps(steps, &path))
}

/// A* guided by the Manhattan distance to the end, which never overestimates on a grid.
pub fn solve_astar(maze: &GraphMaze) -> Result<Path> {
    let (start, end) = maze.endpoints()?;
    let grid = maze.grid();
    Ok(best_first(
        maze,
        start,
        end,
        |v| grid.manhattan_distance(v, end),
        |_| {},
    ))
}

pub fn solve_astar_steps(maze: &GraphMaze) -> Result<Steps> {
    let (start, end) = maze.endpoints()?;
    let grid = maze.grid();
    let mut steps = Steps::new();
    let path = best_first(
        maze,
        start,
        end,
        |v| grid.manhattan_distance(v, end),
        |s| steps.push(s.to_vec()),
    );
    Ok(finish_steps(steps, &path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{Generator, generate_maze, introduce_chaos};
    use crate::solvers::tests::{assert_valid_path, sample_maze};

    #[test]
    fn test_tracked_vertex_order() {
        let near = TrackedVertex {
            vertex: 9,
            traveling_cost: 4,
            heuristic_cost: 1,
        };
        let far = TrackedVertex {
            vertex: 2,
            traveling_cost: 2,
            heuristic_cost: 3,
        };
        let cheap = TrackedVertex {
            vertex: 5,
            traveling_cost: 1,
            heuristic_cost: 1,
        };
        let mut heap = BinaryHeap::from([Reverse(near), Reverse(far), Reverse(cheap)]);
        assert_eq!(heap.pop().map(|r| r.0.vertex), Some(5));
        assert_eq!(heap.pop().map(|r| r.0.vertex), Some(9));
        assert_eq!(heap.pop().map(|r| r.0.vertex), Some(2));
    }

    #[test]
    fn test_dijkstra_sample_maze() {
        let maze = sample_maze();
        let path = solve_dijkstra(&maze).unwrap();
        assert_valid_path(&maze, &path);
        assert_eq!(path.len(), 7);
    }

    #[test]
    fn test_astar_settles_no_more_than_dijkstra() {
        let mut result = generate_maze(Generator::Prim, 15, 15, Some(6)).unwrap();
        introduce_chaos(&mut result, 0.5, Some(6)).unwrap();
        let maze = &result.maze;

        let dijkstra = solve_dijkstra_steps(maze).unwrap();
        let astar = solve_astar_steps(maze).unwrap();
        let (d_path, a_path) = (dijkstra.last().unwrap(), astar.last().unwrap());
        assert_valid_path(maze, a_path);
        assert_eq!(d_path.len(), a_path.len());
        // One snapshot per settled vertex, plus the final path
        assert!(astar.len() <= dijkstra.len());
    }

    #[test]
    fn test_settle_snapshots_grow() {
        let maze = sample_maze();
        let steps = solve_dijkstra_steps(&maze).unwrap();
        let settles = &steps[..steps.len() - 1];
        for (i, snapshot) in settles.iter().enumerate() {
            assert_eq!(snapshot.len(), i + 1);
        }
        assert_eq!(settles[0], vec![0]);
        assert_eq!(settles.last().unwrap().last(), Some(&15));
    }
}
