use super::{Path, Steps, finish_steps};
use crate::error::Result;
use crate::maze::GraphMaze;

/// Which wall the walker keeps a hand on, as the order in which directions are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hand {
    /// Up, right, down, left.
    Left,
    /// Left, down, right, up.
    Clockwise,
}

impl Hand {
    /// `(dx, dy)` offsets in priority order.
    fn directions(self) -> [(i32, i32); 4] {
        match self {
            Hand::Left => [(0, -1), (1, 0), (0, 1), (-1, 0)],
            Hand::Clockwise => [(-1, 0), (0, 1), (1, 0), (0, -1)],
        }
    }
}

/// Walks from start keeping a path stack. Moves to the first open neighbour in `hand` order
/// that is neither on the path nor a known dead end; when there is none, the current vertex
/// is marked as a dead end and the walker steps back.
///
/// Each vertex is entered at most once, so the walk ends after at most `2 * num_cells`
/// moves. The result is a simple path, not necessarily the shortest.
fn walk(
    maze: &GraphMaze,
    start: usize,
    end: usize,
    hand: Hand,
    mut on_move: impl FnMut(&[usize]),
) -> Path {
    let mut on_path = vec![false; maze.num_cells()];
    let mut blocked = vec![false; maze.num_cells()];
    let mut path = vec![start];
    on_path[start] = true;
    on_move(&path);

    while let Some(&vertex) = path.last() {
        if vertex == end {
            return path;
        }

        let pos = maze.to_point(vertex);
        let next = hand
            .directions()
            .into_iter()
            .filter_map(|(dx, dy)| maze.to_vertex_id(pos.offset(dx, dy)))
            .find(|&n| maze.is_connected(vertex, n) && !on_path[n] && !blocked[n]);

        match next {
            Some(n) => {
                on_path[n] = true;
                path.push(n);
            }
            None => {
                blocked[vertex] = true;
                on_path[vertex] = false;
                path.pop();
            }
        }
        on_move(&path);
    }

    tracing::debug!("[solve] wall follower backtracked past the start");
    path
}

fn solve(maze: &GraphMaze, hand: Hand) -> Result<Path> {
    let (start, end) = maze.endpoints()?;
    Ok(walk(maze, start, end, hand, |_| {}))
}

fn solve_steps(maze: &GraphMaze, hand: Hand) -> Result<Steps> {
    let (start, end) = maze.endpoints()?;
    let mut steps = Steps::new();
    let path = walk(maze, start, end, hand, |p| steps.push(p.to_vec()));
    Ok(finish_steps(steps, &path))
}

/// Left-hand rule: a route from start to end, found by following walls.
pub fn solve_left_hand(maze: &GraphMaze) -> Result<Path> {
    solve(maze, Hand::Left)
}

pub fn solve_left_hand_steps(maze: &GraphMaze) -> Result<Steps> {
    solve_steps(maze, Hand::Left)
}

/// Same walk as [`solve_left_hand`] with the mirrored turn preference.
pub fn solve_clockwise(maze: &GraphMaze) -> Result<Path> {
    solve(maze, Hand::Clockwise)
}

pub fn solve_clockwise_steps(maze: &GraphMaze) -> Result<Steps> {
    solve_steps(maze, Hand::Clockwise)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::tests::{assert_valid_path, sample_maze};

    #[test]
    fn test_left_hand_sample_maze() {
        let maze = sample_maze();
        // Up and right first: along the top row, back through the middle row, then down
        let path = solve_left_hand(&maze).unwrap();
        assert_eq!(path, vec![0, 1, 2, 3, 7, 6, 5, 9, 10, 11, 15]);
    }

    #[test]
    fn test_clockwise_sample_maze() {
        let maze = sample_maze();
        // Left and down first: down the left column, across the third row, then down
        let path = solve_clockwise(&maze).unwrap();
        assert_eq!(path, vec![0, 4, 8, 9, 10, 14, 15]);
    }

    #[test]
    fn test_backtracks_out_of_dead_ends() {
        let maze = sample_maze();
        let steps = solve_clockwise_steps(&maze).unwrap();
        // 12 and 13 are dead ends tried before the exit is found
        assert!(steps.contains(&vec![0, 4, 8, 12]));
        assert!(steps.contains(&vec![0, 4, 8, 9, 13]));
        assert_eq!(steps.first(), Some(&vec![0]));
        assert_valid_path(&maze, steps.last().unwrap());
    }

    #[test]
    fn test_hands_are_mirrored() {
        let left = Hand::Left.directions();
        let mut clockwise = Hand::Clockwise.directions();
        clockwise.reverse();
        assert_eq!(left, clockwise);
    }
}
