pub mod cell;
pub mod codec;
pub mod grid;

use std::fmt;

pub use cell::{ArrayMaze, Cell, Endpoint};
pub use grid::{Grid, Point};

use crate::error::{MazeError, Result};

/// A rectangular maze stored as an undirected, unweighted graph.
///
/// Each vertex is a cell, identified by `x + y * width`. An edge between two cells means
/// there is no wall between them. Only cells sharing a side may be connected.
///
/// ```text
/// 0  1  2  3
/// 4  5  6  7
/// 8  9  10 11
/// 12 13 14 15
/// ```
///
/// The maze may have a start and an end vertex. Either both are unset, or both are valid
/// and distinct. A path between them is not guaranteed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphMaze {
    grid: Grid,
    start: Option<usize>,
    end: Option<usize>,
    /// Adjacency lists, one per vertex. Symmetric, no duplicates, no self-loops.
    edges: Box<[Vec<usize>]>,
}

impl GraphMaze {
    /// Creates a maze with every wall up and no endpoints.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let num_cells = width
            .checked_mul(height)
            .filter(|&n| n > 0)
            .ok_or(MazeError::InvalidDimensions { width, height })?;
        Ok(GraphMaze {
            grid: Grid::new(width, height),
            start: None,
            end: None,
            edges: vec![Vec::new(); num_cells].into_boxed_slice(),
        })
    }

    /// Rebuilds a maze from raw parts, checking every graph invariant.
    /// Adjacency list order is kept as given.
    pub(crate) fn from_parts(
        width: usize,
        height: usize,
        start: Option<usize>,
        end: Option<usize>,
        edges: Vec<Vec<usize>>,
    ) -> Result<Self> {
        // Checked before allocating, so corrupt dimensions cannot request a huge grid
        let num_cells = width
            .checked_mul(height)
            .ok_or(MazeError::InvalidDimensions { width, height })?;
        if edges.len() != num_cells {
            return Err(MazeError::Serialization(format!(
                "adjacency has {} lists, expected {}",
                edges.len(),
                num_cells
            )));
        }
        let mut maze = GraphMaze::new(width, height)?;
        for (a, adj) in edges.iter().enumerate() {
            for (i, &b) in adj.iter().enumerate() {
                maze.check_vertex(b)?;
                if !maze.grid.are_adjacent(a, b) {
                    return Err(MazeError::IllegalAdjacency { a, b });
                }
                if adj[..i].contains(&b) {
                    return Err(MazeError::Serialization(format!(
                        "duplicate edge {a} -> {b}"
                    )));
                }
                if !edges[b].contains(&a) {
                    return Err(MazeError::Serialization(format!(
                        "edge {a} -> {b} has no reverse edge"
                    )));
                }
            }
        }
        maze.edges = edges.into_boxed_slice();
        maze.set_endpoints(start, end)?;
        Ok(maze)
    }

    /// Adjacency lists in vertex order, as stored.
    pub(crate) fn adjacency(&self) -> &[Vec<usize>] {
        &self.edges
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn num_cells(&self) -> usize {
        self.edges.len()
    }

    /// Coordinate conversions for this maze's dimensions.
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Total number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.edges.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn start(&self) -> Option<usize> {
        self.start
    }

    pub fn end(&self) -> Option<usize> {
        self.end
    }

    pub fn start_point(&self) -> Option<Point> {
        self.start.map(|v| self.to_point(v))
    }

    pub fn end_point(&self) -> Option<Point> {
        self.end.map(|v| self.to_point(v))
    }

    pub fn to_point(&self, vertex: usize) -> Point {
        self.grid.unravel_index(vertex)
    }

    /// Vertex id of a point, `None` when the point lies outside the maze.
    pub fn to_vertex_id(&self, p: Point) -> Option<usize> {
        self.grid.ravel_index(p)
    }

    pub fn is_valid_vertex(&self, vertex: usize) -> bool {
        vertex < self.num_cells()
    }

    pub fn is_valid_pos(&self, p: Point) -> bool {
        self.grid.is_in_bounds(p)
    }

    fn check_vertex(&self, vertex: usize) -> Result<()> {
        if self.is_valid_vertex(vertex) {
            Ok(())
        } else {
            Err(MazeError::InvalidVertex {
                vertex,
                num_cells: self.num_cells(),
            })
        }
    }

    /// True when there is no wall between `a` and `b`.
    /// Never fails: an invalid `a` simply yields `false`, which keeps border checks cheap.
    pub fn is_connected(&self, a: usize, b: usize) -> bool {
        self.edges.get(a).is_some_and(|adj| adj.contains(&b))
    }

    /// Breaks the wall between `a` and `b`. Returns whether the graph changed.
    pub fn connect(&mut self, a: usize, b: usize) -> Result<bool> {
        self.set_connected(a, b, true)
    }

    /// Builds the wall between `a` and `b`. Returns whether the graph changed.
    pub fn disconnect(&mut self, a: usize, b: usize) -> Result<bool> {
        self.set_connected(a, b, false)
    }

    /// Connects or disconnects two neighbouring vertices.
    ///
    /// # Errors
    /// * [`MazeError::InvalidVertex`] if either vertex is out of range
    /// * [`MazeError::IllegalAdjacency`] if the vertices are identical, diagonal or further apart
    pub fn set_connected(&mut self, a: usize, b: usize, connected: bool) -> Result<bool> {
        self.check_vertex(a)?;
        self.check_vertex(b)?;
        if !self.grid.are_adjacent(a, b) {
            return Err(MazeError::IllegalAdjacency { a, b });
        }

        let already = self.edges[a].contains(&b);
        match (connected, already) {
            (true, false) => {
                self.edges[a].push(b);
                self.edges[b].push(a);
                Ok(true)
            }
            (false, true) => {
                self.edges[a].retain(|&v| v != b);
                self.edges[b].retain(|&v| v != a);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Snapshot of the neighbours reachable from `vertex`. Later mutations are not reflected.
    pub fn adjacent_vertices(&self, vertex: usize) -> Result<Vec<usize>> {
        self.check_vertex(vertex)?;
        Ok(self.edges[vertex].clone())
    }

    /// Borrowed view of the neighbours of a valid vertex, for read-only traversals.
    pub(crate) fn neighbors_of(&self, vertex: usize) -> &[usize] {
        &self.edges[vertex]
    }

    /// Sets the start vertex; `None` clears it.
    pub fn set_start(&mut self, start: Option<usize>) -> Result<()> {
        if let Some(v) = start {
            self.check_vertex(v)?;
            if self.end == Some(v) {
                return Err(MazeError::SameEndpoints(v));
            }
        }
        self.start = start;
        Ok(())
    }

    /// Sets the end vertex; `None` clears it.
    pub fn set_end(&mut self, end: Option<usize>) -> Result<()> {
        if let Some(v) = end {
            self.check_vertex(v)?;
            if self.start == Some(v) {
                return Err(MazeError::SameEndpoints(v));
            }
        }
        self.end = end;
        Ok(())
    }

    /// Sets both endpoints at once. Both must be valid and distinct; `(None, None)` clears them.
    pub fn set_endpoints(&mut self, start: Option<usize>, end: Option<usize>) -> Result<()> {
        for v in [start, end].into_iter().flatten() {
            self.check_vertex(v)?;
        }
        if let (Some(s), Some(e)) = (start, end) {
            if s == e {
                return Err(MazeError::SameEndpoints(s));
            }
        }
        self.start = start;
        self.end = end;
        Ok(())
    }

    /// Both endpoints, or [`MazeError::MissingEndpoints`] when either is unset.
    pub fn endpoints(&self) -> Result<(usize, usize)> {
        match (self.start, self.end) {
            (Some(s), Some(e)) => Ok((s, e)),
            _ => Err(MazeError::MissingEndpoints),
        }
    }

    /// Projects the graph onto a grid of cells with walls.
    ///
    /// A side has a wall iff there is no edge to the cell on that side. Start/end cells open
    /// the border sides they touch so they can be entered from outside, unless `hide_endpoints`.
    pub fn to_array_maze(&self, hide_endpoints: bool) -> ArrayMaze {
        let cells = (0..self.num_cells())
            .map(|vertex| {
                let pos = self.to_point(vertex);
                let endpoint = if hide_endpoints {
                    Endpoint::None
                } else if self.start == Some(vertex) {
                    Endpoint::Start
                } else if self.end == Some(vertex) {
                    Endpoint::End
                } else {
                    Endpoint::None
                };
                let open_border = endpoint != Endpoint::None;

                // Neighbours outside the maze have no vertex id, so they always count as a wall
                let wall = |dx: i32, dy: i32| match self.to_vertex_id(pos.offset(dx, dy)) {
                    Some(other) => !self.is_connected(vertex, other),
                    None => !open_border,
                };

                Cell {
                    pos,
                    wall_left: wall(-1, 0),
                    wall_right: wall(1, 0),
                    wall_up: wall(0, -1),
                    wall_down: wall(0, 1),
                    endpoint,
                }
            })
            .collect();
        ArrayMaze::new(self.grid, cells)
    }

    /// Iterates over every undirected edge once, as `(lower, higher)` pairs.
    pub fn edge_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges.iter().enumerate().flat_map(|(a, adj)| {
            adj.iter()
                .copied()
                .filter(move |&b| a < b)
                .map(move |b| (a, b))
        })
    }

    /// Vertices reachable from `from`, including itself.
    pub fn reachable_from(&self, from: usize) -> Result<Vec<bool>> {
        self.check_vertex(from)?;
        let mut seen = vec![false; self.num_cells()];
        let mut stack = vec![from];
        seen[from] = true;
        while let Some(v) = stack.pop() {
            for &n in &self.edges[v] {
                if !seen[n] {
                    seen[n] = true;
                    stack.push(n);
                }
            }
        }
        Ok(seen)
    }

    /// True when every vertex can be reached from vertex 0.
    pub fn is_fully_connected(&self) -> bool {
        self.reachable_from(0)
            .is_ok_and(|seen| seen.into_iter().all(|s| s))
    }

    /// A perfect maze is a spanning tree: connected with exactly `num_cells - 1` edges.
    pub fn is_perfect(&self) -> bool {
        self.num_edges() == self.num_cells() - 1 && self.is_fully_connected()
    }
}

impl fmt::Display for GraphMaze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_array_maze(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_maze_is_empty() {
        let maze = GraphMaze::new(4, 3).unwrap();
        assert_eq!(maze.num_cells(), 12);
        assert_eq!(maze.num_edges(), 0);
        assert_eq!(maze.start(), None);
        assert_eq!(maze.end(), None);
        assert!(!maze.is_fully_connected());
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            GraphMaze::new(0, 5),
            Err(MazeError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            GraphMaze::new(usize::MAX, 2),
            Err(MazeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_connect_is_idempotent_and_symmetric() {
        let mut maze = GraphMaze::new(3, 3).unwrap();
        assert!(maze.connect(0, 1).unwrap());
        assert!(!maze.connect(1, 0).unwrap());
        assert!(maze.is_connected(0, 1));
        assert!(maze.is_connected(1, 0));
        assert_eq!(maze.num_edges(), 1);

        assert!(maze.disconnect(1, 0).unwrap());
        assert!(!maze.disconnect(0, 1).unwrap());
        assert!(!maze.is_connected(0, 1));
        assert_eq!(maze.num_edges(), 0);
    }

    #[test]
    fn test_connect_rejects_bad_vertices() {
        let mut maze = GraphMaze::new(3, 3).unwrap();
        assert!(matches!(
            maze.connect(0, 9),
            Err(MazeError::InvalidVertex { vertex: 9, .. })
        ));
        assert!(matches!(
            maze.connect(4, 4),
            Err(MazeError::IllegalAdjacency { .. })
        ));
        assert!(matches!(
            maze.connect(0, 2),
            Err(MazeError::IllegalAdjacency { .. })
        ));
        // Diagonals are rejected
        assert!(matches!(
            maze.connect(0, 4),
            Err(MazeError::IllegalAdjacency { .. })
        ));
        // Last cell of a row is not adjacent to the first cell of the next row
        assert!(matches!(
            maze.connect(2, 3),
            Err(MazeError::IllegalAdjacency { .. })
        ));
        assert_eq!(maze.num_edges(), 0);
    }

    #[test]
    fn test_is_connected_never_fails() {
        let maze = GraphMaze::new(2, 2).unwrap();
        assert!(!maze.is_connected(100, 0));
        assert!(!maze.is_connected(0, 100));
    }

    #[test]
    fn test_adjacent_vertices_is_a_snapshot() {
        let mut maze = GraphMaze::new(3, 3).unwrap();
        maze.connect(4, 1).unwrap();
        maze.connect(4, 5).unwrap();
        let snapshot = maze.adjacent_vertices(4).unwrap();
        maze.disconnect(4, 1).unwrap();
        maze.connect(4, 7).unwrap();
        assert_eq!(snapshot, vec![1, 5]);
        assert_eq!(maze.adjacent_vertices(4).unwrap(), vec![5, 7]);
        assert!(maze.adjacent_vertices(9).is_err());
    }

    #[test]
    fn test_endpoints() {
        let mut maze = GraphMaze::new(3, 3).unwrap();
        maze.set_start(Some(0)).unwrap();
        assert!(matches!(
            maze.set_end(Some(0)),
            Err(MazeError::SameEndpoints(0))
        ));
        assert!(maze.set_end(Some(9)).is_err());
        maze.set_end(Some(8)).unwrap();
        assert_eq!(maze.endpoints().unwrap(), (0, 8));
        assert_eq!(maze.end_point(), Some(Point::new(2, 2)));

        maze.set_start(None).unwrap();
        assert!(matches!(maze.endpoints(), Err(MazeError::MissingEndpoints)));

        assert!(maze.set_endpoints(Some(3), Some(3)).is_err());
        maze.set_endpoints(Some(3), Some(5)).unwrap();
        assert_eq!(maze.endpoints().unwrap(), (3, 5));
        maze.set_endpoints(None, None).unwrap();
        assert_eq!(maze.start(), None);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut maze = GraphMaze::new(3, 3).unwrap();
        maze.connect(0, 1).unwrap();
        let mut copy = maze.clone();
        copy.connect(1, 2).unwrap();
        copy.disconnect(0, 1).unwrap();
        assert!(maze.is_connected(0, 1));
        assert!(!maze.is_connected(1, 2));
        assert_eq!(maze.num_edges(), 1);
    }

    #[test]
    fn test_to_array_maze_walls() {
        let mut maze = GraphMaze::new(2, 2).unwrap();
        maze.connect(0, 1).unwrap();
        maze.connect(1, 3).unwrap();
        maze.set_endpoints(Some(0), Some(3)).unwrap();

        let array = maze.to_array_maze(false);
        let top_left = array.cell(Point::new(0, 0));
        assert!(!top_left.wall_right);
        assert!(top_left.wall_down);
        // Start cell on the border opens its outer walls
        assert!(!top_left.wall_left);
        assert!(!top_left.wall_up);
        assert_eq!(top_left.endpoint, Endpoint::Start);

        let bottom_left = array.cell(Point::new(0, 1));
        assert!(bottom_left.wall_left && bottom_left.wall_up && bottom_left.wall_right);
        assert_eq!(bottom_left.endpoint, Endpoint::None);

        let hidden = maze.to_array_maze(true);
        let top_left = hidden.cell(Point::new(0, 0));
        assert!(top_left.wall_left && top_left.wall_up);
        assert_eq!(top_left.endpoint, Endpoint::None);
    }

    #[test]
    fn test_perfectness() {
        let mut maze = GraphMaze::new(2, 2).unwrap();
        maze.connect(0, 1).unwrap();
        maze.connect(1, 3).unwrap();
        assert!(!maze.is_perfect());
        maze.connect(3, 2).unwrap();
        assert!(maze.is_perfect());
        maze.connect(2, 0).unwrap();
        assert!(!maze.is_perfect());
        assert_eq!(maze.edge_pairs().count(), 4);
    }
}
