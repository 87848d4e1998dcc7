use serde::{Deserialize, Serialize};

/// A 2D position in a maze. `x` grows to the right, `y` grows downwards, origin is top-left.
///
/// Coordinates are signed so that offsets past a border (e.g. `x - 1` on the left column)
/// can be represented and rejected by [`Grid::is_in_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// Returns this point shifted by `(dx, dy)`.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Point {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn manhattan_distance(self, other: Point) -> usize {
        (self.x.abs_diff(other.x) + self.y.abs_diff(other.y)) as usize
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Offsets of the four grid neighbours, in enumeration order: right, left, below, above.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Conversion between [`Point`]s and linear vertex ids (`id = x + y * width`) for a
/// `width x height` rectangle. Pure and `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Grid { width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn num_cells(&self) -> usize {
        self.width * self.height
    }

    pub fn is_in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height
    }

    pub fn is_boundary(&self, p: Point) -> bool {
        self.is_in_bounds(p)
            && (p.x == 0
                || p.y == 0
                || p.x as usize == self.width - 1
                || p.y as usize == self.height - 1)
    }

    /// Vertex id of an in-bounds point, `None` otherwise.
    pub fn ravel_index(&self, p: Point) -> Option<usize> {
        self.is_in_bounds(p)
            .then(|| p.x as usize + p.y as usize * self.width)
    }

    /// Point of a vertex id. The id is not bounds-checked.
    pub fn unravel_index(&self, id: usize) -> Point {
        Point {
            x: (id % self.width) as i32,
            y: (id / self.width) as i32,
        }
    }

    /// Get the in-bounds neighbours of a vertex, one step away in the cardinal directions.
    /// Border vertices yield fewer than four.
    pub fn neighbors(&self, id: usize) -> impl Iterator<Item = usize> + '_ {
        let p = self.unravel_index(id);
        NEIGHBOR_OFFSETS
            .into_iter()
            .filter_map(move |(dx, dy)| self.ravel_index(p.offset(dx, dy)))
    }

    /// True when `a` and `b` are distinct cells sharing a side.
    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        self.unravel_index(a)
            .manhattan_distance(self.unravel_index(b))
            == 1
    }

    pub fn manhattan_distance(&self, a: usize, b: usize) -> usize {
        self.unravel_index(a)
            .manhattan_distance(self.unravel_index(b))
    }
}
