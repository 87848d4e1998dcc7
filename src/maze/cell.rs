use std::fmt;

use crate::maze::grid::{Grid, Point};

/// Role of a cell in the maze.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    #[default]
    None,
    Start,
    End,
}

/// A cell of an [`ArrayMaze`], describing the walls on each of its sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub pos: Point,
    pub wall_left: bool,
    pub wall_right: bool,
    pub wall_up: bool,
    pub wall_down: bool,
    pub endpoint: Endpoint,
}

/// Read-only wall view of a maze, produced by [`GraphMaze::to_array_maze`](super::GraphMaze::to_array_maze).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayMaze {
    grid: Grid,
    /// Cells in row-major order, indexed by vertex id.
    cells: Box<[Cell]>,
}

impl ArrayMaze {
    pub(crate) fn new(grid: Grid, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), grid.num_cells());
        ArrayMaze {
            grid,
            cells: cells.into_boxed_slice(),
        }
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Get the cell at the given position.
    ///
    /// # Panics
    /// If the position is outside the maze.
    pub fn cell(&self, pos: Point) -> &Cell {
        match self.grid.ravel_index(pos) {
            Some(idx) => &self.cells[idx],
            None => panic!("position {pos} is outside the {}x{} maze", self.width(), self.height()),
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Side length of the square block each cell is drawn in, large enough to hold its id.
    fn block_size(&self) -> usize {
        let digits = self.num_cells().to_string().len();
        ((digits | 1) + 2).max(5)
    }

    /// ASCII rendering with the cells of `path` marked by `*`.
    ///
    /// Each cell is a square block with its zero-padded vertex id in the middle row,
    /// `-` and `|` for walls and `#` for corners. `S` and `E` mark the start and end cells.
    /// Rows and columns shared by two neighbouring blocks are drawn once.
    pub fn render(&self, path: &[usize]) -> String {
        let size = self.block_size();
        let (width, height) = (self.width(), self.height());
        let mut pixels = vec![vec![' '; width * size]; height * size];
        let num_cells = self.num_cells();
        let mut on_path = vec![false; num_cells];
        for &id in path.iter().filter(|&&id| id < num_cells) {
            on_path[id] = true;
        }

        for (id, cell) in self.cells.iter().enumerate() {
            let px0 = cell.pos.x as usize * size;
            let py0 = cell.pos.y as usize * size;

            let label = format!("{:0pad$}", id, pad = size - 2);
            for (i, c) in label.chars().enumerate() {
                pixels[py0 + size / 2][px0 + 1 + i] = c;
            }

            match cell.endpoint {
                Endpoint::Start => pixels[py0 + 1][px0 + 1] = 'S',
                Endpoint::End => pixels[py0 + 1][px0 + 1] = 'E',
                Endpoint::None => {}
            }
            if on_path[id] {
                pixels[py0 + size - 2][px0 + size / 2] = '*';
            }

            for i in 0..size {
                if cell.wall_up {
                    pixels[py0][px0 + i] = '-';
                }
                if cell.wall_down {
                    pixels[py0 + size - 1][px0 + i] = '-';
                }
                if cell.wall_left {
                    pixels[py0 + i][px0] = '|';
                }
                if cell.wall_right {
                    pixels[py0 + i][px0 + size - 1] = '|';
                }
            }

            for (cy, cx) in [(0, 0), (0, size - 1), (size - 1, 0), (size - 1, size - 1)] {
                pixels[py0 + cy][px0 + cx] = '#';
            }
        }

        let is_shared = |p: usize, len: usize| p != 0 && p != len - 1 && p % size == 0;
        let mut out = String::with_capacity(width * height * size * size + height * size);
        for (py, row) in pixels.iter().enumerate() {
            if is_shared(py, height * size) {
                continue;
            }
            out.extend(
                row.iter()
                    .enumerate()
                    .filter(|&(px, _)| !is_shared(px, width * size))
                    .map(|(_, &c)| c),
            );
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for ArrayMaze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&[]))
    }
}
