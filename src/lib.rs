pub mod console;
pub mod error;
pub mod generators;
pub mod maze;
pub mod solvers;

pub use error::{MazeError, Result};
pub use generators::{GenEvent, GenLog, GenResult, Generator, generate_maze, introduce_chaos};
pub use maze::{ArrayMaze, GraphMaze, Grid, Point};
pub use solvers::{Path, Solver, Steps, solve_maze, solve_maze_steps};
