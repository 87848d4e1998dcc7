use std::time::Instant;

use mazegraph::{
    Generator, Solver,
    console::{ConsoleConfig, init_logging},
    generate_maze, introduce_chaos, solve_maze,
};

/// Solvers that stay fast on large imperfect mazes. Exhaustive DFS does not.
const SOLVERS: [Solver; 4] = [
    Solver::LeftHand,
    Solver::Clockwise,
    Solver::Dijkstra,
    Solver::AStar,
];

fn main() -> mazegraph::Result<()> {
    let config = ConsoleConfig {
        log_file: "profile.log".to_string(),
        ..ConsoleConfig::default()
    };
    let _guard = init_logging(&config);

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(1);
    let size = args.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(255);

    for iter in 0..num_iters {
        let seed = Some(iter as u64);
        for generator in [Generator::Dfs, Generator::Prim] {
            let started = Instant::now();
            let mut result = generate_maze(generator, size, size, seed)?;
            introduce_chaos(&mut result, 0.1, seed)?;
            tracing::info!(
                "[profile] {} {}x{}: generated in {:?}",
                generator,
                size,
                size,
                started.elapsed()
            );

            let started = Instant::now();
            result.log.build_maze()?;
            tracing::info!(
                "[profile] replayed {} events in {:?}",
                result.log.len(),
                started.elapsed()
            );

            for solver in SOLVERS {
                let started = Instant::now();
                let path = solve_maze(&result.maze, solver)?;
                tracing::info!(
                    "[profile] {}: {} cells in {:?}",
                    solver,
                    path.len(),
                    started.elapsed()
                );
            }
        }
    }
    Ok(())
}
