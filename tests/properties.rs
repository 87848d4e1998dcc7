use mazegraph::{
    GenEvent, GenLog, Generator, GraphMaze, Solver, generate_maze, introduce_chaos, solve_maze,
    solve_maze_steps,
};
use proptest::prelude::*;

fn any_generator() -> impl Strategy<Value = Generator> {
    prop_oneof![Just(Generator::Dfs), Just(Generator::Prim)]
}

fn any_solver() -> impl Strategy<Value = Solver> {
    prop_oneof![
        Just(Solver::Dfs),
        Just(Solver::LeftHand),
        Just(Solver::Clockwise),
        Just(Solver::Dijkstra),
        Just(Solver::AStar),
    ]
}

fn assert_path_is_valid(maze: &GraphMaze, path: &[usize]) -> Result<(), TestCaseError> {
    let (start, end) = maze.endpoints().unwrap();
    prop_assert_eq!(path.first(), Some(&start));
    prop_assert_eq!(path.last(), Some(&end));
    for pair in path.windows(2) {
        prop_assert!(maze.is_connected(pair[0], pair[1]));
    }
    Ok(())
}

proptest! {
    #[test]
    fn generated_mazes_are_perfect(
        generator in any_generator(),
        width in 1usize..20,
        height in 1usize..20,
        seed in any::<u64>(),
    ) {
        let result = generate_maze(generator, width, height, Some(seed)).unwrap();
        prop_assert_eq!(result.maze.num_edges(), width * height - 1);
        prop_assert!(result.maze.is_perfect());
    }

    #[test]
    fn generation_is_deterministic(
        generator in any_generator(),
        width in 2usize..15,
        height in 2usize..15,
        seed in any::<u64>(),
    ) {
        let a = generate_maze(generator, width, height, Some(seed)).unwrap();
        let b = generate_maze(generator, width, height, Some(seed)).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn replay_rebuilds_every_state(
        generator in any_generator(),
        width in 2usize..12,
        height in 2usize..12,
        seed in any::<u64>(),
        chaos in 0.0f64..=1.0,
    ) {
        let mut result = generate_maze(generator, width, height, Some(seed)).unwrap();
        introduce_chaos(&mut result, chaos, Some(seed)).unwrap();
        let log = &result.log;

        let empty = log.build_maze_until(0).unwrap();
        prop_assert_eq!(empty.num_edges(), 0);
        prop_assert_eq!(log.build_maze().unwrap(), result.maze.clone());

        // Each prefix differs from the previous one by exactly its last event
        let mut live = GraphMaze::new(width, height).unwrap();
        for (i, event) in log.iter().enumerate() {
            prop_assert_eq!(&log.build_maze_until(i).unwrap(), &live);
            GenLog::apply_event(&mut live, event).unwrap();
        }
        prop_assert!(log.build_maze_until(log.len() + 1).is_err());
    }

    #[test]
    fn chaos_keeps_connectivity(
        generator in any_generator(),
        width in 2usize..15,
        height in 2usize..15,
        seed in any::<u64>(),
        chaos in 0.0f64..=1.0,
    ) {
        let mut result = generate_maze(generator, width, height, Some(seed)).unwrap();
        let before = result.maze.clone();
        let events_before = result.log.len();
        let broken = introduce_chaos(&mut result, chaos, Some(seed)).unwrap();

        prop_assert!(result.maze.is_fully_connected());
        prop_assert_eq!(result.maze.num_edges(), before.num_edges() + broken);
        for (a, b) in before.edge_pairs() {
            prop_assert!(result.maze.is_connected(a, b));
        }
        for event in &result.log.events()[events_before..] {
            let is_connect = matches!(event, GenEvent::Connect { .. });
            prop_assert!(is_connect);
        }
    }

    #[test]
    fn snapshots_round_trip(
        generator in any_generator(),
        width in 1usize..15,
        height in 1usize..15,
        seed in any::<u64>(),
        chaos in 0.0f64..=0.5,
    ) {
        let mut result = generate_maze(generator, width, height, Some(seed)).unwrap();
        introduce_chaos(&mut result, chaos, Some(seed)).unwrap();

        let bytes = result.maze.to_bytes().unwrap();
        prop_assert_eq!(GraphMaze::from_bytes(&bytes).unwrap(), result.maze.clone());

        let mut buf = Vec::new();
        result.log.save(&mut buf).unwrap();
        prop_assert_eq!(GenLog::load(buf.as_slice()).unwrap(), result.log);
    }

    #[test]
    fn truncated_snapshots_are_rejected(
        width in 1usize..8,
        height in 1usize..8,
        seed in any::<u64>(),
        cut in any::<prop::sample::Index>(),
    ) {
        let result = generate_maze(Generator::Dfs, width, height, Some(seed)).unwrap();
        let bytes = result.maze.to_bytes().unwrap();
        let cut = cut.index(bytes.len());
        prop_assert!(GraphMaze::from_bytes(&bytes[..cut]).is_err());
    }
}

proptest! {
    // Exhaustive DFS is exponential on cyclic mazes, so keep these small
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn shortest_solvers_agree(
        generator in any_generator(),
        width in 2usize..7,
        height in 2usize..7,
        seed in any::<u64>(),
        chaos in 0.0f64..=0.3,
    ) {
        let mut result = generate_maze(generator, width, height, Some(seed)).unwrap();
        introduce_chaos(&mut result, chaos, Some(seed)).unwrap();
        let maze = &result.maze;

        let dijkstra = solve_maze(maze, Solver::Dijkstra).unwrap();
        let astar = solve_maze(maze, Solver::AStar).unwrap();
        let dfs = solve_maze(maze, Solver::Dfs).unwrap();
        assert_path_is_valid(maze, &dijkstra)?;
        assert_path_is_valid(maze, &astar)?;
        assert_path_is_valid(maze, &dfs)?;
        prop_assert_eq!(dijkstra.len(), astar.len());
        prop_assert_eq!(dijkstra.len(), dfs.len());

        // Any route is at least as long as the Manhattan distance between the corners
        prop_assert!(dijkstra.len() > (width - 1) + (height - 1));
    }

    #[test]
    fn every_solver_finds_a_route(
        generator in any_generator(),
        solver in any_solver(),
        width in 2usize..7,
        height in 2usize..7,
        seed in any::<u64>(),
        chaos in 0.0f64..=0.3,
    ) {
        let mut result = generate_maze(generator, width, height, Some(seed)).unwrap();
        introduce_chaos(&mut result, chaos, Some(seed)).unwrap();
        let maze = &result.maze;

        let path = solve_maze(maze, solver).unwrap();
        assert_path_is_valid(maze, &path)?;
        let steps = solve_maze_steps(maze, solver).unwrap();
        prop_assert_eq!(steps.last(), Some(&path));
    }

    #[test]
    fn isolated_start_has_no_path(
        generator in any_generator(),
        solver in any_solver(),
        width in 2usize..7,
        height in 2usize..7,
        seed in any::<u64>(),
    ) {
        let mut result = generate_maze(generator, width, height, Some(seed)).unwrap();
        let maze = &mut result.maze;
        let (start, _) = maze.endpoints().unwrap();
        for n in maze.adjacent_vertices(start).unwrap() {
            maze.disconnect(start, n).unwrap();
        }
        prop_assert!(solve_maze(maze, solver).unwrap().is_empty());
        let steps = solve_maze_steps(maze, solver).unwrap();
        prop_assert_eq!(steps.last(), Some(&Vec::new()));
    }
}
