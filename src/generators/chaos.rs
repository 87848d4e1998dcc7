use rand::seq::SliceRandom;

use crate::error::Result;
use crate::generators::{GenEvent, GenResult, get_rng};

/// Turns a generated maze into an imperfect one by breaking extra walls, creating cycles.
///
/// Candidates are every pair of neighbouring cells still separated by a wall. The fraction is
/// clamped to `[0, 1]` (NaN counts as 0) and `ceil(fraction * candidates)` of them, chosen
/// uniformly at random, are connected. Each broken wall is appended to the log as a
/// [`GenEvent::Connect`].
///
/// No edge is ever removed, so every vertex reachable before stays reachable. With the same
/// seed, the walls broken at a lower fraction are a subset of those broken at a higher one.
///
/// Returns the number of walls broken.
pub fn introduce_chaos(result: &mut GenResult, fraction: f64, seed: Option<u64>) -> Result<usize> {
    let GenResult { maze, log } = result;
    let mut rng = get_rng(seed);

    let grid = maze.grid();
    let mut walls = (0..maze.num_cells())
        .flat_map(|a| {
            let p = grid.unravel_index(a);
            [p.offset(1, 0), p.offset(0, 1)]
                .into_iter()
                .filter_map(move |q| grid.ravel_index(q))
                .map(move |b| (a, b))
        })
        .filter(|&(a, b)| !maze.is_connected(a, b))
        .collect::<Vec<_>>();

    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    let count = ((fraction * walls.len() as f64).ceil() as usize).min(walls.len());

    walls.shuffle(&mut rng);
    for &(a, b) in &walls[..count] {
        log.add_applied(maze, GenEvent::Connect { a, b })?;
    }

    tracing::info!(
        "[chaos] broke {} of {} remaining walls (fraction {:.2})",
        count,
        walls.len(),
        fraction
    );
    Ok(count)
}
