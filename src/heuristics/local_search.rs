//! Local search improvement.
//!
//! First-improvement 2-opt bounded by a wall-clock deadline, run on top of
//! the nearest-neighbor construction.

use crate::deadline::Deadline;
use crate::error::{GraphError, Result};
use crate::graph::{Vertex, Weight, WeightedGraph};
use crate::heuristics::construction::nearest_neighbor_tour;
use crate::solution::Solution;
use crate::solver::TourSolver;
use std::time::{Duration, Instant};

/// Decreases at or below this are float noise from the edge delta, not improvements
const IMPROVEMENT_EPSILON: f64 = 1e-9;

/// Outcome of one 2-opt run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TwoOptStats {
    /// Accepted reversals
    pub moves: usize,
    /// Full scans of the pair enumeration, including the last one
    pub passes: usize,
    /// Stopped on the deadline before reaching a local optimum
    pub timed_out: bool,
}

/// 2-Opt Local Search, first improvement
///
/// Scans pairs `(i, j)` with `1 <= i` and `i + 2 <= j < n`, reverses
/// `tour[i..j]` on the first pair that shortens the tour and restarts the
/// scan. The first vertex and the last vertex never move.
pub struct TwoOptSearch;

impl TwoOptSearch {
    /// Improve `tour` in place until no reversal helps or `deadline` expires.
    /// The tour is only ever replaced by a strictly shorter one.
    pub fn improve<V: Vertex>(
        &self,
        graph: &WeightedGraph<V>,
        tour: &mut Vec<V>,
        deadline: &mut Deadline,
    ) -> TwoOptStats {
        let n = tour.len();
        let mut stats = TwoOptStats::default();
        if n < 4 {
            return stats;
        }

        let dist = graph.distance_matrix(tour);
        let symmetric = !graph.is_directed();
        let mut order: Vec<usize> = (0..n).collect();
        let mut length = cycle_length(&dist, &order);

        'passes: loop {
            if deadline.expired() {
                stats.timed_out = true;
                break;
            }
            stats.passes += 1;

            let mut improved = false;
            'scan: for i in 1..n - 2 {
                for j in (i + 2)..n {
                    if deadline.tick() {
                        stats.timed_out = true;
                        break 'passes;
                    }

                    let (old, new) = reversal_costs(&dist, &order, i, j, symmetric);
                    if new >= old - IMPROVEMENT_EPSILON {
                        continue;
                    }

                    order[i..j].reverse();
                    if length.is_finite() {
                        length += new - old;
                    } else {
                        // a tour with a missing edge only improves once it becomes finite
                        let candidate = cycle_length(&dist, &order);
                        if !candidate.is_finite() {
                            order[i..j].reverse();
                            continue;
                        }
                        length = candidate;
                    }
                    stats.moves += 1;
                    log::trace!("2-opt reversed [{}, {}): length now {}", i, j, length);
                    improved = true;
                    break 'scan;
                }
            }

            if !improved {
                break;
            }
        }

        if stats.moves > 0 {
            let original = std::mem::take(tour);
            *tour = order.iter().map(|&k| original[k].clone()).collect();
        }
        stats
    }
}

/// Cost of the edges a reversal of `order[i..j]` removes and the edges it adds
fn reversal_costs(
    dist: &[Vec<Weight>],
    order: &[usize],
    i: usize,
    j: usize,
    symmetric: bool,
) -> (Weight, Weight) {
    let before = order[i - 1];
    let first = order[i];
    let last = order[j - 1];
    let after = order[j];

    let mut old = dist[before][first] + dist[last][after];
    let mut new = dist[before][last] + dist[first][after];

    // Reversed inner edges change direction; only matters when weights are asymmetric
    if !symmetric {
        for k in i..j - 1 {
            old += dist[order[k]][order[k + 1]];
            new += dist[order[k + 1]][order[k]];
        }
    }

    (old, new)
}

fn cycle_length(dist: &[Vec<Weight>], order: &[usize]) -> Weight {
    (0..order.len())
        .map(|k| dist[order[k]][order[(k + 1) % order.len()]])
        .sum()
}

#[derive(Debug, Clone)]
pub struct ImprovingConfig {
    /// Wall-clock budget measured from the start of `solve`, construction included
    pub time_budget: Duration,
    /// Candidate moves evaluated between two clock reads
    pub check_interval: usize,
}

impl Default for ImprovingConfig {
    fn default() -> Self {
        ImprovingConfig {
            time_budget: Duration::from_millis(1400),
            check_interval: 64,
        }
    }
}

/// Nearest neighbor followed by time-bounded 2-opt, for medium graphs.
///
/// Never returns a tour longer than the plain nearest-neighbor one.
pub struct ImprovingTourSolver {
    pub config: ImprovingConfig,
}

impl ImprovingTourSolver {
    pub fn new() -> Self {
        Self::with_config(ImprovingConfig::default())
    }

    pub fn with_config(config: ImprovingConfig) -> Self {
        ImprovingTourSolver { config }
    }
}

impl Default for ImprovingTourSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Vertex> TourSolver<V> for ImprovingTourSolver {
    fn solve(&self, graph: &WeightedGraph<V>, start: &V) -> Result<Solution<V>> {
        let timer = Instant::now();
        let mut deadline =
            Deadline::starting_at(timer, self.config.time_budget, self.config.check_interval);
        let name = TourSolver::<V>::name(self);
        let n = graph.vertex_count();

        if n == 0 {
            return Ok(Solution::new(name));
        }
        if !graph.contains_vertex(start) {
            return Err(GraphError::missing(start));
        }
        if n == 1 {
            return Ok(Solution::with_cost(vec![start.clone()], 0.0, name));
        }

        let initial = nearest_neighbor_tour(graph, start);
        let initial_cost = graph.tour_length(&initial)?;

        let mut tour = initial.clone();
        let stats = TwoOptSearch.improve(graph, &mut tour, &mut deadline);

        let mut solution = Solution::from_tour(graph, tour, name)?;
        if solution.cost > initial_cost {
            // float drift on an accepted chain of tiny moves
            solution = Solution::with_cost(initial, initial_cost, name);
        }
        solution.iterations = Some(stats.moves);
        solution.timed_out = stats.timed_out;
        solution.computation_time = timer.elapsed().as_secs_f64();

        if stats.timed_out {
            log::info!(
                "{} hit its {:?} budget after {} moves over {} passes",
                name,
                self.config.time_budget,
                stats.moves,
                stats.passes
            );
        }
        log::debug!(
            "{} improved {} -> {} on {} vertices in {:.4}s",
            name,
            initial_cost,
            solution.cost,
            n,
            solution.computation_time
        );
        Ok(solution)
    }

    fn name(&self) -> &str {
        "NearestNeighbor+2-Opt"
    }
}
