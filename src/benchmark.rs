//! Benchmarking module for the tour solvers.
//!
//! Generates random complete graphs, runs every applicable solver tier on
//! them, checks each run against its tier's time contract and aggregates the
//! results.

use crate::error::Result;
use crate::exact::ExactTourSolver;
use crate::graph::{Vertex, WeightedGraph};
use crate::heuristics::construction::GreedyTourSolver;
use crate::heuristics::local_search::{ImprovingConfig, ImprovingTourSolver};
use crate::solution::Solution;
use crate::solver::{SolverTier, TourSolver};

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::time::Duration;

/// Result of running a single solver on a graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmResult {
    /// Algorithm name
    pub algorithm: String,
    /// Tier the solver belongs to
    pub tier: SolverTier,
    /// Instance name
    pub instance: String,
    /// Number of vertices
    pub dimension: usize,
    /// Tour cost
    pub cost: f64,
    /// Computation time in seconds
    pub time: f64,
    /// Tier time contract in seconds
    pub time_limit: f64,
    /// Whether the run finished within the contract
    pub within_time_limit: bool,
    /// Number of improving moves (if applicable)
    pub iterations: Option<usize>,
    /// Whether the solver stopped on its deadline
    pub timed_out: bool,
    /// Gap in percent to the best cost found on this instance
    pub gap_to_best: Option<f64>,
}

/// Aggregated statistics for an algorithm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmStatistics {
    pub algorithm: String,
    pub num_instances: usize,
    pub num_within_time_limit: usize,
    pub avg_cost: f64,
    pub best_cost: f64,
    pub worst_cost: f64,
    pub std_cost: f64,
    pub avg_time: f64,
    pub max_time: f64,
    pub avg_gap: Option<f64>,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Vertex counts of the generated complete graphs
    pub sizes: Vec<usize>,
    /// Graphs generated per size
    pub num_runs: usize,
    /// Base seed, incremented per generated graph
    pub seed: u64,
    /// Edge weights are drawn from `[1, max_weight]`
    pub max_weight: f64,
    /// Budget handed to the improving solver
    pub improving_budget: Duration,
    /// Run instances in parallel (timings then include contention)
    pub parallel: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            sizes: vec![8, 100, 300],
            num_runs: 3,
            seed: 42,
            max_weight: 100.0,
            improving_budget: ImprovingConfig::default().time_budget,
            parallel: false,
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<AlgorithmResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    /// Run every applicable tier on `graph` from `start`
    pub fn run_tiers<V: Vertex>(
        &self,
        instance: &str,
        graph: &WeightedGraph<V>,
        start: &V,
    ) -> Result<Vec<AlgorithmResult>> {
        let n = graph.vertex_count();
        let mut results = Vec::new();

        let exact = ExactTourSolver::new();
        if n <= exact.vertex_limit() {
            let solution = exact.solve(graph, start)?;
            results.push(self.to_result(instance, n, SolverTier::Small, solution));
        }

        let improving = ImprovingTourSolver::with_config(ImprovingConfig {
            time_budget: self.config.improving_budget,
            ..Default::default()
        });
        let solution = improving.solve(graph, start)?;
        results.push(self.to_result(instance, n, SolverTier::Medium, solution));

        let solution = GreedyTourSolver::new().solve(graph, start)?;
        results.push(self.to_result(instance, n, SolverTier::Large, solution));

        let best = results
            .iter()
            .map(|r| r.cost)
            .fold(f64::INFINITY, f64::min);
        if best.is_finite() && best > 0.0 {
            for result in &mut results {
                result.gap_to_best = Some((result.cost - best) / best * 100.0);
            }
        }

        Ok(results)
    }

    /// Run every tier on `graph` and record the results
    pub fn record_tiers<V: Vertex>(
        &mut self,
        instance: &str,
        graph: &WeightedGraph<V>,
        start: &V,
    ) -> Result<()> {
        log::info!("Running benchmark on instance: {}", instance);
        let results = self.run_tiers(instance, graph, start)?;
        self.results.extend(results);
        Ok(())
    }

    /// Generate the configured graphs and benchmark each from vertex 0
    pub fn run_generated(&mut self) -> Result<()> {
        let mut instances = Vec::new();
        let mut seed = self.config.seed;
        for &size in &self.config.sizes {
            for _ in 0..self.config.num_runs {
                let graph = random_complete_graph(size, seed, self.config.max_weight)?;
                instances.push((format!("complete-{}-s{}", size, seed), graph));
                seed += 1;
            }
        }

        let batches: Vec<Result<Vec<AlgorithmResult>>> = if self.config.parallel {
            instances
                .par_iter()
                .map(|(name, graph)| {
                    log::info!("Running benchmark on instance: {}", name);
                    self.run_tiers(name, graph, &0)
                })
                .collect()
        } else {
            instances
                .iter()
                .map(|(name, graph)| {
                    log::info!("Running benchmark on instance: {}", name);
                    self.run_tiers(name, graph, &0)
                })
                .collect()
        };

        for batch in batches {
            self.results.extend(batch?);
        }
        Ok(())
    }

    fn to_result<V: Vertex>(
        &self,
        instance: &str,
        dimension: usize,
        tier: SolverTier,
        solution: Solution<V>,
    ) -> AlgorithmResult {
        let time_limit = tier.time_contract().as_secs_f64();
        AlgorithmResult {
            algorithm: solution.algorithm,
            tier,
            instance: instance.to_string(),
            dimension,
            cost: solution.cost,
            time: solution.computation_time,
            time_limit,
            within_time_limit: solution.computation_time <= time_limit,
            iterations: solution.iterations,
            timed_out: solution.timed_out,
            gap_to_best: None,
        }
    }

    /// Compute statistics for each algorithm
    pub fn compute_statistics(&self) -> Vec<AlgorithmStatistics> {
        let mut stats_map: HashMap<&str, Vec<&AlgorithmResult>> = HashMap::new();

        for result in &self.results {
            stats_map
                .entry(result.algorithm.as_str())
                .or_default()
                .push(result);
        }

        let mut statistics = Vec::new();

        for (algo, results) in stats_map {
            let costs: Vec<f64> = results
                .iter()
                .map(|r| r.cost)
                .filter(|c| c.is_finite())
                .collect();
            if costs.is_empty() {
                continue;
            }
            let times: Vec<f64> = results.iter().map(|r| r.time).collect();
            let gaps: Vec<f64> = results.iter().filter_map(|r| r.gap_to_best).collect();

            let avg_cost = costs.iter().sum::<f64>() / costs.len() as f64;
            let best_cost = costs.iter().cloned().fold(f64::INFINITY, f64::min);
            let worst_cost = costs.iter().cloned().fold(0.0, f64::max);
            let variance =
                costs.iter().map(|c| (c - avg_cost).powi(2)).sum::<f64>() / costs.len() as f64;

            let avg_gap = if gaps.is_empty() {
                None
            } else {
                Some(gaps.iter().sum::<f64>() / gaps.len() as f64)
            };

            statistics.push(AlgorithmStatistics {
                algorithm: algo.to_string(),
                num_instances: results.len(),
                num_within_time_limit: results.iter().filter(|r| r.within_time_limit).count(),
                avg_cost,
                best_cost,
                worst_cost,
                std_cost: variance.sqrt(),
                avg_time: times.iter().sum::<f64>() / times.len() as f64,
                max_time: times.iter().cloned().fold(0.0, f64::max),
                avg_gap,
            });
        }

        statistics.sort_by(|a, b| a.algorithm.cmp(&b.algorithm));
        statistics
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Results as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.results)
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("        Tour Solver Benchmark Report\n");
        report.push_str("========================================\n\n");

        report.push_str("-".repeat(80).as_str());
        report.push('\n');
        report.push_str(&format!(
            "{:<25} {:>10} {:>12} {:>12} {:>10} {:>10}\n",
            "Algorithm", "In time", "Avg Cost", "Best Cost", "Avg Gap%", "Max Time"
        ));
        report.push_str("-".repeat(80).as_str());
        report.push('\n');

        for stat in self.compute_statistics() {
            let gap_str = stat
                .avg_gap
                .map(|g| format!("{:.2}%", g))
                .unwrap_or_else(|| "-".to_string());

            report.push_str(&format!(
                "{:<25} {:>10} {:>12.2} {:>12.2} {:>10} {:>10.4}\n",
                stat.algorithm,
                format!("{}/{}", stat.num_within_time_limit, stat.num_instances),
                stat.avg_cost,
                stat.best_cost,
                gap_str,
                stat.max_time
            ));
        }

        report.push_str("-".repeat(80).as_str());
        report.push('\n');
        report
    }

    /// Get all results
    pub fn results(&self) -> &[AlgorithmResult] {
        &self.results
    }
}

/// Undirected complete graph over `0..n` with weights drawn uniformly from
/// `[1, max_weight]`. The same seed always yields the same graph.
pub fn random_complete_graph(
    n: usize,
    seed: u64,
    max_weight: f64,
) -> Result<WeightedGraph<usize>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let upper = max_weight.max(1.0);
    let mut graph = WeightedGraph::undirected();

    for v in 0..n {
        graph.add_vertex(v);
    }
    for u in 0..n {
        for v in (u + 1)..n {
            let weight = rng.gen_range(1.0..=upper);
            graph.add_edge(&u, &v, weight)?;
        }
    }

    Ok(graph)
}
