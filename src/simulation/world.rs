//! Main simulation world that ties everything together
//!
//! `SimWorld` is the explicit context for a run: the validated config and
//! every intersection live here and are handed to the scheduler by reference.
//! Randomness is only used while building the world, so a seeded world always
//! produces the same output.

use std::thread;

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::{ConfigError, SimConfig, Topology};
use super::intersection::Intersection;
use super::output::CycleOutput;
use super::scheduler::{CycleScheduler, IntersectionReport, RunOutcome, SchedulerSettings};
use super::types::IntersectionId;

/// Results of a whole run, one report per intersection in id order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationSummary {
    pub reports: Vec<IntersectionReport>,
}

impl SimulationSummary {
    pub fn all_crossed(&self) -> bool {
        self.reports.iter().all(|r| r.outcome == RunOutcome::AllCrossed)
    }

    pub fn total_crossed(&self) -> usize {
        self.reports.iter().map(|r| r.vehicles_crossed).sum()
    }
}

/// The simulation context
pub struct SimWorld {
    config: SimConfig,
    intersections: Vec<Intersection>,
}

impl SimWorld {
    /// Create a world whose random light states come from the thread RNG
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        Self::build(config, &mut rand::rng())
    }

    /// Create a world with a seeded RNG for reproducible simulations
    pub fn new_with_seed(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::build(config, &mut StdRng::seed_from_u64(seed))
    }

    fn build<R: Rng>(config: SimConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;
        let intersections = (0..config.intersections)
            .map(|i| Intersection::new(IntersectionId(i), &config, &mut *rng))
            .collect();
        Ok(Self {
            config,
            intersections,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn intersections(&self) -> &[Intersection] {
        &self.intersections
    }

    pub fn remaining_vehicles(&self) -> usize {
        self.intersections.iter().map(Intersection::remaining_vehicles).sum()
    }

    /// Run every intersection to completion using the configured topology
    pub fn run(&mut self, output: &dyn CycleOutput) -> SimulationSummary {
        let scheduler = CycleScheduler::new(SchedulerSettings::from_config(&self.config));

        info!(
            "Running {} intersection(s) with topology {:?}, {} worker(s)",
            self.intersections.len(),
            self.config.topology,
            self.config.workers
        );

        let mut reports = match self.config.topology {
            Topology::Sequential | Topology::ParallelStreets => self
                .intersections
                .iter_mut()
                .map(|intersection| scheduler.run(intersection, output))
                .collect(),
            Topology::IndependentIntersections => {
                run_independent(&scheduler, &mut self.intersections, self.config.workers, output)
            }
        };

        reports.sort_by_key(|r: &IntersectionReport| r.id);
        SimulationSummary { reports }
    }
}

/// Spread whole intersections over worker threads
///
/// Intersections share no mutable state; the only shared object is the
/// output, which is `Sync`.
fn run_independent(
    scheduler: &CycleScheduler,
    intersections: &mut [Intersection],
    workers: usize,
    output: &dyn CycleOutput,
) -> Vec<IntersectionReport> {
    let chunk = intersections.len().div_ceil(workers.max(1)).max(1);

    thread::scope(|s| {
        let handles: Vec<_> = intersections
            .chunks_mut(chunk)
            .map(|group| {
                s.spawn(move || {
                    group
                        .iter_mut()
                        .map(|intersection| scheduler.run(intersection, output))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    })
}
