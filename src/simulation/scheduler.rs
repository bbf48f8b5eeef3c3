//! Cycle scheduler
//!
//! Drives one intersection through repeated cycles until every vehicle has
//! crossed or the configured cycle cap is hit. A cycle is:
//!
//! 1. advance the lights if the signal schedule says so
//! 2. log the light states
//! 3. move eligible vehicles (serially or across street workers)
//! 4. log what is still queued
//! 5. render the cycle's block, hand it to the output and clear the sink

use log::{debug, info, warn};

use super::config::{SimConfig, Topology};
use super::intersection::{CrossingMode, Intersection};
use super::light::SignalModel;
use super::output::CycleOutput;
use super::report::{Event, EventOrdering, ReportSink};
use super::types::IntersectionId;

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    AllCrossed,
    CycleCapReached,
}

/// End-of-run result for one intersection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionReport {
    pub id: IntersectionId,
    /// Cycles actually executed
    pub cycles: u64,
    pub vehicles_crossed: usize,
    pub vehicles_remaining: usize,
    pub outcome: RunOutcome,
}

/// Scheduling parameters shared by every intersection of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerSettings {
    pub signal_model: SignalModel,
    pub signal_period: u64,
    pub max_cycles: Option<u64>,
    pub crossing_mode: CrossingMode,
    pub ordering: EventOrdering,
}

impl SchedulerSettings {
    pub fn from_config(config: &SimConfig) -> Self {
        let crossing_mode = match config.topology {
            Topology::ParallelStreets => CrossingMode::Parallel {
                workers: config.workers,
            },
            Topology::Sequential | Topology::IndependentIntersections => CrossingMode::Serial,
        };

        Self {
            signal_model: config.signal_model,
            signal_period: config.signal_period,
            max_cycles: config.max_cycles,
            crossing_mode,
            ordering: config.ordering,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CycleScheduler {
    settings: SchedulerSettings,
}

impl CycleScheduler {
    pub fn new(settings: SchedulerSettings) -> Self {
        Self { settings }
    }

    /// Whether another cycle should run after `completed` cycles
    pub fn should_continue(&self, intersection: &Intersection, completed: u64) -> bool {
        let under_cap = self.settings.max_cycles.is_none_or(|max| completed < max);
        under_cap && intersection.has_remaining_vehicles()
    }

    /// Execute cycle number `cycle` (counted from 1) and flush its block
    ///
    /// Returns the number of vehicles that crossed.
    pub fn run_cycle(
        &self,
        intersection: &mut Intersection,
        cycle: u64,
        sink: &mut ReportSink,
        output: &dyn CycleOutput,
    ) -> usize {
        if self
            .settings
            .signal_model
            .advances_at(cycle, self.settings.signal_period)
        {
            intersection.advance_lights();
        }

        sink.append(Event::CycleHeader {
            intersection: intersection.id,
            cycle,
        });
        intersection.snapshot_lights(sink);

        let crossed = intersection.apply_crossings(sink, self.settings.crossing_mode);

        intersection.snapshot_queues(sink);

        let block = sink.take_block(self.settings.ordering);
        output.emit(intersection.id, cycle, &block);

        debug!(
            "Intersection {} cycle {}: {} crossed, {} remaining",
            intersection.id,
            cycle,
            crossed,
            intersection.remaining_vehicles()
        );

        crossed
    }

    /// Run cycles until the intersection is empty or the cap is reached
    pub fn run(&self, intersection: &mut Intersection, output: &dyn CycleOutput) -> IntersectionReport {
        let mut sink = ReportSink::new();
        let mut cycles = 0;
        let mut vehicles_crossed = 0;

        info!(
            "Intersection {}: starting with {} vehicles on {} streets",
            intersection.id,
            intersection.remaining_vehicles(),
            intersection.street_count()
        );

        while self.should_continue(intersection, cycles) {
            cycles += 1;
            vehicles_crossed += self.run_cycle(intersection, cycles, &mut sink, output);
        }

        let vehicles_remaining = intersection.remaining_vehicles();
        let outcome = if vehicles_remaining == 0 {
            info!(
                "Intersection {}: all vehicles crossed after {} cycles",
                intersection.id, cycles
            );
            RunOutcome::AllCrossed
        } else {
            warn!(
                "Intersection {}: cycle cap reached after {} cycles with {} vehicles waiting",
                intersection.id, cycles, vehicles_remaining
            );
            RunOutcome::CycleCapReached
        };

        IntersectionReport {
            id: intersection.id,
            cycles,
            vehicles_crossed,
            vehicles_remaining,
            outcome,
        }
    }
}
