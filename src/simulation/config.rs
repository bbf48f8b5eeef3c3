//! Simulation configuration
//!
//! A `SimConfig` is assembled by the caller (the CLI, a test, an embedding
//! application) and validated once before any intersection is built.

use thiserror::Error;

use super::light::SignalModel;
use super::report::EventOrdering;

/// How the work of a simulation is spread over threads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Everything on the calling thread
    Sequential,
    /// Whole intersections run concurrently, sharing nothing but the output
    IndependentIntersections,
    /// One intersection at a time; each cycle's crossings run concurrently
    /// across streets
    ParallelStreets,
}

/// Rejected configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("an intersection needs at least one street")]
    NoStreets,
    #[error("the binary signal model needs at least two streets to alternate")]
    BinaryNeedsPairs,
    #[error("the simulation needs at least one intersection")]
    NoIntersections,
    #[error("streets must start with at least one vehicle")]
    ZeroCapacity,
    #[error("at least one vehicle must be allowed to cross per cycle")]
    ZeroCrossingCap,
    #[error("signal period must be at least one cycle")]
    ZeroPeriod,
    #[error("worker count must be at least one")]
    ZeroWorkers,
    #[error("maximum cycle count must be positive (leave it unset for an unbounded run)")]
    ZeroMaxCycles,
}

/// Everything needed to build and run a simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub intersections: usize,
    pub streets: usize,
    /// Vehicles queued on every street at the start
    pub capacity: usize,
    /// Vehicles allowed to cross from one GREEN street per cycle
    pub max_vehicles_per_cycle: usize,
    pub signal_model: SignalModel,
    /// Cycles between light advances
    pub signal_period: u64,
    /// `None` runs until every vehicle has crossed
    pub max_cycles: Option<u64>,
    pub topology: Topology,
    pub workers: usize,
    pub ordering: EventOrdering,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::independent()
    }
}

impl SimConfig {
    /// Four binary-signal intersections simulated side by side until empty
    pub fn independent() -> Self {
        Self {
            intersections: 4,
            streets: 4,
            capacity: 1000,
            max_vehicles_per_cycle: 3,
            signal_model: SignalModel::Binary,
            signal_period: 2,
            max_cycles: None,
            topology: Topology::IndependentIntersections,
            workers: 4,
            ordering: EventOrdering::ByStreet,
        }
    }

    /// One ternary-signal intersection with its streets processed by three
    /// workers
    pub fn parallel_streets() -> Self {
        Self {
            intersections: 1,
            streets: 4,
            capacity: 2000,
            max_vehicles_per_cycle: 50,
            signal_model: SignalModel::Ternary,
            signal_period: 3,
            max_cycles: Some(2000),
            topology: Topology::ParallelStreets,
            workers: 3,
            ordering: EventOrdering::ByStreet,
        }
    }

    /// One large ternary-signal intersection on a single thread
    pub fn sequential() -> Self {
        Self {
            intersections: 1,
            streets: 14,
            capacity: 3000,
            max_vehicles_per_cycle: 50,
            signal_model: SignalModel::Ternary,
            signal_period: 2,
            max_cycles: Some(200),
            topology: Topology::Sequential,
            workers: 1,
            ordering: EventOrdering::ByStreet,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.streets == 0 {
            return Err(ConfigError::NoStreets);
        }
        if self.signal_model == SignalModel::Binary && self.streets < 2 {
            return Err(ConfigError::BinaryNeedsPairs);
        }
        if self.intersections == 0 {
            return Err(ConfigError::NoIntersections);
        }
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.max_vehicles_per_cycle == 0 {
            return Err(ConfigError::ZeroCrossingCap);
        }
        if self.signal_period == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.max_cycles == Some(0) {
            return Err(ConfigError::ZeroMaxCycles);
        }
        Ok(())
    }
}
