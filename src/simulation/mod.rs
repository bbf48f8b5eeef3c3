//! Intersection simulation core
//!
//! Everything needed to build intersections, run them cycle by cycle and
//! collect their per-cycle reports. Nothing in here prints or reads the
//! command line; the binary wires an output and a config in.

mod config;
mod intersection;
mod light;
mod output;
mod queue;
mod report;
mod scheduler;
mod types;
mod world;

pub use config::{ConfigError, SimConfig, Topology};
pub use intersection::{CrossingMode, Intersection};
pub use light::{LightState, SignalModel, TrafficLights};
pub use output::{CycleOutput, EmittedBlock, MemoryOutput, NullOutput, StdoutOutput};
pub use queue::VehicleQueue;
pub use report::{render_block, Event, EventOrdering, ReportSink};
pub use scheduler::{CycleScheduler, IntersectionReport, RunOutcome, SchedulerSettings};
pub use types::{street_label, IntersectionId, StreetId, VehicleId, COMPASS_LABELS};
pub use world::{SimWorld, SimulationSummary};
