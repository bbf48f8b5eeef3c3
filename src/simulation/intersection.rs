//! Intersection logic for the traffic simulation
//!
//! An intersection owns one light and one vehicle queue per street. Streets
//! never touch each other's queues, which is what lets the crossing step run
//! on several threads at once: each worker gets a disjoint slice of queues and
//! only the report sink is shared.

use std::thread;

use rand::Rng;

use super::config::{ConfigError, SimConfig};
use super::light::{SignalModel, TrafficLights};
use super::queue::VehicleQueue;
use super::report::{Event, ReportSink};
use super::types::{street_label, IntersectionId, StreetId};

/// How the crossing step is executed within one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossingMode {
    Serial,
    /// Streets are split into contiguous chunks, one per worker thread
    Parallel { workers: usize },
}

/// An intersection in the traffic simulation
#[derive(Debug, Clone)]
pub struct Intersection {
    pub id: IntersectionId,
    lights: TrafficLights,
    streets: Vec<VehicleQueue>,
    labels: Vec<String>,
    max_vehicles_per_cycle: usize,
}

impl Intersection {
    /// Build an intersection from an already validated config
    pub fn new<R: Rng>(id: IntersectionId, config: &SimConfig, rng: &mut R) -> Self {
        let lights = TrafficLights::initialize(config.signal_model, config.streets, rng);
        Self::assemble(id, lights, config.capacity, config.max_vehicles_per_cycle)
    }

    /// Build an intersection around explicitly chosen lights
    ///
    /// The street count is taken from `lights`.
    pub fn with_lights(
        id: IntersectionId,
        lights: TrafficLights,
        capacity: usize,
        max_vehicles_per_cycle: usize,
    ) -> Result<Self, ConfigError> {
        if lights.is_empty() {
            return Err(ConfigError::NoStreets);
        }
        if lights.model() == SignalModel::Binary && lights.len() < 2 {
            return Err(ConfigError::BinaryNeedsPairs);
        }
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if max_vehicles_per_cycle == 0 {
            return Err(ConfigError::ZeroCrossingCap);
        }
        Ok(Self::assemble(id, lights, capacity, max_vehicles_per_cycle))
    }

    fn assemble(
        id: IntersectionId,
        lights: TrafficLights,
        capacity: usize,
        max_vehicles_per_cycle: usize,
    ) -> Self {
        let street_count = lights.len();
        let streets = (0..street_count)
            .map(|i| VehicleQueue::filled(StreetId(i), capacity))
            .collect();
        let labels = (0..street_count)
            .map(|i| street_label(StreetId(i), street_count))
            .collect();

        Self {
            id,
            lights,
            streets,
            labels,
            max_vehicles_per_cycle,
        }
    }

    pub fn street_count(&self) -> usize {
        self.streets.len()
    }

    pub fn lights(&self) -> &TrafficLights {
        &self.lights
    }

    pub fn queue(&self, street: StreetId) -> &VehicleQueue {
        &self.streets[street.0]
    }

    pub fn advance_lights(&mut self) {
        self.lights.advance();
    }

    /// How many vehicles each GREEN street may send through this cycle
    pub fn compute_eligible_crossings(&self) -> Vec<(StreetId, usize)> {
        self.streets
            .iter()
            .enumerate()
            .map(|(i, queue)| (StreetId(i), queue))
            .filter(|(street, _)| self.lights.is_green(*street))
            .map(|(street, queue)| (street, queue.len().min(self.max_vehicles_per_cycle)))
            .collect()
    }

    /// Move every eligible vehicle through the intersection
    ///
    /// One `Crossing` event is appended per vehicle, in dequeue order for its
    /// street. Returns the number of vehicles that crossed.
    pub fn apply_crossings(&mut self, sink: &ReportSink, mode: CrossingMode) -> usize {
        let mut allowed = vec![0; self.streets.len()];
        for (street, count) in self.compute_eligible_crossings() {
            allowed[street.0] = count;
        }

        let id = self.id;
        let labels = &self.labels;
        let streets = &mut self.streets;

        match mode {
            CrossingMode::Serial => streets
                .iter_mut()
                .zip(&allowed)
                .enumerate()
                .map(|(i, (queue, &n))| cross_street(id, StreetId(i), &labels[i], queue, n, sink))
                .sum::<usize>(),
            CrossingMode::Parallel { workers } => {
                let chunk = streets.len().div_ceil(workers.max(1)).max(1);
                thread::scope(|s| {
                    let handles: Vec<_> = streets
                        .chunks_mut(chunk)
                        .zip(allowed.chunks(chunk))
                        .enumerate()
                        .map(|(c, (queues, counts))| {
                            s.spawn(move || {
                                let mut crossed = 0;
                                for (offset, (queue, &n)) in queues.iter_mut().zip(counts).enumerate() {
                                    let i = c * chunk + offset;
                                    crossed += cross_street(id, StreetId(i), &labels[i], queue, n, sink);
                                }
                                crossed
                            })
                        })
                        .collect();

                    handles
                        .into_iter()
                        .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                        .sum::<usize>()
                })
            }
        }
    }

    pub fn has_remaining_vehicles(&self) -> bool {
        self.streets.iter().any(|q| !q.is_empty())
    }

    pub fn remaining_vehicles(&self) -> usize {
        self.streets.iter().map(VehicleQueue::len).sum()
    }

    /// Append one `Light` event per street
    pub fn snapshot_lights(&self, sink: &ReportSink) {
        sink.extend(self.lights.states().iter().enumerate().map(|(i, &state)| Event::Light {
            street: StreetId(i),
            label: self.labels[i].clone(),
            state,
        }));
    }

    /// Append one `Queue` event per street listing the vehicles still waiting
    pub fn snapshot_queues(&self, sink: &ReportSink) {
        sink.extend(self.streets.iter().enumerate().map(|(i, queue)| Event::Queue {
            street: StreetId(i),
            label: self.labels[i].clone(),
            vehicles: queue.iter().copied().collect(),
        }));
    }

    /// Light states followed by queue contents; reads only
    pub fn snapshot_to_sink(&self, sink: &ReportSink) {
        self.snapshot_lights(sink);
        self.snapshot_queues(sink);
    }
}

fn cross_street(
    intersection: IntersectionId,
    street: StreetId,
    label: &str,
    queue: &mut VehicleQueue,
    n: usize,
    sink: &ReportSink,
) -> usize {
    let crossed = queue.remove_front(n);
    for &vehicle in &crossed {
        sink.append(Event::Crossing {
            intersection,
            street,
            label: label.to_string(),
            vehicle,
        });
    }
    crossed.len()
}
