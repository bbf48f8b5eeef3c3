//! Per-cycle event log
//!
//! `ReportSink` is the one piece of state that concurrent street workers
//! share. Every append takes the lock for a single push, so records never
//! interleave; the cycle's text block is only rendered once all writers are
//! done.

use std::sync::{Mutex, PoisonError};

use super::light::LightState;
use super::types::{IntersectionId, StreetId, VehicleId};

/// One record written during a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    CycleHeader {
        intersection: IntersectionId,
        cycle: u64,
    },
    Light {
        street: StreetId,
        label: String,
        state: LightState,
    },
    Crossing {
        intersection: IntersectionId,
        street: StreetId,
        label: String,
        vehicle: VehicleId,
    },
    Queue {
        street: StreetId,
        label: String,
        vehicles: Vec<VehicleId>,
    },
}

impl Event {
    /// Block section the event belongs to, in output order
    fn section(&self) -> u8 {
        match self {
            Event::CycleHeader { .. } => 0,
            Event::Light { .. } => 1,
            Event::Crossing { .. } => 2,
            Event::Queue { .. } => 3,
        }
    }

    fn street(&self) -> Option<StreetId> {
        match self {
            Event::CycleHeader { .. } => None,
            Event::Light { street, .. } | Event::Crossing { street, .. } | Event::Queue { street, .. } => {
                Some(*street)
            }
        }
    }
}

/// How events are ordered when a cycle's block is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventOrdering {
    /// Whatever order the writers acquired the lock in
    Arrival,
    /// Grouped by section, then by street index; each street keeps its own
    /// append order
    #[default]
    ByStreet,
}

/// Append-only log for one intersection's current cycle
#[derive(Debug, Default)]
pub struct ReportSink {
    events: Mutex<Vec<Event>>,
}

impl ReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    /// Append a batch under a single lock acquisition
    pub fn extend(&self, events: impl IntoIterator<Item = Event>) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(events);
    }

    /// Buffered event count; needs exclusive access, like `drain`
    pub fn len(&mut self) -> usize {
        self.events.get_mut().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    /// Remove and return every buffered event
    ///
    /// Takes `&mut self`: reading is only possible once no worker holds a
    /// reference to the sink.
    pub fn drain(&mut self, ordering: EventOrdering) -> Vec<Event> {
        let events = self.events.get_mut().unwrap_or_else(PoisonError::into_inner);
        let mut drained = std::mem::take(events);
        if ordering == EventOrdering::ByStreet {
            drained.sort_by_key(|event| (event.section(), event.street()));
        }
        drained
    }

    /// Render the cycle's events as one text block and clear the sink
    pub fn take_block(&mut self, ordering: EventOrdering) -> String {
        render_block(&self.drain(ordering))
    }
}

/// Format events as the text block handed to the output for one cycle
pub fn render_block(events: &[Event]) -> String {
    let mut out = String::new();
    let mut section = None;

    for event in events {
        if section != Some(event.section()) {
            section = Some(event.section());
            match event {
                Event::Light { .. } => out.push_str("Lights:\n"),
                Event::Crossing { .. } => out.push_str("Crossings:\n"),
                Event::Queue { .. } => out.push_str("Queues:\n"),
                Event::CycleHeader { .. } => {}
            }
        }

        let line = match event {
            Event::CycleHeader { intersection, cycle } => {
                format!("=== Intersection {intersection} - Cycle {cycle} ===\n")
            }
            Event::Light { label, state, .. } => format!("  {label}: {state}\n"),
            Event::Crossing {
                intersection,
                label,
                vehicle,
                ..
            } => format!("  [Intersection {intersection}] vehicle {vehicle} crossed from {label}\n"),
            Event::Queue { label, vehicles, .. } => {
                let mut line = format!("  {label} ({}):", vehicles.len());
                for vehicle in vehicles {
                    line.push_str(&format!(" {vehicle}"));
                }
                line.push('\n');
                line
            }
        };
        out.push_str(&line);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crossing(street: usize, seq: usize) -> Event {
        Event::Crossing {
            intersection: IntersectionId(0),
            street: StreetId(street),
            label: format!("Street {}", street + 1),
            vehicle: VehicleId::new(StreetId(street), seq),
        }
    }

    #[test]
    fn test_by_street_ordering_keeps_per_street_fifo() {
        let mut sink = ReportSink::new();
        sink.append(crossing(1, 0));
        sink.append(crossing(0, 0));
        sink.append(crossing(1, 1));
        sink.append(crossing(0, 1));

        let events = sink.drain(EventOrdering::ByStreet);
        assert_eq!(
            events,
            vec![crossing(0, 0), crossing(0, 1), crossing(1, 0), crossing(1, 1)]
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn test_arrival_ordering_is_untouched() {
        let mut sink = ReportSink::new();
        sink.append(crossing(1, 0));
        sink.append(crossing(0, 0));
        assert_eq!(sink.drain(EventOrdering::Arrival), vec![crossing(1, 0), crossing(0, 0)]);
    }

    #[test]
    fn test_render_block_layout() {
        let events = vec![
            Event::CycleHeader {
                intersection: IntersectionId(2),
                cycle: 7,
            },
            Event::Light {
                street: StreetId(0),
                label: "North".to_string(),
                state: LightState::Green,
            },
            Event::Crossing {
                intersection: IntersectionId(2),
                street: StreetId(0),
                label: "North".to_string(),
                vehicle: VehicleId::new(StreetId(0), 4),
            },
            Event::Queue {
                street: StreetId(0),
                label: "North".to_string(),
                vehicles: vec![VehicleId::new(StreetId(0), 5)],
            },
        ];

        assert_eq!(
            render_block(&events),
            "=== Intersection 2 - Cycle 7 ===\n\
             Lights:\n  North: GREEN\n\
             Crossings:\n  [Intersection 2] vehicle 0:4 crossed from North\n\
             Queues:\n  North (1): 0:5\n"
        );
    }
}
