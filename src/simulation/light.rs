//! Traffic light state machines
//!
//! Two signal models are supported:
//! - **Binary**: RED/GREEN only. Streets are coupled into two groups by index
//!   parity (opposite approaches of a four-way intersection) and the groups
//!   swap in lock-step.
//! - **Ternary**: RED → YELLOW → GREEN → RED. Each light starts at a random
//!   state and all lights step together, with no coupling between streets.

use std::fmt;

use rand::Rng;

use super::types::StreetId;

/// State of a single traffic light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightState {
    Red,
    Yellow,
    Green,
}

impl LightState {
    pub const ALL: [LightState; 3] = [LightState::Red, LightState::Yellow, LightState::Green];

    /// The next state in the ternary cycle
    pub fn next(self) -> Self {
        match self {
            LightState::Red => LightState::Yellow,
            LightState::Yellow => LightState::Green,
            LightState::Green => LightState::Red,
        }
    }

    /// Position in the ternary cycle (RED = 0, YELLOW = 1, GREEN = 2)
    pub fn index(self) -> usize {
        match self {
            LightState::Red => 0,
            LightState::Yellow => 1,
            LightState::Green => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LightState::Red => "RED",
            LightState::Yellow => "YELLOW",
            LightState::Green => "GREEN",
        }
    }
}

impl fmt::Display for LightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which signal model an intersection runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalModel {
    Binary,
    Ternary,
}

impl SignalModel {
    /// Whether the lights advance at the start of `cycle` (numbered from 1)
    ///
    /// Binary phases last exactly `period` cycles, so the first advance happens
    /// at cycle `period + 1`. Ternary lights advance on every cycle that is a
    /// multiple of `period`.
    pub fn advances_at(self, cycle: u64, period: u64) -> bool {
        if period == 0 {
            return false;
        }
        match self {
            SignalModel::Binary => cycle > 1 && (cycle - 1) % period == 0,
            SignalModel::Ternary => cycle % period == 0,
        }
    }
}

/// All lights of one intersection
#[derive(Debug, Clone)]
pub struct TrafficLights {
    model: SignalModel,
    states: Vec<LightState>,
    /// Binary model only: the parity group currently GREEN (0 = even streets)
    active_pair: usize,
}

impl TrafficLights {
    /// Set up the lights for `street_count` streets
    ///
    /// Binary lights start with the even group GREEN. Ternary lights draw an
    /// independent state per street from `rng`.
    pub fn initialize<R: Rng>(model: SignalModel, street_count: usize, rng: &mut R) -> Self {
        let states = match model {
            SignalModel::Binary => (0..street_count).map(|i| binary_state(i, 0)).collect(),
            SignalModel::Ternary => (0..street_count)
                .map(|_| LightState::ALL[rng.random_range(0..LightState::ALL.len())])
                .collect(),
        };

        Self {
            model,
            states,
            active_pair: 0,
        }
    }

    /// Build lights from explicit states
    ///
    /// Ternary states are taken as given. Binary lights cannot show mixed
    /// states within a parity group, so only `states[0]` is honoured: it picks
    /// which group starts GREEN and every other street is rewritten to match.
    pub fn from_states(model: SignalModel, states: Vec<LightState>) -> Self {
        let active_pair = match states.first() {
            Some(LightState::Green) | None => 0,
            Some(_) => 1,
        };
        let states = match model {
            SignalModel::Binary => (0..states.len()).map(|i| binary_state(i, active_pair)).collect(),
            SignalModel::Ternary => states,
        };

        Self {
            model,
            states,
            active_pair,
        }
    }

    /// Step every light once
    pub fn advance(&mut self) {
        match self.model {
            SignalModel::Binary => {
                self.active_pair = 1 - self.active_pair;
                for (i, state) in self.states.iter_mut().enumerate() {
                    *state = binary_state(i, self.active_pair);
                }
            }
            SignalModel::Ternary => {
                for state in &mut self.states {
                    *state = state.next();
                }
            }
        }
    }

    pub fn model(&self) -> SignalModel {
        self.model
    }

    pub fn state(&self, street: StreetId) -> LightState {
        self.states[street.0]
    }

    pub fn states(&self) -> &[LightState] {
        &self.states
    }

    pub fn is_green(&self, street: StreetId) -> bool {
        self.state(street) == LightState::Green
    }

    /// The parity group currently GREEN; only meaningful for the binary model
    pub fn active_pair(&self) -> usize {
        self.active_pair
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

fn binary_state(street: usize, active_pair: usize) -> LightState {
    if street % 2 == active_pair {
        LightState::Green
    } else {
        LightState::Red
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_binary_initial_state_greens_even_streets() {
        let mut rng = StdRng::seed_from_u64(1);
        let lights = TrafficLights::initialize(SignalModel::Binary, 4, &mut rng);
        assert_eq!(
            lights.states(),
            &[LightState::Green, LightState::Red, LightState::Green, LightState::Red]
        );
        assert_eq!(lights.active_pair(), 0);
    }

    #[test]
    fn test_ternary_never_skips_a_state() {
        let mut lights = TrafficLights::from_states(SignalModel::Ternary, vec![LightState::Red]);
        let mut seen = vec![lights.state(StreetId(0))];
        for _ in 0..3 {
            lights.advance();
            seen.push(lights.state(StreetId(0)));
        }
        assert_eq!(
            seen,
            vec![LightState::Red, LightState::Yellow, LightState::Green, LightState::Red]
        );
    }

    #[test]
    fn test_binary_from_states_follows_street_zero() {
        use LightState::{Green, Red, Yellow};
        let lights = TrafficLights::from_states(SignalModel::Binary, vec![Red, Red, Yellow, Green]);
        assert_eq!(lights.states(), &[Red, Green, Red, Green]);
        assert_eq!(lights.active_pair(), 1);
    }

    #[test]
    fn test_advance_schedule() {
        let binary: Vec<u64> = (1..=7).filter(|&c| SignalModel::Binary.advances_at(c, 2)).collect();
        assert_eq!(binary, vec![3, 5, 7]);

        let ternary: Vec<u64> = (1..=7).filter(|&c| SignalModel::Ternary.advances_at(c, 3)).collect();
        assert_eq!(ternary, vec![3, 6]);
    }
}
