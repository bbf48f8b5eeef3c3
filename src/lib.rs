//! Intersection Simulation Library
//!
//! A discrete-cycle traffic light simulation that can advance whole
//! intersections, or the streets of one intersection, concurrently.

pub mod simulation;
