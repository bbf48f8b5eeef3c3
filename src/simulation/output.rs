//! Destinations for rendered cycle blocks
//!
//! The core never fails on output: an implementation that can hit I/O errors
//! deals with them itself.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use log::error;

use super::types::IntersectionId;

/// Receives one completed text block per cycle per intersection
///
/// Shared by intersections that run on different threads, hence `Sync`.
pub trait CycleOutput: Sync {
    fn emit(&self, intersection: IntersectionId, cycle: u64, block: &str);
}

/// Writes blocks to standard output
///
/// Each block is written under the stdout lock, so blocks from concurrently
/// running intersections may interleave with each other but never tear.
#[derive(Debug, Default)]
pub struct StdoutOutput;

impl CycleOutput for StdoutOutput {
    fn emit(&self, intersection: IntersectionId, cycle: u64, block: &str) {
        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{block}") {
            error!(
                "Failed to write cycle {} of intersection {}: {}",
                cycle, intersection, e
            );
        }
    }
}

/// Discards every block
#[derive(Debug, Default)]
pub struct NullOutput;

impl CycleOutput for NullOutput {
    fn emit(&self, _intersection: IntersectionId, _cycle: u64, _block: &str) {}
}

/// A block captured by [`MemoryOutput`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedBlock {
    pub intersection: IntersectionId,
    pub cycle: u64,
    pub text: String,
}

/// Keeps every block in memory, in emission order
#[derive(Debug, Default)]
pub struct MemoryOutput {
    blocks: Mutex<Vec<EmittedBlock>>,
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> Vec<EmittedBlock> {
        self.blocks.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// The text blocks of one intersection, in cycle order
    pub fn blocks_for(&self, intersection: IntersectionId) -> Vec<String> {
        self.blocks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|b| b.intersection == intersection)
            .map(|b| b.text.clone())
            .collect()
    }
}

impl CycleOutput for MemoryOutput {
    fn emit(&self, intersection: IntersectionId, cycle: u64, block: &str) {
        self.blocks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(EmittedBlock {
                intersection,
                cycle,
                text: block.to_string(),
            });
    }
}
