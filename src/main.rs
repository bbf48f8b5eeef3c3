use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use intersection_sim::simulation::{
    CycleOutput, EventOrdering, NullOutput, RunOutcome, SignalModel, SimConfig, SimWorld,
    StdoutOutput, Topology,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    /// Four binary-signal intersections in parallel
    Independent,
    /// One ternary-signal intersection with parallel street workers
    ParallelStreets,
    /// One 14-street intersection on a single thread
    Sequential,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SignalArg {
    Binary,
    Ternary,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TopologyArg {
    Sequential,
    Independent,
    ParallelStreets,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderingArg {
    /// Crossing lines grouped by street
    Street,
    /// Crossing lines in the order workers produced them
    Arrival,
}

#[derive(Parser)]
#[command(name = "intersection_sim")]
#[command(about = "Discrete-cycle traffic light simulation")]
struct Cli {
    /// Starting configuration; the options below override it
    #[arg(long, value_enum, default_value = "independent")]
    preset: Preset,

    /// Number of intersections
    #[arg(long)]
    intersections: Option<usize>,

    /// Streets per intersection
    #[arg(long)]
    streets: Option<usize>,

    /// Vehicles queued on each street at the start
    #[arg(long)]
    capacity: Option<usize>,

    /// Vehicles allowed through per GREEN street per cycle
    #[arg(long)]
    per_cycle: Option<usize>,

    /// Signal model
    #[arg(long, value_enum)]
    signal: Option<SignalArg>,

    /// Cycles between light changes
    #[arg(long)]
    period: Option<u64>,

    /// Stop after this many cycles (0 = run until every vehicle has crossed)
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Concurrency topology
    #[arg(long, value_enum)]
    topology: Option<TopologyArg>,

    /// Worker threads
    #[arg(long)]
    workers: Option<usize>,

    /// Seed for the initial light states
    #[arg(long)]
    seed: Option<u64>,

    /// Order of crossing lines within a cycle
    #[arg(long, value_enum)]
    ordering: Option<OrderingArg>,

    /// Do not print per-cycle output
    #[arg(long)]
    quiet: bool,
}

impl Cli {
    fn into_config(self) -> (SimConfig, Option<u64>, bool) {
        let mut config = match self.preset {
            Preset::Independent => SimConfig::independent(),
            Preset::ParallelStreets => SimConfig::parallel_streets(),
            Preset::Sequential => SimConfig::sequential(),
        };

        if let Some(n) = self.intersections {
            config.intersections = n;
        }
        if let Some(n) = self.streets {
            config.streets = n;
        }
        if let Some(n) = self.capacity {
            config.capacity = n;
        }
        if let Some(n) = self.per_cycle {
            config.max_vehicles_per_cycle = n;
        }
        if let Some(signal) = self.signal {
            config.signal_model = match signal {
                SignalArg::Binary => SignalModel::Binary,
                SignalArg::Ternary => SignalModel::Ternary,
            };
        }
        if let Some(period) = self.period {
            config.signal_period = period;
        }
        if let Some(max) = self.max_cycles {
            config.max_cycles = (max > 0).then_some(max);
        }
        if let Some(topology) = self.topology {
            config.topology = match topology {
                TopologyArg::Sequential => Topology::Sequential,
                TopologyArg::Independent => Topology::IndependentIntersections,
                TopologyArg::ParallelStreets => Topology::ParallelStreets,
            };
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(ordering) = self.ordering {
            config.ordering = match ordering {
                OrderingArg::Street => EventOrdering::ByStreet,
                OrderingArg::Arrival => EventOrdering::Arrival,
            };
        }

        (config, self.seed, self.quiet)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let (config, seed, quiet) = Cli::parse().into_config();

    let mut world = match seed {
        Some(seed) => SimWorld::new_with_seed(config, seed),
        None => SimWorld::new(config),
    }
    .context("Invalid simulation configuration")?;

    println!("Starting simulation");

    let output: &dyn CycleOutput = if quiet { &NullOutput } else { &StdoutOutput };

    let start = Instant::now();
    let summary = world.run(output);
    let elapsed = start.elapsed();

    println!();
    for report in &summary.reports {
        match report.outcome {
            RunOutcome::AllCrossed => println!(
                "[Intersection {}] All vehicles have crossed ({} cycles).",
                report.id, report.cycles
            ),
            RunOutcome::CycleCapReached => println!(
                "[Intersection {}] Cycle cap reached after {} cycles, {} vehicles still waiting.",
                report.id, report.cycles, report.vehicles_remaining
            ),
        }
    }
    println!("Total simulation time: {:.3} s", elapsed.as_secs_f64());

    Ok(())
}
