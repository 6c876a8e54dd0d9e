//! # Overview
//! "Ticksim" provides a fixed-increment (tick-driven) queueing network
//! simulator, for evaluating the throughput and utilization of simple
//! service pipelines - for example, a generator feeding a queue feeding a
//! processor.
//!
//! This repository contains:
//!
//! * A seeded variate source, for reproducible stochastic device
//! behaviors.
//! * Pre-built devices (generator, queue, processor) that advance one unit
//! of model time per tick and keep utilization and wait-time statistics.
//! * A notification system, through which devices react to each other's
//! state changes within the same tick.
//! * Simulator engine and declarative pipeline configuration, for running
//! simulations by tick count or by transact count.
//! * Output analysis framework, for analyzing replications statistically.
pub mod input_modeling;
pub mod models;
pub mod output_analysis;
pub mod simulator;
pub mod utils;
