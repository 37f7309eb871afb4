//! # Overview
//! Petrisim provides a discrete event simulation engine for stochastic
//! queueing networks, modeled as timed Petri nets.
//!
//! This repository contains:
//!
//! * Input modeling, for specifying deterministic or stochastic transition
//! delays.
//! * Places and transitions, the nodes of a timed Petri net.  A transition
//! may have any number of firings in flight, each with its own delay.
//! * Simulator engine, for executing a net with priority and probability
//! based conflict resolution, warm-up, and periodic snapshots.
//! * Output analysis, for exact time-weighted means during a run, metric
//! reporting, and confidence intervals across replications.
//! * Prebuilt networks and experiments, for the bank teller system and for
//! replicated runs.
//!
//! Petrisim is compatible with a wide variety of compilation targets,
//! including WASM.
pub mod experiment;
pub mod input_modeling;
pub mod models;
pub mod networks;
pub mod output_analysis;
pub mod simulator;
pub mod utils;
