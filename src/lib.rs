//! Linewatch - pass/fail prediction for production-line telemetry
//!
//! A prediction service for a binary industrial-process outcome learned from
//! time-stamped sensor telemetry. Three operations are exposed over HTTP and
//! the CLI:
//!
//! - **train**: fit a boosted classifier on a historical time window, with a
//!   class-imbalance correction and early stopping against a disjoint later
//!   window, then persist the model and its feature schema as one pair
//! - **predict**: score a single feature record against the stored model
//! - **simulate**: batched retrospective predictions over a time window,
//!   with per-record confidence and highlighted sensor readings
//!
//! # Modules
//!
//! - [`dataset`] - CSV loading, time-window selection, subset cleaning
//! - [`schema`] - ordered feature-column contract between train and inference
//! - [`boosting`] - gradient-boosted trees with weighted gradients
//! - [`trainer`] - imbalance-aware training and evaluation protocol
//! - [`store`] - atomic persistence of the model/schema artifact pair
//! - [`inference`] - single-record and batched scoring
//! - [`service`] - transport-independent operation facade
//! - [`server`] - HTTP API
//! - [`cli`] - command-line entry points

pub mod error;

pub mod config;
pub mod dataset;
pub mod schema;

pub mod boosting;
pub mod metrics;
pub mod trainer;

pub mod store;
pub mod inference;
pub mod service;

pub mod server;
pub mod cli;
