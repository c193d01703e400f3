//! EnvNode firmware library.
//!
//! Exposes the pure-logic modules (interpreter, storage, alarm, application
//! core) for integration testing, plus the host adapters the `envnode`
//! binary wires together.

#![deny(unused_must_use)]

pub mod alarm;
pub mod app;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod scheduler;
pub mod storage;

pub mod adapters;
pub mod drivers;
pub mod sensors;
