//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the EnvNode appliance:
//! command execution, periodic sampling, alarm notification, logging and
//! network destination learning. All interaction with hardware happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod commands;
pub mod events;
mod handlers;
pub mod output;
pub mod ports;
pub mod service;
