//! Application core — pure domain logic, zero direct I/O.
//!
//! This module contains the business rules for the washer: panel
//! command handling, sensor conditioning, interlock supervision and the
//! wash-cycle FSM, orchestrated by [`service::WasherService`].
//! All interaction with hardware and time happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
