//! Row structs and DTOs, one module per table.
//!
//! Enumerated columns (`tipo`, `estado`, `rol` ...) are stored as TEXT and
//! surface here as `String`; inputs take the typed enums from
//! `gemelli_core` so only known values reach the database.

pub mod audit;
pub mod backup;
pub mod device;
pub mod device_log;
pub mod device_spec;
pub mod inventory_permission;
pub mod org_unit;
pub mod ticket;
pub mod ticket_comment;
pub mod user;
