//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate storage reads/writes around the pure schedule and agenda
//!   functions.
//! - Take owner and pet scope as explicit parameters on every call.

pub mod agenda_service;
pub mod demo_seed;
pub mod medication_service;
