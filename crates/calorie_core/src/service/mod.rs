//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into resource-level APIs.
//! - Keep the HTTP layer decoupled from storage details.

pub mod tracker_service;
