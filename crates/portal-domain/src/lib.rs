//! Domain layer of the safety portal
//!
//! Equipment inventory records, notice content schemas, repository traits and
//! the services that aggregate and reconcile them.

pub mod model;
pub mod repository;
pub mod service;
