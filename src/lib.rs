//! Store visit image jobs
//!
//! Accepts batches of store visits, measures every referenced image in a
//! detached background task, and exposes the job's progress for polling.
//! Jobs live in memory for the lifetime of the process.

pub mod app_state;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
