//! End-to-end tests through the public facade.

mod common;

mod aggregation;
mod concurrency;
mod ingest;
mod persistence;
mod queries;
