//! Lifecycle integration tests.

mod create;
mod delete;
mod sync;
mod concurrency;
mod persistence;
