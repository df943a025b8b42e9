//! Core domain types
//!
//! Snapshots and entities owned by the job server. The console never
//! mutates these locally; it only replaces them with fresher server copies.

pub mod job;
pub mod schedule;
