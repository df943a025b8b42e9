//! Data Transfer Objects for the job server API
//!
//! Request bodies and acknowledgements that have no meaning outside a single
//! HTTP exchange.

pub mod job;
pub mod schedule;
