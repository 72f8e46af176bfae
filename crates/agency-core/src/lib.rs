//! # agency-core
//!
//! Core types, ID prefixes, and error types for the agency workbench.
//!
//! This crate provides the foundational types shared across all agency crates:
//! - Entity structs for the domain objects (projects, tasks, expenses, etc.)
//! - Status, priority, and role enums
//! - ID prefix constants
//! - Cross-cutting error types and the explicit authorization context
//! - Pure planning logic: the task dependency graph, financial rollups,
//!   and capacity planning
//! - Response types returned by the CLI

pub mod audit_detail;
pub mod capacity;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod graph;
pub mod identity;
pub mod ids;
pub mod responses;
pub mod rollup;
