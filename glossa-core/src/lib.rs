//! Glossa Core
//!
//! Core types shared by the Glossa client crates.
//!
//! This crate contains:
//! - Domain types: sessions, tasks, result snapshots and the watched target
//! - DTOs: wire shapes of the generation backend's REST API

pub mod domain;
pub mod dto;
