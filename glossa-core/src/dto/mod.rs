//! Data Transfer Objects for the generation backend
//!
//! These mirror the backend's JSON bodies field for field. Conversions into
//! domain types live next to each DTO.

pub mod result;
pub mod session;
pub mod task;
