//! marksflow - internal marks lifecycle client
//!
//! Drives the `draft → submitted → locked → published` workflow of a
//! university ERP backend: faculty enter and submit marks, admins lock and
//! publish them in bulk.
//!
//! Layers, leaves first:
//! - [`types`] and [`lifecycle`]: status enum and transition table (pure)
//! - [`api`]: the [`api::MarksRepository`] trait and its HTTP implementation
//! - [`surface`]: faculty entry and admin lock/publish state machines

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod surface;
pub mod types;
