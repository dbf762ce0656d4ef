//! Libris application library
//!
//! Wires the catalog store, the project modules and the HTTP facade into a
//! runnable service.

pub mod app;
pub mod modules;

pub use app::Application;
