//! Atelier core: shared client state, effect seams, orchestrated actions and
//! modal coordination for the Atelier shell.

pub mod actions;
pub mod api;
pub mod config;
pub mod context;
pub mod effects;
pub mod error;
pub mod modal;
pub mod state;
mod util;
