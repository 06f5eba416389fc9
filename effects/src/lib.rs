//! Production implementations of the `atelier-core` effect seams: HTTP
//! clients, the on-disk credential store, the local transport bus and the
//! desktop-side engines.

pub mod api;
pub mod auth;
pub mod connectivity;
pub mod factory;
pub mod http;
pub mod keybindings;
pub mod notifier;
pub mod realtime;
pub mod transport;
