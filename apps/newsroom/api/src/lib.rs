//! Newsroom API: composes the domain routers into one service.

pub mod api;
pub mod config;
pub mod directory;
pub mod state;
