//! Library crate root: profile store, platform API, CSV reports, and CLI runtime.

#[path = "lib/mod.rs"]
pub mod lib_mod;
pub use lib_mod as lib;
pub mod api;
pub mod cli;
pub mod config;
pub mod reports;
pub mod runtime;
