//! UI module root: exposes drawing functions for individual panels.

pub mod downloads;
pub mod footer;
pub mod header;
pub mod services;
pub mod stats;
pub mod tasks;
pub mod theme;
pub mod util;
