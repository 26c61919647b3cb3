#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod measure;
pub mod scheduler;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use error::{Error, Result};
pub use layout::{RoutingResult, recompute};
