pub mod archive;
pub mod backup;
pub mod cli;
pub mod config;
pub mod load_config;
pub mod prune;
pub mod scan;
pub mod state;
pub mod upload;

pub use cli::{run, Cli, Commands};
