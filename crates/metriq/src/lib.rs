#![forbid(unsafe_code)]

pub mod cli;
pub mod dataset;
pub mod models;
pub mod normalize;
pub mod panels;
pub mod query;
pub mod registry;

pub use cli::app::{Cli, Command};
