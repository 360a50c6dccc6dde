//! Career compass library: rule-based career suggestions from free-text
//! strength and interest answers

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{CompassError, Result};
