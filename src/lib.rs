//! Layered JSON configuration loader.
//!
//! Resolves which config files apply to the running process, merges them
//! into one value, and records which files were loaded or skipped.
//!
//! ```no_run
//! use layered_conf::config::{Behavior, Loader};
//! use serde_json::Value;
//!
//! let mut loader = Loader::new([Behavior::UseDotUser, Behavior::IgnoreMissingFiles])?;
//! let mut config = Value::Null;
//! loader.load(&mut config)?;
//! println!("loaded {:?}", loader.loaded_paths());
//! # Ok::<(), layered_conf::error::LoadError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
