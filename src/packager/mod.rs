//! Conversion of the Python mpkg into a flat package.
//!
//! # Module Organization
//!
//! - [`builder`] - pipeline orchestration, pre-flight checks, tool lookup
//! - [`catalog`] - the six known sub-packages
//! - [`macos`] - pkgbuild/pkgutil/productbuild stages
//! - [`process`] - external command execution
//! - [`settings`] - run configuration
//! - [`utils`] - filesystem helpers

pub mod builder;
pub mod catalog;
pub mod error;
pub mod macos;
pub mod process;
pub mod settings;
pub mod utils;

pub use builder::{FlatPackage, Flattener, ProgressReporter, Toolchain};
pub use error::{Error, Result};
pub use settings::{Settings, SettingsBuilder};
