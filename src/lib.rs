//! Converts the component-based Python installer bundle (`Python.mpkg`) into
//! a single flat `.pkg`.
//!
//! The work is done by Apple's packaging tools (`pkgbuild`, `pkgutil`,
//! `productbuild`); this crate drives them in order, patches what they
//! produce where needed, and generates the distribution descriptor.

pub mod cli;
pub mod error;
pub mod metadata;
pub mod packager;

pub use error::{CliError, FlattenerError, Result};
