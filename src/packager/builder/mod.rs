//! Conversion orchestration.
//!
//! - [`checksum`] - SHA256 checksum of the produced package
//! - [`orchestrator`] - the [`Flattener`] pipeline
//! - [`preflight`] - input bundle validation
//! - [`tool_detection`] - external tool lookup

mod checksum;
mod orchestrator;
mod preflight;
mod tool_detection;

pub use checksum::calculate_sha256;
pub use orchestrator::{FlatPackage, Flattener, ProgressReporter};
pub use preflight::{SourcePackage, locate_sub_packages};
pub use tool_detection::Toolchain;
