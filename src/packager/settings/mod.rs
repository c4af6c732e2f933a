//! Configuration for a conversion run.
//!
//! [`Settings`] holds the two user-supplied paths plus the fixed naming
//! conventions of the working area, and derives every path the pipeline
//! touches. Construct it through [`SettingsBuilder`].

mod builder;
mod core;

pub use builder::SettingsBuilder;
pub use core::Settings;

/// Name of the working directory created inside the output folder.
pub const DEFAULT_WORK_DIR_NAME: &str = "temp";

/// Prefix of the produced installer filename.
pub const DEFAULT_PRODUCT_PREFIX: &str = "python";

/// Files in the bundle's shared resources that are not carried into the flat package.
pub const DEFAULT_EXCLUDED_RESOURCES: [&str; 2] =
    ["Description.plist", "install_certificates.command"];
