//! Builder for constructing Settings.

use super::{
    DEFAULT_EXCLUDED_RESOURCES, DEFAULT_PRODUCT_PREFIX, DEFAULT_WORK_DIR_NAME, Settings,
};
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// Only the bundle path and output directory are required; the working
/// directory name, output prefix and resource exclusions default to the
/// conventions of the Python installer.
#[derive(Default)]
pub struct SettingsBuilder {
    mpkg_path: Option<PathBuf>,
    output_directory: Option<PathBuf>,
    work_dir_name: Option<String>,
    product_prefix: Option<String>,
    excluded_resources: Option<Vec<String>>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the input mpkg bundle.
    ///
    /// # Required
    pub fn mpkg_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.mpkg_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the folder that receives the flat package and the working directory.
    ///
    /// # Required
    pub fn output_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Overrides the working directory name.
    ///
    /// Default: `temp`
    pub fn work_dir_name(mut self, name: impl Into<String>) -> Self {
        self.work_dir_name = Some(name.into());
        self
    }

    /// Overrides the output filename prefix.
    ///
    /// Default: `python`
    pub fn product_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.product_prefix = Some(prefix.into());
        self
    }

    /// Overrides which top-level resource files are dropped.
    ///
    /// Default: `Description.plist`, `install_certificates.command`
    pub fn excluded_resources(mut self, names: Vec<String>) -> Self {
        self.excluded_resources = Some(names);
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `mpkg_path` or `output_directory` is missing.
    pub fn build(self) -> crate::packager::Result<Settings> {
        use crate::packager::error::Context;

        Ok(Settings::new(
            self.mpkg_path.context("mpkg_path is required")?,
            self.output_directory
                .context("output_directory is required")?,
            self.work_dir_name
                .unwrap_or_else(|| DEFAULT_WORK_DIR_NAME.to_string()),
            self.product_prefix
                .unwrap_or_else(|| DEFAULT_PRODUCT_PREFIX.to_string()),
            self.excluded_resources.unwrap_or_else(|| {
                DEFAULT_EXCLUDED_RESOURCES
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_bundle_and_work_paths() {
        let settings = SettingsBuilder::new()
            .mpkg_path("/Volumes/Python/Python.mpkg")
            .output_directory("/tmp/out")
            .build()
            .unwrap();

        assert_eq!(
            settings.info_plist(),
            Path::new("/Volumes/Python/Python.mpkg/Contents/Info.plist")
        );
        assert_eq!(
            settings.packages_dir(),
            Path::new("/Volumes/Python/Python.mpkg/Contents/Packages")
        );
        assert_eq!(settings.work_dir(), Path::new("/tmp/out/temp"));
        assert_eq!(settings.excluded_resources().len(), 2);
    }

    #[test]
    fn output_file_name_matches_release_convention() {
        let settings = SettingsBuilder::new()
            .mpkg_path("Python.mpkg")
            .output_directory("out")
            .build()
            .unwrap();

        assert_eq!(
            settings.output_file_name("3.12.2", "14"),
            "python-3.12.2-macos14.pkg"
        );
        assert_eq!(
            settings.output_file("3.12.2", "14"),
            Path::new("out/python-3.12.2-macos14.pkg")
        );
    }

    #[test]
    fn missing_required_paths_fail() {
        assert!(SettingsBuilder::new().output_directory("out").build().is_err());
        assert!(SettingsBuilder::new().mpkg_path("Python.mpkg").build().is_err());
    }
}
