//! Core Settings struct and path derivations.

use std::path::{Path, PathBuf};

/// Main settings for a conversion run.
///
/// # Examples
///
/// ```no_run
/// use python_flat_installer::packager::SettingsBuilder;
///
/// # fn example() -> python_flat_installer::packager::Result<()> {
/// let settings = SettingsBuilder::new()
///     .mpkg_path("/Volumes/Python/Python.mpkg")
///     .output_directory("/tmp/out")
///     .build()?;
/// assert!(settings.work_dir().ends_with("temp"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    mpkg_path: PathBuf,
    output_directory: PathBuf,
    work_dir_name: String,
    product_prefix: String,
    excluded_resources: Vec<String>,
}

impl Settings {
    pub(super) fn new(
        mpkg_path: PathBuf,
        output_directory: PathBuf,
        work_dir_name: String,
        product_prefix: String,
        excluded_resources: Vec<String>,
    ) -> Self {
        Self {
            mpkg_path,
            output_directory,
            work_dir_name,
            product_prefix,
            excluded_resources,
        }
    }

    /// Returns the input mpkg bundle path.
    pub fn mpkg_path(&self) -> &Path {
        &self.mpkg_path
    }

    /// Returns the output directory.
    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// `<mpkg>/Contents/Info.plist`
    pub fn info_plist(&self) -> PathBuf {
        self.mpkg_path.join("Contents").join("Info.plist")
    }

    /// `<mpkg>/Contents/Packages`
    pub fn packages_dir(&self) -> PathBuf {
        self.mpkg_path.join("Contents").join("Packages")
    }

    /// `<mpkg>/Contents/Resources`
    pub fn resources_dir(&self) -> PathBuf {
        self.mpkg_path.join("Contents").join("Resources")
    }

    /// Ephemeral working directory inside the output directory.
    pub fn work_dir(&self) -> PathBuf {
        self.output_directory.join(&self.work_dir_name)
    }

    /// Top-level resource names left out of the flat package.
    pub fn excluded_resources(&self) -> &[String] {
        &self.excluded_resources
    }

    /// Filename of the produced flat package.
    ///
    /// Format: `{prefix}-{extended_version}-macos{os_major}.pkg`
    pub fn output_file_name(&self, extended_version: &str, os_major: &str) -> String {
        format!(
            "{}-{}-macos{}.pkg",
            self.product_prefix, extended_version, os_major
        )
    }

    /// Full path of the produced flat package.
    pub fn output_file(&self, extended_version: &str, os_major: &str) -> PathBuf {
        self.output_directory
            .join(self.output_file_name(extended_version, os_major))
    }
}
