//! Pipeline orchestration.
//!
//! This module provides the [`Flattener`] that runs the conversion stages in
//! order. Every stage either completes or aborts the run; nothing is retried
//! and a failed run leaves its working directory behind for inspection.

use super::{
    checksum::calculate_sha256,
    preflight::{SourcePackage, locate_sub_packages},
    tool_detection::Toolchain,
};
use crate::metadata::{self, VersionContext};
use crate::packager::{
    Result, Settings,
    error::ErrorExt,
    macos::{PackageWorkspace, component, distribution, extract, product},
    utils::fs,
};
use std::path::PathBuf;

/// Receives human-readable progress as the pipeline advances.
pub trait ProgressReporter {
    /// A new stage begins.
    fn stage(&self, message: &str);

    /// A step within the current stage.
    fn step(&self, message: &str);
}

/// Discards all progress.
impl ProgressReporter for () {
    fn stage(&self, _message: &str) {}
    fn step(&self, _message: &str) {}
}

/// The produced flat package.
#[derive(Debug, Clone)]
pub struct FlatPackage {
    /// Output file
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Hex SHA-256
    pub checksum: String,
}

/// Converts one mpkg into one flat package.
///
/// # Examples
///
/// ```no_run
/// use python_flat_installer::packager::{Flattener, SettingsBuilder};
///
/// # async fn example() -> python_flat_installer::packager::Result<()> {
/// let settings = SettingsBuilder::new()
///     .mpkg_path("Python.mpkg")
///     .output_directory("out")
///     .build()?;
/// let flattener = Flattener::new(settings)?;
/// let versions = flattener.discover_versions().await?;
/// let package = flattener.convert(&versions, &()).await?;
/// println!("{}", package.path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Flattener {
    settings: Settings,
    toolchain: Toolchain,
}

impl Flattener {
    /// Creates a flattener, resolving the packaging tools on `PATH`.
    pub fn new(settings: Settings) -> Result<Self> {
        let toolchain = Toolchain::detect()?;
        Ok(Self::with_toolchain(settings, toolchain))
    }

    /// Creates a flattener with an already resolved toolchain.
    pub fn with_toolchain(settings: Settings, toolchain: Toolchain) -> Self {
        Self {
            settings,
            toolchain,
        }
    }

    /// Returns the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Reads bundle and host versions.
    pub async fn discover_versions(&self) -> Result<VersionContext> {
        let bundle = metadata::read_bundle_version(&self.settings.info_plist())?;
        let host = metadata::read_host_info(&self.toolchain).await?;
        Ok(VersionContext::new(bundle, host))
    }

    /// Runs every stage after metadata discovery.
    pub async fn convert(
        &self,
        ctx: &VersionContext,
        progress: &dyn ProgressReporter,
    ) -> Result<FlatPackage> {
        progress.stage("Verifying that all files exist...");
        let sources = locate_sub_packages(&self.settings.packages_dir(), &ctx.version)?;

        progress.stage("Creating temporary folders...");
        let work_dir = self.settings.work_dir();
        fs::create_dir_all(&work_dir, true).await?;

        for source in &sources {
            progress.step(&format!(
                "Extracting {}...",
                source.package.source_file_name(&ctx.version)
            ));
            let workspace = PackageWorkspace::for_package(&work_dir, source.package);
            extract::extract_package(&self.toolchain, source.package, &source.path, &workspace, ctx)
                .await?;
        }

        let (payload, scripts_only): (Vec<&SourcePackage>, Vec<&SourcePackage>) =
            sources.iter().partition(|s| s.package.has_payload());

        for source in &payload {
            progress.step(&format!(
                "Creating component plist for {}...",
                source.package.source_file_name(&ctx.version)
            ));
            let workspace = PackageWorkspace::for_package(&work_dir, source.package);
            component::analyze(&self.toolchain, &workspace).await?;
        }

        for source in &payload {
            progress.step(&format!("Creating {}...", source.package.package_file_name()));
            let workspace = PackageWorkspace::for_package(&work_dir, source.package);
            component::build_payload_package(&self.toolchain, source.package, &workspace, ctx)
                .await?;
        }

        for source in &scripts_only {
            progress.step(&format!("Creating {}...", source.package.package_file_name()));
            let workspace = PackageWorkspace::for_package(&work_dir, source.package);
            component::build_script_package(&self.toolchain, source.package, &workspace, ctx)
                .await?;
        }

        progress.stage("Copying resources...");
        let resources = distribution::copy_resources(&self.settings).await?;
        let distribution_file = distribution::write_distribution(&work_dir, ctx).await?;

        progress.stage("Creating flat pkg...");
        let output = self
            .settings
            .output_file(&ctx.extended_version, &ctx.os_major);
        product::productbuild(
            &self.toolchain,
            &work_dir,
            &distribution_file,
            &resources,
            &output,
        )
        .await?;

        let size = tokio::fs::metadata(&output)
            .await
            .fs_context("reading artifact metadata", &output)?
            .len();
        let checksum = calculate_sha256(&output).await?;

        progress.stage("Deleting temporary files...");
        fs::remove_dir_all(&work_dir).await?;

        log::info!("Created {} ({} bytes)", output.display(), size);

        Ok(FlatPackage {
            path: output,
            size,
            checksum,
        })
    }
}
