//! Sub-package extraction.
//!
//! Unpacks each bundle-style sub-package's `Contents/Archive.pax.gz` into the
//! working directory and moves a legacy `postflight` script into the
//! `Scripts/postinstall` slot that pkgbuild expects.

use super::PackageWorkspace;
use crate::metadata::VersionContext;
use crate::packager::{
    Toolchain,
    catalog::{PackageKind, SubPackage, render_catalog_string},
    error::{Error, ErrorExt, Result},
    process::ToolCommand,
    utils::fs,
};
use std::path::{Path, PathBuf};

/// `<pkg>/Contents/Archive.pax.gz`
pub fn archive_path(source_pkg: &Path) -> PathBuf {
    source_pkg.join("Contents").join("Archive.pax.gz")
}

/// `<pkg>/Contents/Resources/postflight`
pub fn postflight_path(source_pkg: &Path) -> PathBuf {
    source_pkg
        .join("Contents")
        .join("Resources")
        .join("postflight")
}

/// Extracts one sub-package into its workspace.
///
/// # Process
/// 1. Create an empty `extracted/` directory
/// 2. `tar -xf Archive.pax.gz -C extracted/` (required for payload packages)
/// 3. Copy `postflight` to `Scripts/postinstall`, mode 0755, when the package carries one
/// 4. Nest the payload under its version-qualified folder when configured
pub async fn extract_package(
    toolchain: &Toolchain,
    package: &SubPackage,
    source_pkg: &Path,
    workspace: &PackageWorkspace,
    ctx: &VersionContext,
) -> Result<()> {
    let extracted = workspace.extracted();
    fs::create_dir_all(&extracted, true).await?;

    let archive = archive_path(source_pkg);
    if archive.is_file() {
        log::info!("Extracting {}", package.source_file_name(&ctx.version));
        ToolCommand::new(toolchain.tar())
            .arg("-xf")
            .arg(&archive)
            .arg("-C")
            .arg(&extracted)
            .run()
            .await?;
    } else if package.has_payload() {
        return Err(Error::MissingInput { path: archive });
    } else {
        log::debug!("{} has no payload archive", package.name);
    }

    if package.legacy_postflight {
        migrate_postflight(source_pkg, &workspace.scripts()).await?;
    }

    if let PackageKind::Payload {
        nest_under: Some(folder),
        ..
    } = package.kind
    {
        let folder = render_catalog_string(folder, ctx)?;
        nest_payload(workspace, &folder).await?;
    }

    Ok(())
}

/// Copies the legacy `postflight` script to `<scripts>/postinstall`.
pub async fn migrate_postflight(source_pkg: &Path, scripts_dir: &Path) -> Result<PathBuf> {
    let postflight = postflight_path(source_pkg);
    if !postflight.is_file() {
        return Err(Error::MissingInput { path: postflight });
    }

    let postinstall = scripts_dir.join("postinstall");
    fs::copy_file(&postflight, &postinstall).await?;
    fs::set_executable(&postinstall).await?;

    log::debug!(
        "Migrated {} -> {}",
        postflight.display(),
        postinstall.display()
    );
    Ok(postinstall)
}

/// Moves the contents of `extracted/` to `extracted/<folder>/`.
async fn nest_payload(workspace: &PackageWorkspace, folder: &str) -> Result<()> {
    let extracted = workspace.extracted();
    let staging = workspace.root().join(folder);

    fs::remove_dir_all(&staging).await?;
    tokio::fs::rename(&extracted, &staging)
        .await
        .fs_context("moving extracted payload aside", &extracted)?;
    fs::create_dir_all(&extracted, false).await?;

    let nested = extracted.join(folder);
    tokio::fs::rename(&staging, &nested)
        .await
        .fs_context("nesting extracted payload", &nested)?;

    log::debug!("Nested payload under {}", nested.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn nests_payload_under_folder() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = PackageWorkspace::new(dir.path(), "Python_Applications");
        std::fs::create_dir_all(workspace.extracted().join("IDLE.app")).unwrap();
        std::fs::write(workspace.extracted().join("ReadMe.rtf"), b"x").unwrap();

        nest_payload(&workspace, "Python 3.12").await.unwrap();

        let nested = workspace.extracted().join("Python 3.12");
        assert!(nested.join("IDLE.app").is_dir());
        assert!(nested.join("ReadMe.rtf").is_file());
        assert!(!workspace.extracted().join("ReadMe.rtf").exists());
        assert!(!workspace.root().join("Python 3.12").exists());
    }

    #[tokio::test]
    async fn migrates_postflight_as_executable_postinstall() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("PythonInstallPip-3.12.pkg");
        std::fs::create_dir_all(source.join("Contents").join("Resources")).unwrap();
        std::fs::write(postflight_path(&source), b"#!/bin/sh\nexit 0\n").unwrap();
        let scripts = dir.path().join("work").join("Scripts");

        let postinstall = migrate_postflight(&source, &scripts).await.unwrap();

        assert_eq!(postinstall, scripts.join("postinstall"));
        assert_eq!(std::fs::read(&postinstall).unwrap(), b"#!/bin/sh\nexit 0\n");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&postinstall).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[tokio::test]
    async fn missing_postflight_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("PythonFramework-3.12.pkg");

        let err = migrate_postflight(&source, &dir.path().join("Scripts"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("postflight"));
    }
}
