//! Component package building with pkgbuild and pkgutil.

use super::{PackageWorkspace, package_info};
use crate::metadata::VersionContext;
use crate::packager::{
    Toolchain,
    catalog::{PackageKind, SubPackage, render_catalog_string},
    error::{Context, ErrorExt, Result},
    process::ToolCommand,
    utils::fs,
};
use std::path::{Path, PathBuf};

/// Generates `component.plist` for an extracted payload.
pub async fn analyze(toolchain: &Toolchain, workspace: &PackageWorkspace) -> Result<PathBuf> {
    let plist = workspace.component_plist();
    ToolCommand::new(toolchain.pkgbuild())
        .arg("--analyze")
        .arg("--root")
        .arg(workspace.extracted())
        .arg(&plist)
        .run()
        .await?;
    Ok(plist)
}

/// Builds a payload package into `<work>/<Name>.pkg`.
///
/// Packages flagged for the relocation patch are built to a temporary file,
/// expanded, patched and re-flattened. The per-package workspace is removed
/// once the package exists.
pub async fn build_payload_package(
    toolchain: &Toolchain,
    package: &SubPackage,
    workspace: &PackageWorkspace,
    ctx: &VersionContext,
) -> Result<PathBuf> {
    let PackageKind::Payload {
        install_location,
        patch_relocation,
        ..
    } = package.kind
    else {
        crate::bail!("{} has no payload to build", package.name);
    };

    let install_location = render_catalog_string(install_location, ctx)?;
    let output = workspace.output_package();

    if patch_relocation {
        let unpatched = workspace.work_dir().join(format!("{}_temp.pkg", package.name));
        let expanded = workspace
            .work_dir()
            .join(format!("{}_temp_extracted", package.name));
        pkgbuild(toolchain, package, workspace, ctx, &install_location, &unpatched).await?;
        repackage_without_relocation(toolchain, &unpatched, &expanded, &output)
            .await
            .with_context(|| format!("patching {}", package.package_file_name()))?;
    } else {
        pkgbuild(toolchain, package, workspace, ctx, &install_location, &output).await?;
    }

    fs::remove_dir_all(&workspace.root()).await?;
    Ok(output)
}

async fn pkgbuild(
    toolchain: &Toolchain,
    package: &SubPackage,
    workspace: &PackageWorkspace,
    ctx: &VersionContext,
    install_location: &str,
    output: &Path,
) -> Result<()> {
    let mut command = ToolCommand::new(toolchain.pkgbuild())
        .arg("--root")
        .arg(workspace.extracted())
        .arg("--component-plist")
        .arg(workspace.component_plist())
        .arg("--identifier")
        .arg(package.identifier(&ctx.version))
        .arg("--install-location")
        .arg(install_location);

    let scripts = workspace.scripts();
    if scripts.is_dir() {
        command = command.arg("--scripts").arg(&scripts);
    }

    command.arg(output).run().await?;
    Ok(())
}

/// Expands `unpatched` into `expanded`, strips its relocation list, and
/// flattens the result to `output`.
async fn repackage_without_relocation(
    toolchain: &Toolchain,
    unpatched: &Path,
    expanded: &Path,
    output: &Path,
) -> Result<()> {
    fs::remove_dir_all(expanded).await?;

    ToolCommand::new(toolchain.pkgutil())
        .arg("--expand")
        .arg(unpatched)
        .arg(expanded)
        .run()
        .await?;

    package_info::patch_package_info(&expanded.join("PackageInfo")).await?;

    ToolCommand::new(toolchain.pkgutil())
        .arg("--flatten")
        .arg(expanded)
        .arg(output)
        .run()
        .await?;

    fs::remove_file(unpatched).await?;
    fs::remove_dir_all(expanded).await?;

    log::debug!("Rebuilt {} without relocation entries", output.display());
    Ok(())
}

/// Assembles a script-only package from a literal `PackageInfo` and its scripts.
pub async fn build_script_package(
    toolchain: &Toolchain,
    package: &SubPackage,
    workspace: &PackageWorkspace,
    ctx: &VersionContext,
) -> Result<PathBuf> {
    let staging = workspace.work_dir().join(format!("{}_temp", package.name));
    fs::create_dir_all(&staging, true).await?;

    let info = package_info::render_script_package_info(
        &package.identifier(&ctx.version),
        &ctx.build_version,
    )?;
    let info_path = staging.join("PackageInfo");
    tokio::fs::write(&info_path, info)
        .await
        .fs_context("writing PackageInfo", &info_path)?;

    fs::copy_dir(&workspace.scripts(), &staging.join("Scripts")).await?;

    let output = workspace.output_package();
    ToolCommand::new(toolchain.pkgutil())
        .arg("--flatten")
        .arg(&staging)
        .arg(&output)
        .run()
        .await?;

    fs::remove_dir_all(&staging).await?;
    fs::remove_dir_all(&workspace.root()).await?;
    Ok(output)
}
