//! Final flat package creation with productbuild.

use crate::packager::{
    Toolchain,
    error::Result,
    process::ToolCommand,
    utils::fs,
};
use std::path::Path;

/// Combines the distribution, resources and rebuilt packages into `output`.
///
/// Any previous file at `output` is removed first. Package references in the
/// distribution are resolved against `work_dir`.
pub async fn productbuild(
    toolchain: &Toolchain,
    work_dir: &Path,
    distribution: &Path,
    resources: &Path,
    output: &Path,
) -> Result<()> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent, false).await?;
    }
    fs::remove_file(output).await?;

    ToolCommand::new(toolchain.productbuild())
        .arg("--distribution")
        .arg(distribution)
        .arg("--resources")
        .arg(resources)
        .arg("--package-path")
        .arg(work_dir)
        .arg(output)
        .current_dir(work_dir)
        .run()
        .await?;

    Ok(())
}
