//! External tool detection.
//!
//! Resolves every binary the pipeline calls before any work starts, so a
//! missing toolchain is reported up front instead of half-way through.

use crate::packager::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Resolved paths of the packaging tools.
#[derive(Debug, Clone)]
pub struct Toolchain {
    sw_vers: PathBuf,
    tar: PathBuf,
    pkgbuild: PathBuf,
    pkgutil: PathBuf,
    productbuild: PathBuf,
}

fn locate(tool: &'static str) -> Result<PathBuf> {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool, path.display());
            Ok(path)
        }
        Err(source) => Err(Error::ToolNotFound { tool, source }),
    }
}

impl Toolchain {
    /// Looks up every tool on `PATH`.
    ///
    /// # Errors
    ///
    /// [`Error::ToolNotFound`] naming the first tool that is absent.
    pub fn detect() -> Result<Self> {
        Ok(Self {
            sw_vers: locate("sw_vers")?,
            tar: locate("tar")?,
            pkgbuild: locate("pkgbuild")?,
            pkgutil: locate("pkgutil")?,
            productbuild: locate("productbuild")?,
        })
    }

    /// OS version reporter.
    pub fn sw_vers(&self) -> &Path {
        &self.sw_vers
    }

    /// Archive extractor.
    pub fn tar(&self) -> &Path {
        &self.tar
    }

    /// Component package builder and manifest generator.
    pub fn pkgbuild(&self) -> &Path {
        &self.pkgbuild
    }

    /// Package expand/flatten tool.
    pub fn pkgutil(&self) -> &Path {
        &self.pkgutil
    }

    /// Distribution builder.
    pub fn productbuild(&self) -> &Path {
        &self.productbuild
    }
}
