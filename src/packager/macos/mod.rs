//! macOS packaging stages.
//!
//! # Module Organization
//!
//! - `extract` - unpack sub-package archives and migrate scripts
//! - `component` - pkgbuild/pkgutil component package building
//! - `package_info` - relocation patch and synthetic `PackageInfo`
//! - `distribution` - distribution descriptor and shared resources
//! - `product` - final productbuild flatten
//! - `template` - Handlebars templates for generated XML

pub mod component;
pub mod distribution;
pub mod extract;
pub mod package_info;
pub mod product;
mod template;

use crate::packager::catalog::SubPackage;
use std::path::{Path, PathBuf};

/// Per-package area inside the working directory.
///
/// ```text
/// <work>/<Name>/extracted/        payload root
/// <work>/<Name>/Scripts/          postinstall
/// <work>/<Name>/component.plist   pkgbuild --analyze output
/// <work>/<Name>.pkg               rebuilt package
/// ```
#[derive(Debug, Clone)]
pub struct PackageWorkspace {
    work_dir: PathBuf,
    name: String,
}

impl PackageWorkspace {
    /// Workspace for the package called `name` under `work_dir`.
    pub fn new(work_dir: impl AsRef<Path>, name: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.as_ref().to_path_buf(),
            name: name.into(),
        }
    }

    /// Workspace for a catalog entry.
    pub fn for_package(work_dir: &Path, package: &SubPackage) -> Self {
        Self::new(work_dir, package.name)
    }

    /// The shared working directory.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// `<work>/<Name>`
    pub fn root(&self) -> PathBuf {
        self.work_dir.join(&self.name)
    }

    /// `<work>/<Name>/extracted`
    pub fn extracted(&self) -> PathBuf {
        self.root().join("extracted")
    }

    /// `<work>/<Name>/Scripts`
    pub fn scripts(&self) -> PathBuf {
        self.root().join("Scripts")
    }

    /// `<work>/<Name>/component.plist`
    pub fn component_plist(&self) -> PathBuf {
        self.root().join("component.plist")
    }

    /// `<work>/<Name>.pkg`
    pub fn output_package(&self) -> PathBuf {
        self.work_dir.join(format!("{}.pkg", self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_work_tree() {
        let ws = PackageWorkspace::new("/out/temp", "Python_Framework");
        assert_eq!(ws.root(), Path::new("/out/temp/Python_Framework"));
        assert_eq!(
            ws.extracted(),
            Path::new("/out/temp/Python_Framework/extracted")
        );
        assert_eq!(ws.scripts(), Path::new("/out/temp/Python_Framework/Scripts"));
        assert_eq!(
            ws.component_plist(),
            Path::new("/out/temp/Python_Framework/component.plist")
        );
        assert_eq!(
            ws.output_package(),
            Path::new("/out/temp/Python_Framework.pkg")
        );
    }
}
