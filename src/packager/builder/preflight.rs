//! Pre-flight validation of the input bundle.

use crate::packager::{
    catalog::{SUB_PACKAGES, SubPackage},
    error::{Error, Result},
};
use std::path::{Path, PathBuf};

/// A catalog entry paired with its source package inside the mpkg.
#[derive(Debug, Clone)]
pub struct SourcePackage {
    /// Catalog entry
    pub package: &'static SubPackage,
    /// `<mpkg>/Contents/Packages/<Stem>-<version>.pkg`
    pub path: PathBuf,
}

/// Confirms every expected sub-package exists under `packages_dir`.
///
/// Checks in catalog order and stops at the first absence.
///
/// # Errors
///
/// [`Error::MissingInput`] naming the missing sub-package.
pub fn locate_sub_packages(packages_dir: &Path, version: &str) -> Result<Vec<SourcePackage>> {
    SUB_PACKAGES
        .iter()
        .map(|package| {
            let path = packages_dir.join(package.source_file_name(version));
            if path.exists() {
                log::debug!("Found {}", path.display());
                Ok(SourcePackage { package, path })
            } else {
                Err(Error::MissingInput { path })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populate(dir: &Path, version: &str, skip: Option<&str>) {
        for package in SUB_PACKAGES.iter() {
            if Some(package.stem) == skip {
                continue;
            }
            std::fs::create_dir_all(dir.join(package.source_file_name(version))).unwrap();
        }
    }

    #[test]
    fn finds_all_six() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path(), "3.12", None);

        let found = locate_sub_packages(dir.path(), "3.12").unwrap();
        assert_eq!(found.len(), 6);
        assert!(found[0].path.ends_with("PythonFramework-3.12.pkg"));
    }

    #[test]
    fn names_the_missing_package() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path(), "3.12", Some("PythonDocumentation"));

        let err = locate_sub_packages(dir.path(), "3.12").unwrap_err();
        assert!(err.to_string().contains("PythonDocumentation-3.12.pkg"));
    }

    #[test]
    fn version_mismatch_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path(), "3.11", None);

        assert!(locate_sub_packages(dir.path(), "3.12").is_err());
    }
}
