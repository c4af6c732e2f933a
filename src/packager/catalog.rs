//! The six sub-packages of the Python mpkg.
//!
//! The layout is fixed by the upstream installer, so this is a static table
//! rather than anything discovered at runtime. Entries are listed in the
//! order the distribution descriptor presents them.
//!
//! Strings containing `{{version}}` are Handlebars templates rendered with the
//! run's [`VersionContext`](crate::metadata::VersionContext) fields
//! (`version` is major.minor, `extended_version` the full short version).

use crate::metadata::VersionContext;
use crate::packager::error::{Error, Result};
use handlebars::Handlebars;

/// Renders a catalog string such as an install location or bundle path.
pub fn render_catalog_string(template: &str, ctx: &VersionContext) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars
        .render_template(template, ctx)
        .map_err(|e| Error::Template(format!("failed to render {template:?}: {e}")))
}

/// How a sub-package is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    /// Has a payload; rebuilt with `pkgbuild` from its extracted archive.
    Payload {
        /// Install location template.
        install_location: &'static str,
        /// Whether the built package gets the relocation patch.
        patch_relocation: bool,
        /// Folder (template) the extracted payload is nested under, if any.
        nest_under: Option<&'static str>,
    },
    /// Carries only a post-install script; assembled from a literal
    /// package-info document.
    ScriptOnly,
}

/// Whether a choice starts selected and whether the user may change that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Always installed, cannot be deselected.
    Mandatory,
    /// Selected by default, can be deselected.
    PreSelected,
    /// Not selected unless the user opts in through customization.
    Optional,
}

/// A bundle listed in a package's `bundle-version` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleRef {
    /// Bundle identifier.
    pub id: &'static str,
    /// Path template relative to the install location.
    pub path: &'static str,
}

/// Static description of one sub-package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubPackage {
    /// Stem of the source filename and identifier, e.g. `PythonFramework`.
    pub stem: &'static str,
    /// Name of the rebuilt package without extension, e.g. `Python_Framework`.
    pub name: &'static str,
    /// Payload or script-only.
    pub kind: PackageKind,
    /// Carries a legacy `postflight` script to be migrated to `postinstall`.
    pub legacy_postflight: bool,
    /// Choice title.
    pub title: &'static str,
    /// Choice description template.
    pub description: &'static str,
    /// Default selection.
    pub selection: Selection,
    /// Install-size hint in KiB.
    pub install_kbytes: u64,
    /// Bundles reported in the descriptor's `bundle-version` block.
    pub bundles: &'static [BundleRef],
}

impl SubPackage {
    /// `<Stem>-<major.minor>.pkg` inside the mpkg's Packages directory.
    pub fn source_file_name(&self, version: &str) -> String {
        format!("{}-{}.pkg", self.stem, version)
    }

    /// `org.python.Python.<Stem>-<major.minor>`
    pub fn identifier(&self, version: &str) -> String {
        format!("org.python.Python.{}-{}", self.stem, version)
    }

    /// `<Name>.pkg`
    pub fn package_file_name(&self) -> String {
        format!("{}.pkg", self.name)
    }

    /// Whether the package is rebuilt from a payload.
    pub fn has_payload(&self) -> bool {
        matches!(self.kind, PackageKind::Payload { .. })
    }
}

/// All sub-packages, in distribution order.
pub const SUB_PACKAGES: [SubPackage; 6] = [
    SubPackage {
        stem: "PythonFramework",
        name: "Python_Framework",
        kind: PackageKind::Payload {
            install_location: "/Library/Frameworks/Python.framework",
            patch_relocation: false,
            nest_under: None,
        },
        legacy_postflight: true,
        title: "Python Framework",
        description: "This package installs Python.framework, that is the python interpreter and the standard library.",
        selection: Selection::Mandatory,
        install_kbytes: 107932,
        bundles: &[BundleRef {
            id: "org.python.python",
            path: "Versions/{{version}}/Resources/Python.app",
        }],
    },
    SubPackage {
        stem: "PythonApplications",
        name: "Python_Applications",
        kind: PackageKind::Payload {
            install_location: "/Applications",
            patch_relocation: true,
            nest_under: Some("Python {{version}}"),
        },
        legacy_postflight: false,
        title: "GUI Applications",
        description: "This package installs IDLE (an interactive Python IDE), and Python Launcher.  It also installs a number of examples and demos.",
        selection: Selection::Optional,
        install_kbytes: 614,
        bundles: &[
            BundleRef {
                id: "org.python.PythonLauncher",
                path: "Python {{version}}/Python Launcher.app",
            },
            BundleRef {
                id: "org.python.IDLE",
                path: "Python {{version}}/IDLE.app",
            },
        ],
    },
    SubPackage {
        stem: "PythonUnixTools",
        name: "Python_Command_Line_Tools",
        kind: PackageKind::Payload {
            install_location: "/usr/local/bin",
            patch_relocation: false,
            nest_under: None,
        },
        legacy_postflight: false,
        title: "UNIX command-line tools",
        description: "This package installs the unix tools in /usr/local/bin for compatibility with older releases of Python. This package is not necessary to use Python.",
        selection: Selection::Optional,
        install_kbytes: 6,
        bundles: &[],
    },
    SubPackage {
        stem: "PythonDocumentation",
        name: "Python_Documentation",
        kind: PackageKind::Payload {
            install_location: "/Library/Frameworks/Python.framework/Versions/{{version}}/Resources/English.lproj/Documentation",
            patch_relocation: false,
            nest_under: None,
        },
        legacy_postflight: true,
        title: "Python Documentation",
        description: "This package installs the python documentation at a location that is useable for pydoc and IDLE.",
        selection: Selection::Optional,
        install_kbytes: 63711,
        bundles: &[],
    },
    SubPackage {
        stem: "PythonProfileChanges",
        name: "Python_Shell_Profile_Updater",
        kind: PackageKind::ScriptOnly,
        legacy_postflight: true,
        title: "Shell profile updater",
        description: "This packages updates your shell profile to make sure that the Python tools are found by your shell in preference of the system provided Python tools.  If you don't install this package you'll have to add '/Library/Frameworks/Python.framework/Versions/{{version}}/bin' to your PATH by hand.",
        selection: Selection::PreSelected,
        install_kbytes: 0,
        bundles: &[],
    },
    SubPackage {
        stem: "PythonInstallPip",
        name: "Python_Install_Pip",
        kind: PackageKind::ScriptOnly,
        legacy_postflight: true,
        title: "Install or upgrade pip",
        description: "This package installs (or upgrades from an earlier version) pip, a tool for installing and managing Python packages.",
        selection: Selection::PreSelected,
        install_kbytes: 0,
        bundles: &[],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_and_stems_are_unique() {
        let stems: HashSet<_> = SUB_PACKAGES.iter().map(|p| p.stem).collect();
        let names: HashSet<_> = SUB_PACKAGES.iter().map(|p| p.name).collect();
        assert_eq!(stems.len(), 6);
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn four_payload_packages_and_two_script_carriers() {
        let payload = SUB_PACKAGES.iter().filter(|p| p.has_payload()).count();
        assert_eq!(payload, 4);
        assert!(
            SUB_PACKAGES
                .iter()
                .filter(|p| !p.has_payload())
                .all(|p| p.legacy_postflight)
        );
    }

    #[test]
    fn only_applications_is_patched_and_nested() {
        let patched: Vec<_> = SUB_PACKAGES
            .iter()
            .filter(|p| {
                matches!(
                    p.kind,
                    PackageKind::Payload {
                        patch_relocation: true,
                        nest_under: Some(_),
                        ..
                    }
                )
            })
            .map(|p| p.name)
            .collect();
        assert_eq!(patched, ["Python_Applications"]);
    }

    #[test]
    fn identifiers_and_file_names_interpolate_version() {
        let framework = &SUB_PACKAGES[0];
        assert_eq!(
            framework.source_file_name("3.12"),
            "PythonFramework-3.12.pkg"
        );
        assert_eq!(
            framework.identifier("3.12"),
            "org.python.Python.PythonFramework-3.12"
        );
        assert_eq!(framework.package_file_name(), "Python_Framework.pkg");
    }

    #[test]
    fn install_locations_render_with_version() {
        let ctx = VersionContext {
            version: "3.12".into(),
            extended_version: "3.12.2".into(),
            os_major: "14".into(),
            build_version: "23A344".into(),
        };
        let PackageKind::Payload {
            install_location, ..
        } = SUB_PACKAGES[3].kind
        else {
            panic!("documentation package should carry a payload");
        };
        assert_eq!(
            render_catalog_string(install_location, &ctx).unwrap(),
            "/Library/Frameworks/Python.framework/Versions/3.12/Resources/English.lproj/Documentation"
        );
    }

    #[test]
    fn one_mandatory_two_preselected() {
        let count = |s: Selection| SUB_PACKAGES.iter().filter(|p| p.selection == s).count();
        assert_eq!(count(Selection::Mandatory), 1);
        assert_eq!(count(Selection::PreSelected), 2);
    }
}
