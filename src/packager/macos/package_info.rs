//! `PackageInfo` documents: the relocation patch and the synthetic variant.
//!
//! pkgbuild records every bundle it finds in the payload under `<relocate>`,
//! which makes Installer follow a bundle the user has moved instead of
//! installing to the package's install location. For the applications
//! package that is wrong, so the list is emptied before re-flattening.

use super::template::PACKAGE_INFO_TEMPLATE;
use crate::packager::error::{Error, ErrorExt, Result};
use handlebars::Handlebars;
use serde::Serialize;
use std::io::Cursor;
use std::path::Path;
use xml::{
    EmitterConfig, ParserConfig,
    reader::{EventReader, XmlEvent},
};

const RELOCATE: &str = "relocate";

/// Result of [`strip_relocation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchedDocument {
    /// Serialized document.
    pub xml: String,
    /// Number of elements removed from inside `<relocate>`.
    pub removed: usize,
}

/// Empties the `<relocate>` element that is a direct child of the root.
///
/// All other content, including element and attribute order, passes through.
/// The emptied element is written as `<relocate/>`. Running this on its own
/// output changes nothing.
pub fn strip_relocation(document: &str) -> Result<PatchedDocument> {
    let reader = EventReader::new_with_config(
        Cursor::new(document.as_bytes()),
        ParserConfig::new().ignore_comments(false),
    );
    let mut writer = EmitterConfig::new()
        .perform_indent(true)
        .indent_string("    ")
        .pad_self_closing(false)
        .create_writer(Vec::with_capacity(document.len()));

    let mut depth = 0usize;
    let mut skipping: Option<usize> = None;
    let mut removed = 0usize;

    for event in reader {
        let event = event?;
        match event {
            XmlEvent::EndDocument => break,
            XmlEvent::Whitespace(_) => continue,
            XmlEvent::StartElement { ref name, .. } => {
                depth += 1;
                if skipping.is_some() {
                    removed += 1;
                    continue;
                }
                if depth == 2 && name.local_name == RELOCATE {
                    skipping = Some(depth);
                }
            }
            XmlEvent::EndElement { .. } => {
                let closing = depth;
                depth = depth.saturating_sub(1);
                match skipping {
                    Some(level) if level == closing => skipping = None,
                    Some(_) => continue,
                    None => {}
                }
            }
            _ if skipping.is_some() => continue,
            _ => {}
        }

        if let Some(event) = event.as_writer_event() {
            writer.write(event)?;
        }
    }

    let mut xml = String::from_utf8(writer.into_inner())
        .map_err(|e| Error::GenericError(format!("patched PackageInfo is not UTF-8: {e}")))?;
    xml.push('\n');

    Ok(PatchedDocument { xml, removed })
}

/// Applies [`strip_relocation`] to a `PackageInfo` file in place.
pub async fn patch_package_info(path: &Path) -> Result<usize> {
    let original = tokio::fs::read_to_string(path)
        .await
        .fs_context("reading PackageInfo", path)?;

    let patched = strip_relocation(&original)?;
    if patched.removed == 0 {
        log::debug!("No relocation entries in {}", path.display());
    } else {
        log::debug!(
            "Removed {} relocation entries from {}",
            patched.removed,
            path.display()
        );
    }

    tokio::fs::write(path, patched.xml)
        .await
        .fs_context("writing PackageInfo", path)?;

    Ok(patched.removed)
}

#[derive(Serialize)]
struct PackageInfoData<'a> {
    identifier: &'a str,
    build_version: &'a str,
}

/// Renders the `PackageInfo` of a script-only package.
pub fn render_script_package_info(identifier: &str, build_version: &str) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .render_template(
            PACKAGE_INFO_TEMPLATE,
            &PackageInfoData {
                identifier,
                build_version,
            },
        )
        .map_err(|e| Error::Template(format!("failed to render PackageInfo: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PKGBUILD_OUTPUT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<pkg-info overwrite-permissions="true" relocatable="false" identifier="org.python.Python.PythonApplications-3.12" postinstall-action="none" version="0" format-version="2" generator-version="InstallCmds-834 (23A344)" install-location="/Applications" auth="root">
    <payload numberOfFiles="42" installKBytes="614"/>
    <bundle path="./Python 3.12/IDLE.app" id="org.python.IDLE" CFBundleShortVersionString="3.12.2" CFBundleVersion="3.12.2"/>
    <bundle path="./Python 3.12/Python Launcher.app" id="org.python.PythonLauncher" CFBundleShortVersionString="3.12.2" CFBundleVersion="3.12.2"/>
    <bundle-version>
        <bundle id="org.python.IDLE"/>
        <bundle id="org.python.PythonLauncher"/>
    </bundle-version>
    <upgrade-bundle>
        <bundle id="org.python.IDLE"/>
        <bundle id="org.python.PythonLauncher"/>
    </upgrade-bundle>
    <update-bundle/>
    <atomic-update-bundle/>
    <strict-identifier>
        <bundle id="org.python.IDLE"/>
        <bundle id="org.python.PythonLauncher"/>
    </strict-identifier>
    <relocate>
        <bundle id="org.python.IDLE"/>
        <bundle id="org.python.PythonLauncher"/>
    </relocate>
</pkg-info>
"#;

    fn relocate_section(xml: &str) -> &str {
        let start = xml.find("<relocate").unwrap();
        &xml[start..]
    }

    #[test]
    fn empties_relocate_block() {
        let patched = strip_relocation(PKGBUILD_OUTPUT).unwrap();

        assert_eq!(patched.removed, 2);
        assert!(patched.xml.contains("<relocate/>"));
        assert!(!patched.xml.contains("<relocate>"));
        assert!(!patched.xml.contains("</relocate>"));
        assert!(relocate_section(&patched.xml).starts_with("<relocate/>\n</pkg-info>"));
    }

    #[test]
    fn keeps_other_bundle_lists() {
        let patched = strip_relocation(PKGBUILD_OUTPUT).unwrap();

        assert_eq!(patched.xml.matches("<bundle id=\"org.python.IDLE\"/>").count(), 3);
        assert!(patched.xml.contains("install-location=\"/Applications\""));
        assert!(patched.xml.contains("<payload numberOfFiles=\"42\" installKBytes=\"614\"/>"));
        let upgrade = patched.xml.find("<upgrade-bundle>").unwrap();
        let strict = patched.xml.find("<strict-identifier>").unwrap();
        let relocate = patched.xml.find("<relocate/>").unwrap();
        assert!(upgrade < strict && strict < relocate);
    }

    #[test]
    fn attribute_order_is_preserved() {
        let patched = strip_relocation(PKGBUILD_OUTPUT).unwrap();
        assert!(patched.xml.contains(
            "<pkg-info overwrite-permissions=\"true\" relocatable=\"false\" identifier="
        ));
    }

    #[test]
    fn repatching_is_stable() {
        let once = strip_relocation(PKGBUILD_OUTPUT).unwrap();
        let twice = strip_relocation(&once.xml).unwrap();

        assert_eq!(twice.removed, 0);
        assert_eq!(once.xml, twice.xml);
    }

    #[test]
    fn nested_relocate_elements_are_left_alone() {
        let doc = r#"<pkg-info><scripts><relocate><bundle id="x"/></relocate></scripts></pkg-info>"#;
        let patched = strip_relocation(doc).unwrap();
        assert_eq!(patched.removed, 0);
        assert!(patched.xml.contains("<bundle id=\"x\"/>"));
    }

    #[test]
    fn document_without_relocate_passes_through() {
        let doc = r#"<?xml version="1.0" encoding="utf-8"?><pkg-info auth="root"><payload/></pkg-info>"#;
        let patched = strip_relocation(doc).unwrap();
        assert_eq!(patched.removed, 0);
        assert!(patched.xml.contains("<payload/>"));
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(matches!(
            strip_relocation("<pkg-info><relocate></pkg-info>"),
            Err(Error::XmlRead(_))
        ));
    }

    #[tokio::test]
    async fn patches_file_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("PackageInfo");
        std::fs::write(&path, PKGBUILD_OUTPUT).unwrap();

        let removed = patch_package_info(&path).await.unwrap();

        assert_eq!(removed, 2);
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("<relocate/>"));
    }

    #[test]
    fn script_package_info_interpolates_identifier_and_build() {
        let xml =
            render_script_package_info("org.python.Python.PythonInstallPip-3.12", "23A344")
                .unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<pkg-info "));
        assert!(xml.contains("identifier=\"org.python.Python.PythonInstallPip-3.12\""));
        assert!(xml.contains("generator-version=\"InstallCmds-834 (23A344)\""));
        assert!(xml.contains("relocatable=\"false\""));
        assert!(xml.contains("overwrite-permissions=\"true\""));
        assert_eq!(xml.matches("<postinstall file=\"./postinstall\"/>").count(), 1);
        assert!(xml.ends_with("</pkg-info>"));
    }
}
