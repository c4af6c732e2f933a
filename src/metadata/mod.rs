//! Version discovery from the mpkg's `Info.plist` and the host OS.
//!
//! Produces the [`VersionContext`] every later stage interpolates into
//! identifiers, install paths and the output filename.

use crate::packager::{
    Toolchain,
    error::{Error, Result},
    process::ToolCommand,
};
use serde::Serialize;
use std::path::Path;

/// Version information read from the bundle's `Info.plist`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleVersion {
    /// `IFMajorVersion.IFMinorVersion`, e.g. "3.12"
    pub major_minor: String,
    /// `CFBundleShortVersionString`, e.g. "3.12.2"
    pub extended: String,
}

/// Version information about the machine doing the conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    /// First component of `sw_vers -productVersion`, e.g. "14"
    pub os_major: String,
    /// `sw_vers -buildVersion`, e.g. "23A344"
    pub build: String,
}

/// Everything the pipeline needs to know about versions, fixed for the run.
///
/// Serializes with the field names the templates use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionContext {
    /// major.minor
    pub version: String,
    /// Full short version string
    pub extended_version: String,
    /// Host OS major version
    pub os_major: String,
    /// Host build identifier
    pub build_version: String,
}

impl VersionContext {
    /// Combines bundle and host information.
    pub fn new(bundle: BundleVersion, host: HostInfo) -> Self {
        Self {
            version: bundle.major_minor,
            extended_version: bundle.extended,
            os_major: host.os_major,
            build_version: host.build,
        }
    }
}

fn malformed(path: &Path, reason: impl Into<String>) -> Error {
    Error::MalformedMetadata {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// Reads an integer key, accepting numeric strings as `defaults read` would.
fn integer_key(dict: &plist::Dictionary, key: &str, path: &Path) -> Result<i64> {
    let value = dict
        .get(key)
        .ok_or_else(|| malformed(path, format!("missing key {key}")))?;

    if let Some(n) = value.as_signed_integer() {
        return Ok(n);
    }
    if let Some(s) = value.as_string() {
        return s
            .trim()
            .parse::<i64>()
            .map_err(|e| malformed(path, format!("{key} is not an integer: {e}")));
    }
    Err(malformed(path, format!("{key} is not an integer")))
}

/// Reads the bundle's version keys from `Info.plist`.
///
/// # Errors
///
/// - [`Error::MissingInput`] if the file does not exist
/// - [`Error::MalformedMetadata`] if it is not a plist dictionary or lacks a key
pub fn read_bundle_version(info_plist: &Path) -> Result<BundleVersion> {
    if !info_plist.is_file() {
        return Err(Error::MissingInput {
            path: info_plist.to_path_buf(),
        });
    }

    let value = plist::Value::from_file(info_plist)
        .map_err(|e| malformed(info_plist, e.to_string()))?;
    let dict = value
        .as_dictionary()
        .ok_or_else(|| malformed(info_plist, "top-level value is not a dictionary"))?;

    let major = integer_key(dict, "IFMajorVersion", info_plist)?;
    let minor = integer_key(dict, "IFMinorVersion", info_plist)?;

    let extended = dict
        .get("CFBundleShortVersionString")
        .and_then(|v| v.as_string())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| malformed(info_plist, "missing key CFBundleShortVersionString"))?;

    log::debug!(
        "Bundle reports version {}.{} ({})",
        major,
        minor,
        extended
    );

    Ok(BundleVersion {
        major_minor: format!("{major}.{minor}"),
        extended,
    })
}

/// Extracts the major component of a dotted OS version string.
pub fn os_major_version(product_version: &str) -> Option<&str> {
    product_version
        .trim()
        .split('.')
        .next()
        .filter(|major| !major.is_empty())
}

/// Queries `sw_vers` for the host OS major version and build identifier.
pub async fn read_host_info(toolchain: &Toolchain) -> Result<HostInfo> {
    let product = ToolCommand::new(toolchain.sw_vers())
        .arg("-productVersion")
        .run()
        .await?;
    let os_major = os_major_version(&product.stdout)
        .ok_or_else(|| {
            Error::GenericError(format!(
                "unexpected sw_vers product version: {:?}",
                product.stdout
            ))
        })?
        .to_string();

    let build = ToolCommand::new(toolchain.sw_vers())
        .arg("-buildVersion")
        .run()
        .await?
        .stdout
        .trim()
        .to_string();
    if build.is_empty() {
        return Err(Error::GenericError(
            "sw_vers reported an empty build version".into(),
        ));
    }

    Ok(HostInfo { os_major, build })
}
