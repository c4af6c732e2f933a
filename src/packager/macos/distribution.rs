//! Distribution descriptor and shared resources.
//!
//! The descriptor lists one choice per sub-package with the titles,
//! descriptions, default selections and size hints of the upstream mpkg.

use super::template::DISTRIBUTION_TEMPLATE;
use crate::metadata::VersionContext;
use crate::packager::{
    catalog::{SUB_PACKAGES, Selection, SubPackage, render_catalog_string},
    error::{Error, ErrorExt, Result},
    settings::Settings,
    utils::fs,
};
use handlebars::Handlebars;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct BundleData {
    id: &'static str,
    path: String,
    short_version: String,
}

#[derive(Serialize)]
struct ChoiceData {
    identifier: String,
    title: &'static str,
    description: String,
    selection_attrs: &'static str,
    install_kbytes: u64,
    package_file: String,
    bundles: Vec<BundleData>,
}

#[derive(Serialize)]
struct DistributionData {
    choices: Vec<ChoiceData>,
}

fn selection_attrs(selection: Selection) -> &'static str {
    match selection {
        Selection::Mandatory => r#" selected="true" enabled="false""#,
        Selection::PreSelected => r#" start_selected="true""#,
        Selection::Optional => "",
    }
}

fn choice_data(package: &SubPackage, ctx: &VersionContext) -> Result<ChoiceData> {
    let bundles = package
        .bundles
        .iter()
        .map(|bundle| {
            Ok(BundleData {
                id: bundle.id,
                path: render_catalog_string(bundle.path, ctx)?,
                short_version: ctx.extended_version.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ChoiceData {
        identifier: package.identifier(&ctx.version),
        title: package.title,
        description: render_catalog_string(package.description, ctx)?,
        selection_attrs: selection_attrs(package.selection),
        install_kbytes: package.install_kbytes,
        package_file: package.package_file_name(),
        bundles,
    })
}

/// Renders the `Distribution` document for all sub-packages.
pub fn render_distribution(ctx: &VersionContext) -> Result<String> {
    let choices = SUB_PACKAGES
        .iter()
        .map(|package| choice_data(package, ctx))
        .collect::<Result<Vec<_>>>()?;

    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars
        .register_template_string("Distribution", DISTRIBUTION_TEMPLATE)
        .map_err(|e| Error::Template(format!("failed to register Distribution template: {}", e)))?;

    handlebars
        .render("Distribution", &DistributionData { choices })
        .map_err(|e| Error::Template(format!("failed to render Distribution template: {}", e)))
}

/// Writes `Distribution` into the working directory.
pub async fn write_distribution(work_dir: &Path, ctx: &VersionContext) -> Result<PathBuf> {
    let path = work_dir.join("Distribution");
    let content = render_distribution(ctx)?;

    tokio::fs::write(&path, content)
        .await
        .fs_context("writing Distribution", &path)?;

    log::debug!("Wrote distribution descriptor: {}", path.display());
    Ok(path)
}

/// Copies the bundle's shared resources into the working directory,
/// leaving out the configured exclusions.
pub async fn copy_resources(settings: &Settings) -> Result<PathBuf> {
    let source = settings.resources_dir();
    let destination = settings.work_dir().join("Resources");

    fs::copy_dir_excluding(&source, &destination, settings.excluded_resources()).await?;

    for name in settings.excluded_resources() {
        if source.join(name).exists() {
            log::debug!("Excluded resource: {}", name);
        }
    }

    Ok(destination)
}
