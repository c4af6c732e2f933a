//! Handlebars templates for the generated XML documents.

/// `PackageInfo` for the script-only packages.
///
/// Fields: `identifier`, `build_version`.
pub const PACKAGE_INFO_TEMPLATE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<pkg-info overwrite-permissions="true" relocatable="false" identifier="{{identifier}}" postinstall-action="none" version="0" format-version="2" generator-version="InstallCmds-834 ({{build_version}})" auth="root">
    <bundle-version/>
    <upgrade-bundle/>
    <update-bundle/>
    <atomic-update-bundle/>
    <strict-identifier/>
    <relocate/>
    <scripts>
        <postinstall file="./postinstall"/>
    </scripts>
</pkg-info>"#;

/// Top-level `Distribution` document for productbuild.
///
/// Fields: `choices[]` with `identifier`, `title`, `description`,
/// `selection_attrs`, `install_kbytes`, `package_file`, and `bundles[]`
/// (`id`, `path`, `short_version`).
pub const DISTRIBUTION_TEMPLATE: &str = r#"<?xml version="1.0" encoding="utf-8" standalone="yes"?>
<installer-gui-script minSpecVersion="1">
    <title>Python</title>
    <background alignment="left" file="background.jpg" mime-type="image/png"/>
    <welcome file="Welcome.rtf" mime-type="text/richtext"/>
    <readme file="ReadMe.rtf" mime-type="text/richtext"/>
    <license file="License.rtf" mime-type="text/richtext"/>
    <conclusion file="Conclusion.rtf" mime-type="text/richtext"/>
    <options customize="allow" require-scripts="false" rootVolumeOnly="true" hostArchitectures="arm64,x86_64"/>
    <choices-outline>
{{#each choices}}
        <line choice="{{identifier}}"/>
{{/each}}
    </choices-outline>
    <choice id="default"/>
{{#each choices}}
    <choice id="{{identifier}}" visible="true"{{selection_attrs}} title="{{title}}" description="{{description}}">
        <pkg-ref id="{{identifier}}"/>
    </choice>
{{/each}}
{{#each choices}}
    <pkg-ref id="{{identifier}}" version="0" auth="Root" onConclusion="none" installKBytes="{{install_kbytes}}">#{{package_file}}</pkg-ref>
{{/each}}
{{#each choices}}
    <pkg-ref id="{{identifier}}">
{{#if bundles}}
        <bundle-version>
{{#each bundles}}
            <bundle CFBundleShortVersionString="{{short_version}}" CFBundleVersion="{{short_version}}" id="{{id}}" path="{{path}}"/>
{{/each}}
        </bundle-version>
{{else}}
        <bundle-version/>
{{/if}}
    </pkg-ref>
{{/each}}
</installer-gui-script>
"#;
