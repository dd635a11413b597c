use serde::{Deserialize, Serialize};

/// Descriptor of a filesystem-backed HTML template bundle, persisted as the
/// bundle's `config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateInfo {
    /// Directory name of the bundle; always taken from the directory on read.
    pub name: String,
    #[serde(rename = "type")]
    pub template_type: String,
    pub description: String,
    /// File name of the main HTML document inside the bundle.
    pub main: String,
    pub publisher: String,
    pub icon: String,
}

/// What the template editor receives for one bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateView {
    pub template_info: TemplateInfo,
    pub template_html: String,
    /// Protected bundles shipped with the platform; their metadata is blanked.
    pub is_system: bool,
}
