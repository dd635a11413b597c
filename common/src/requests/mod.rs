use serde::Deserialize;

/// Query of the template list endpoint.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListTemplatesRequest {
    #[serde(default)]
    pub site_id: i64,
    #[serde(rename = "type")]
    pub template_type: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CloneTemplateRequest {
    #[serde(rename = "type")]
    pub template_type: String,
    pub original_name: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Replaces the main HTML file of the clone when present.
    pub template_html: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EditTemplateRequest {
    #[serde(rename = "type")]
    pub template_type: String,
    pub original_name: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FormRequest {
    pub site_id: i64,
    pub form_id: i64,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ColumnsRequest {
    pub site_id: i64,
    pub form_id: i64,
    /// Comma separated allow-list; the form's own list is used when absent.
    pub attribute_names: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ImportFormRequest {
    pub site_id: i64,
    /// Directory holding the extracted archive.
    pub directory: String,
    #[serde(default)]
    pub overwrite: bool,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ExportFormRequest {
    pub site_id: i64,
    pub form_id: i64,
    /// Directory the archive is written into; created when missing.
    pub directory: String,
}
