//! # Form Manager
//!
//! Ties the repositories, the style archive and the archive cipher together.
//! Everything here is synchronous; HTTP handlers run it on the blocking pool.
//! Archive export and import live in [`super::archive`] as further `impl`
//! blocks of [`FormManager`].

use super::defaults::build_default_record;
use crate::config::PluginEnvironment;
use crate::error::{FormError, Result};
use crate::repository::{
    related_identities, DataRepository, FormRepository, TableStyleRepository, TABLE_NAME_DATA,
};
use crate::services::forms::archive::cipher::ArchiveCipher;
use crate::services::styles::StyleArchive;
use chrono::Local;
use common::model::data::{DataInfo, METADATA_ATTRIBUTES};
use common::model::entity::Value;
use common::model::form::FormInfo;
use common::model::style::{InputStyleRule, InputType, TableStyle, ValidateType};
use log::info;

/// Page size of the record list when a form does not set one.
pub const DEFAULT_PAGE_SIZE: i64 = 30;

pub struct FormManager<'a> {
    pub(crate) forms: &'a dyn FormRepository,
    pub(crate) data: &'a dyn DataRepository,
    pub(crate) styles: &'a dyn TableStyleRepository,
    pub(crate) style_archive: &'a dyn StyleArchive,
    pub(crate) environment: &'a dyn PluginEnvironment,
    pub(crate) cipher: &'a ArchiveCipher,
}

impl<'a> FormManager<'a> {
    pub fn new(
        forms: &'a dyn FormRepository,
        data: &'a dyn DataRepository,
        styles: &'a dyn TableStyleRepository,
        style_archive: &'a dyn StyleArchive,
        environment: &'a dyn PluginEnvironment,
        cipher: &'a ArchiveCipher,
    ) -> Self {
        Self {
            forms,
            data,
            styles,
            style_archive,
            environment,
            cipher,
        }
    }

    pub fn get_form_info(&self, site_id: i64, form_id: i64) -> Result<FormInfo> {
        self.forms
            .get_form_info(site_id, form_id)?
            .ok_or_else(|| FormError::NotFound(format!("Form {}", form_id)))
    }

    /// Removes a form with its styles and records.
    pub fn delete(&self, site_id: i64, form_id: i64) -> Result<()> {
        if form_id <= 0 {
            return Ok(());
        }

        let form = self.get_form_info(site_id, form_id)?;
        self.styles
            .delete_all_styles(TABLE_NAME_DATA, &related_identities(form.id()))?;
        self.data.delete_by_form_id(form.id())?;
        self.forms.delete_form(site_id, form.id())?;
        info!("Deleted form {} ({}) of site {}", form.id(), form.title(), site_id);
        Ok(())
    }

    /// Field styles of the form, without the record metadata attributes.
    pub fn get_table_styles(&self, form_id: i64) -> Result<Vec<TableStyle>> {
        self.styles.get_table_styles(
            TABLE_NAME_DATA,
            &related_identities(form_id),
            METADATA_ATTRIBUTES,
        )
    }

    pub fn delete_table_style(&self, form_id: i64, attribute_name: &str) -> Result<()> {
        self.styles
            .delete_style(TABLE_NAME_DATA, form_id, attribute_name)
    }

    /// The stored record when `data_id` is positive, otherwise a new record
    /// pre-populated from the styles.
    pub fn get_data_info(
        &self,
        data_id: i64,
        form_id: i64,
        styles: &[TableStyle],
    ) -> Result<DataInfo> {
        if data_id > 0 {
            return self
                .data
                .get_data_info(data_id)?
                .ok_or_else(|| FormError::NotFound(format!("Record {}", data_id)));
        }
        Ok(build_default_record(form_id, styles))
    }

    pub fn get_page_size(form: &FormInfo) -> i64 {
        match form.page_size() {
            size if size > 0 => size,
            _ => DEFAULT_PAGE_SIZE,
        }
    }

    /// Gives a new form the name, mobile, e-mail and message fields.
    pub fn create_default_styles(&self, form: &FormInfo) -> Result<Vec<TableStyle>> {
        let identities = related_identities(form.id());
        let defaults = [
            (
                "Name",
                "Name",
                "Please enter your name",
                InputType::Text,
                ValidateType::Required,
            ),
            (
                "Mobile",
                "Mobile",
                "Please enter your mobile number",
                InputType::Text,
                ValidateType::Mobile,
            ),
            (
                "Email",
                "Email",
                "Please enter your e-mail address",
                InputType::Text,
                ValidateType::Email,
            ),
            (
                "Content",
                "Message",
                "Please enter your message",
                InputType::TextArea,
                ValidateType::Required,
            ),
        ];

        let mut styles = Vec::new();
        for (taxis, (name, display_name, help_text, input_type, rule)) in
            defaults.into_iter().enumerate()
        {
            let mut style = TableStyle {
                table_name: TABLE_NAME_DATA.to_string(),
                related_identity: identities[0],
                attribute_name: name.to_string(),
                taxis: taxis as i32 + 1,
                display_name: display_name.to_string(),
                help_text: help_text.to_string(),
                input_type,
                rules: vec![InputStyleRule::new(rule)],
                ..Default::default()
            };
            style.id = self.styles.insert_style(&identities, &style)?;
            styles.push(style);
        }
        Ok(styles)
    }

    /// Stores a submission. Values are matched to styles by attribute name;
    /// anything not backed by a style is dropped.
    pub fn submit(
        &self,
        form: &FormInfo,
        styles: &[TableStyle],
        values: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<DataInfo> {
        if form.is_closed() {
            return Err(FormError::Validation(format!(
                "Form {} is not accepting submissions",
                form.title()
            )));
        }

        let mut data = DataInfo::new(form.id());
        for style in styles {
            let posted = values
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(&style.attribute_name))
                .map(|(_, value)| value.clone());

            let value = match posted {
                Some(serde_json::Value::Null) | None => None,
                Some(serde_json::Value::String(s)) if s.trim().is_empty() => None,
                Some(serde_json::Value::Array(items)) if items.is_empty() => None,
                Some(value) => Some(value),
            };

            match value {
                Some(value) => {
                    let mut value = Value::from(value);
                    if style.input_type.is_multiple() {
                        if let Value::String(s) = value {
                            value = Value::List(vec![s]);
                        }
                    }
                    data.set(&style.attribute_name, value);
                }
                None if style.is_required() => {
                    let message = style
                        .rules
                        .iter()
                        .find(|r| r.rule_type == ValidateType::Required)
                        .map(|r| r.message.clone())
                        .filter(|m| !m.is_empty())
                        .unwrap_or_else(|| format!("{} is required", style.display_name));
                    return Err(FormError::Validation(message));
                }
                None => {}
            }
        }

        let id = self.data.insert_data(form, &data)?;
        data.set_id(id);
        info!("Stored record {} for form {}", id, form.id());
        Ok(data)
    }

    pub fn reply(&self, data_id: i64, content: &str) -> Result<DataInfo> {
        let mut data = self
            .data
            .get_data_info(data_id)?
            .ok_or_else(|| FormError::NotFound(format!("Record {}", data_id)))?;

        data.set_reply_content(content);
        data.set_is_replied(!content.is_empty());
        data.set_reply_date(Some(Local::now().naive_local()));
        self.data.update_data(&data)?;
        Ok(data)
    }
}
