//! Form definitions.
//!
//! A [`FormInfo`] is an attribute bag with a handful of declared columns. Any
//! other attribute (notification toggles, mail addresses, ...) travels inside the
//! `ExtendValues` column as a JSON object, both in storage and in archives.

use crate::model::column::{DataType, Record, TableColumn};
use crate::model::entity::{Entity, Value};
use chrono::NaiveDateTime;

pub const ID: &str = "Id";
pub const GUID: &str = "Guid";
pub const CREATED_DATE: &str = "CreatedDate";
pub const LAST_MODIFIED_DATE: &str = "LastModifiedDate";
pub const SITE_ID: &str = "SiteId";
pub const CHANNEL_ID: &str = "ChannelId";
pub const CONTENT_ID: &str = "ContentId";
pub const TITLE: &str = "Title";
pub const DESCRIPTION: &str = "Description";
pub const TAXIS: &str = "Taxis";
pub const IS_REPLY: &str = "IsReply";
pub const LIST_ATTRIBUTE_NAMES: &str = "ListAttributeNames";
pub const PAGE_SIZE: &str = "PageSize";
pub const IS_CLOSED: &str = "IsClosed";
pub const IS_CAPTCHA: &str = "IsCaptcha";
pub const IS_TIMEOUT: &str = "IsTimeout";
pub const TIME_TO_START: &str = "TimeToStart";
pub const TIME_TO_END: &str = "TimeToEnd";
pub const EXTEND_VALUES: &str = "ExtendValues";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInfo {
    entity: Entity,
}

impl Record for FormInfo {
    const TABLE_COLUMNS: &'static [TableColumn] = &[
        TableColumn::new(ID, DataType::Integer),
        TableColumn::new(GUID, DataType::VarChar),
        TableColumn::new(CREATED_DATE, DataType::DateTime),
        TableColumn::new(LAST_MODIFIED_DATE, DataType::DateTime),
        TableColumn::new(SITE_ID, DataType::Integer),
        TableColumn::new(CHANNEL_ID, DataType::Integer),
        TableColumn::new(CONTENT_ID, DataType::Integer),
        TableColumn::new(TITLE, DataType::VarChar),
        TableColumn::new(DESCRIPTION, DataType::Text),
        TableColumn::new(TAXIS, DataType::Integer),
        TableColumn::new(IS_REPLY, DataType::Boolean),
        TableColumn::new(LIST_ATTRIBUTE_NAMES, DataType::VarChar),
        TableColumn::new(PAGE_SIZE, DataType::Integer),
        TableColumn::new(IS_CLOSED, DataType::Boolean),
        TableColumn::new(IS_CAPTCHA, DataType::Boolean),
        TableColumn::new(IS_TIMEOUT, DataType::Boolean),
        TableColumn::new(TIME_TO_START, DataType::DateTime),
        TableColumn::new(TIME_TO_END, DataType::DateTime),
        TableColumn::new(EXTEND_VALUES, DataType::Text),
    ];

    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn column_value(&self, attribute_name: &str) -> Value {
        if attribute_name.eq_ignore_ascii_case(EXTEND_VALUES) {
            let extend = self.extend_values();
            return if extend == "{}" {
                Value::Null
            } else {
                Value::String(extend)
            };
        }
        self.entity
            .get(attribute_name)
            .cloned()
            .unwrap_or(Value::Null)
    }

    fn set_column_value(&mut self, attribute_name: &str, value: Value) {
        if attribute_name.eq_ignore_ascii_case(EXTEND_VALUES) {
            if let Value::String(json) = value {
                self.set_extend_values(&json);
            }
            return;
        }
        self.entity.set(attribute_name, value);
    }
}

impl FormInfo {
    pub fn new(site_id: i64, title: &str) -> Self {
        let mut info = Self::default();
        info.set_site_id(site_id);
        info.set_title(title);
        info
    }

    /// 0 until the form has been inserted.
    pub fn id(&self) -> i64 {
        self.entity.get_i64(ID)
    }

    pub fn set_id(&mut self, id: i64) {
        self.entity.set(ID, id);
    }

    pub fn guid(&self) -> String {
        self.entity.get_string(GUID)
    }

    pub fn site_id(&self) -> i64 {
        self.entity.get_i64(SITE_ID)
    }

    pub fn set_site_id(&mut self, site_id: i64) {
        self.entity.set(SITE_ID, site_id);
    }

    pub fn title(&self) -> String {
        self.entity.get_string(TITLE)
    }

    pub fn set_title(&mut self, title: &str) {
        self.entity.set(TITLE, title);
    }

    pub fn description(&self) -> String {
        self.entity.get_string(DESCRIPTION)
    }

    pub fn is_reply(&self) -> bool {
        self.entity.get_bool(IS_REPLY)
    }

    pub fn is_closed(&self) -> bool {
        self.entity.get_bool(IS_CLOSED)
    }

    pub fn page_size(&self) -> i64 {
        self.entity.get_i64(PAGE_SIZE)
    }

    pub fn list_attribute_names(&self) -> String {
        self.entity.get_string(LIST_ATTRIBUTE_NAMES)
    }

    pub fn created_date(&self) -> Option<NaiveDateTime> {
        self.entity.get_date_time(CREATED_DATE)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entity.get(name)
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.entity.set(name, value);
    }

    /// JSON object holding every attribute that is not a declared column.
    pub fn extend_values(&self) -> String {
        let map: serde_json::Map<String, serde_json::Value> = self
            .entity
            .iter()
            .filter(|(name, _)| !Self::is_table_column(name))
            .map(|(name, value)| (name.to_string(), serde_json::Value::from(value)))
            .collect();
        serde_json::Value::Object(map).to_string()
    }

    /// Merges a JSON object into the attribute bag. Anything that is not a JSON
    /// object is ignored.
    pub fn set_extend_values(&mut self, json: &str) {
        if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(json) {
            for (name, value) in map {
                if !Self::is_table_column(&name) {
                    self.entity.set(&name, Value::from(value));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_values_carry_undeclared_settings() {
        let mut form = FormInfo::new(1, "Contact");
        form.set("IsAdministratorMailNotify", true);
        form.set("AdministratorMailNotifyAddress", "admin@example.com");

        let json = form.column_value(EXTEND_VALUES).to_string();
        assert!(json.contains("AdministratorMailNotifyAddress"));
        assert!(!json.contains(TITLE));

        let mut copy = FormInfo::default();
        copy.set_column_value(EXTEND_VALUES, Value::String(json));
        assert!(copy.entity().get_bool("isadministratormailnotify"));
        assert_eq!(
            copy.entity().get_string("AdministratorMailNotifyAddress"),
            "admin@example.com"
        );
    }

    #[test]
    fn empty_extend_values_are_null() {
        let form = FormInfo::new(1, "Contact");
        assert!(form.column_value(EXTEND_VALUES).is_null());
    }
}
