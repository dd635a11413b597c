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
pub const FORM_ID: &str = "FormId";
pub const IS_REPLIED: &str = "IsReplied";
pub const REPLY_DATE: &str = "ReplyDate";
pub const REPLY_CONTENT: &str = "ReplyContent";

/// Attributes that belong to the record itself and never to a field style.
pub const METADATA_ATTRIBUTES: &[&str] = &[FORM_ID, IS_REPLIED, REPLY_DATE, REPLY_CONTENT];

/// One submitted record. Dynamic attributes follow the owning form's styles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataInfo {
    entity: Entity,
}

impl Record for DataInfo {
    const TABLE_COLUMNS: &'static [TableColumn] = &[
        TableColumn::new(ID, DataType::Integer),
        TableColumn::new(GUID, DataType::VarChar),
        TableColumn::new(CREATED_DATE, DataType::DateTime),
        TableColumn::new(LAST_MODIFIED_DATE, DataType::DateTime),
        TableColumn::new(SITE_ID, DataType::Integer),
        TableColumn::new(CHANNEL_ID, DataType::Integer),
        TableColumn::new(CONTENT_ID, DataType::Integer),
        TableColumn::new(FORM_ID, DataType::Integer),
        TableColumn::new(IS_REPLIED, DataType::Boolean),
        TableColumn::new(REPLY_DATE, DataType::DateTime),
        TableColumn::new(REPLY_CONTENT, DataType::Text),
    ];

    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}

impl DataInfo {
    pub fn new(form_id: i64) -> Self {
        let mut info = Self::default();
        info.set_form_id(form_id);
        info
    }

    pub fn id(&self) -> i64 {
        self.entity.get_i64(ID)
    }

    pub fn set_id(&mut self, id: i64) {
        self.entity.set(ID, id);
    }

    pub fn guid(&self) -> String {
        self.entity.get_string(GUID)
    }

    pub fn set_guid(&mut self, guid: &str) {
        self.entity.set(GUID, guid);
    }

    pub fn form_id(&self) -> i64 {
        self.entity.get_i64(FORM_ID)
    }

    pub fn set_form_id(&mut self, form_id: i64) {
        self.entity.set(FORM_ID, form_id);
    }

    pub fn created_date(&self) -> Option<NaiveDateTime> {
        self.entity.get_date_time(CREATED_DATE)
    }

    pub fn set_created_date(&mut self, date: Option<NaiveDateTime>) {
        self.entity.set(CREATED_DATE, date);
    }

    pub fn last_modified_date(&self) -> Option<NaiveDateTime> {
        self.entity.get_date_time(LAST_MODIFIED_DATE)
    }

    pub fn set_last_modified_date(&mut self, date: Option<NaiveDateTime>) {
        self.entity.set(LAST_MODIFIED_DATE, date);
    }

    pub fn is_replied(&self) -> bool {
        self.entity.get_bool(IS_REPLIED)
    }

    pub fn set_is_replied(&mut self, replied: bool) {
        self.entity.set(IS_REPLIED, replied);
    }

    pub fn reply_date(&self) -> Option<NaiveDateTime> {
        self.entity.get_date_time(REPLY_DATE)
    }

    pub fn set_reply_date(&mut self, date: Option<NaiveDateTime>) {
        self.entity.set(REPLY_DATE, date);
    }

    pub fn reply_content(&self) -> String {
        self.entity.get_string(REPLY_CONTENT)
    }

    pub fn set_reply_content(&mut self, content: &str) {
        self.entity.set(REPLY_CONTENT, content);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entity.get(name)
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.entity.set(name, value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.entity.remove(name)
    }

    /// Attributes that are not declared columns, i.e. the submitted field values.
    pub fn dynamic_attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entity
            .iter()
            .filter(|(name, _)| !Self::is_table_column(name))
    }
}
