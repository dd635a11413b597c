//! # SQLite Repository
//!
//! Implements the three repository contracts on a single `rusqlite` connection.
//! Form and record tables are laid out from the declared columns of
//! [`FormInfo`] and [`DataInfo`], so the storage schema and the archive schema
//! can never drift apart. A record's dynamic attributes are kept as one JSON
//! object in the `ExtendValues` column.

use super::{DataRepository, FormRepository, TableStyleRepository};
use crate::error::Result;
use chrono::Local;
use common::model::column::{DataType, Record, TableColumn};
use common::model::convert;
use common::model::data::DataInfo;
use common::model::entity::Value;
use common::model::form::{self, FormInfo};
use common::model::style::TableStyle;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, Row, ToSql};
use std::path::Path;
use uuid::Uuid;

const FORM_TABLE: &str = "form_forms";
const DATA_TABLE: &str = "form_records";
const STYLE_TABLE: &str = "form_styles";
const ID_COLUMN: &str = "Id";
/// Holds the dynamic attributes of a record as a JSON object.
const DATA_EXTEND_VALUES: &str = "ExtendValues";

pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Opens (creating if needed) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(&create_table_sql(FORM_TABLE, FormInfo::TABLE_COLUMNS, &[]))?;
        conn.execute_batch(&create_table_sql(
            DATA_TABLE,
            DataInfo::TABLE_COLUMNS,
            &[DATA_EXTEND_VALUES],
        ))?;
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {STYLE_TABLE} (
                Id INTEGER PRIMARY KEY AUTOINCREMENT,
                TableName TEXT NOT NULL,
                RelatedIdentity INTEGER NOT NULL,
                AttributeName TEXT NOT NULL COLLATE NOCASE,
                Taxis INTEGER NOT NULL DEFAULT 0,
                Body TEXT NOT NULL,
                UNIQUE (TableName, RelatedIdentity, AttributeName)
            )"
        ))?;
        Ok(Self { conn })
    }

    fn query_forms(&self, where_clause: &str, params: &[&dyn ToSql]) -> Result<Vec<FormInfo>> {
        let sql = format!(
            "SELECT {} FROM {} {}",
            column_list(FormInfo::TABLE_COLUMNS),
            FORM_TABLE,
            where_clause
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params, |row| {
            read_record::<FormInfo>(row, FormInfo::TABLE_COLUMNS)
        })?;

        let mut forms = Vec::new();
        for form in rows {
            forms.push(form?);
        }
        Ok(forms)
    }

    fn query_data(&self, where_clause: &str, params: &[&dyn ToSql]) -> Result<Vec<DataInfo>> {
        let columns = DataInfo::TABLE_COLUMNS;
        let sql = format!(
            "SELECT {}, {} FROM {} {}",
            column_list(columns),
            DATA_EXTEND_VALUES,
            DATA_TABLE,
            where_clause
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params, |row| {
            let mut data = read_record::<DataInfo>(row, columns)?;
            let extend: Option<String> = row.get(columns.len())?;
            if let Some(json) = extend {
                apply_dynamic_attributes(&mut data, &json);
            }
            Ok(data)
        })?;

        let mut list = Vec::new();
        for data in rows {
            list.push(data?);
        }
        Ok(list)
    }

    fn insert_record<R: Record>(
        &self,
        table: &str,
        record: &R,
        extra: Vec<(&str, SqlValue)>,
    ) -> Result<i64> {
        let mut names = Vec::new();
        let mut values = Vec::new();
        for column in R::TABLE_COLUMNS
            .iter()
            .filter(|c| c.attribute_name != ID_COLUMN)
        {
            names.push(column.attribute_name);
            values.push(to_sql(&record.column_value(column.attribute_name)));
        }
        for (name, value) in extra {
            names.push(name);
            values.push(value);
        }

        let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("?{}", i)).collect();
        self.conn.execute(
            &format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table,
                names.join(", "),
                placeholders.join(", ")
            ),
            params_from_iter(values.iter()),
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}

/// Fills in the identity fields every stored row must carry.
fn stamp<R: Record>(record: &mut R) {
    let now = Local::now().naive_local();
    if record.column_value(form::GUID).to_string().is_empty() {
        record.set_column_value(form::GUID, Value::String(Uuid::new_v4().to_string()));
    }
    if record.column_value(form::CREATED_DATE).is_null() {
        record.set_column_value(form::CREATED_DATE, Value::DateTime(now));
    }
    if record.column_value(form::LAST_MODIFIED_DATE).is_null() {
        record.set_column_value(form::LAST_MODIFIED_DATE, Value::DateTime(now));
    }
}

fn sql_type(data_type: DataType) -> &'static str {
    match data_type {
        DataType::Boolean | DataType::Integer => "INTEGER",
        _ => "TEXT",
    }
}

fn create_table_sql(table: &str, columns: &[TableColumn], extra_text_columns: &[&str]) -> String {
    let mut definitions: Vec<String> = columns
        .iter()
        .map(|column| {
            if column.attribute_name == ID_COLUMN {
                format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", ID_COLUMN)
            } else {
                format!("{} {}", column.attribute_name, sql_type(column.data_type))
            }
        })
        .collect();
    definitions.extend(extra_text_columns.iter().map(|name| format!("{} TEXT", name)));
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        table,
        definitions.join(", ")
    )
}

fn column_list(columns: &[TableColumn]) -> String {
    columns
        .iter()
        .map(|c| c.attribute_name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(*b as i64),
        Value::Integer(i) => SqlValue::Integer(*i),
        other => SqlValue::Text(other.to_string()),
    }
}

fn from_sql(data_type: DataType, value: SqlValue) -> Value {
    match (data_type, value) {
        (_, SqlValue::Null) | (_, SqlValue::Blob(_)) => Value::Null,
        (DataType::Boolean, SqlValue::Integer(i)) => Value::Bool(i != 0),
        (DataType::Boolean, SqlValue::Text(s)) => Value::Bool(convert::to_bool(&s, false)),
        (DataType::DateTime, SqlValue::Text(s)) => convert::to_date_time(&s).into(),
        (DataType::Decimal, SqlValue::Text(s)) => s
            .parse()
            .map(Value::Decimal)
            .unwrap_or(Value::Null),
        (_, SqlValue::Integer(i)) => Value::Integer(i),
        (_, SqlValue::Real(f)) => f
            .to_string()
            .parse()
            .map(Value::Decimal)
            .unwrap_or(Value::Null),
        (_, SqlValue::Text(s)) => Value::String(s),
    }
}

fn read_record<R: Record + Default>(row: &Row, columns: &[TableColumn]) -> rusqlite::Result<R> {
    let mut record = R::default();
    for (idx, column) in columns.iter().enumerate() {
        let raw: SqlValue = row.get(idx)?;
        let value = from_sql(column.data_type, raw);
        if !value.is_null() {
            record.set_column_value(column.attribute_name, value);
        }
    }
    Ok(record)
}

fn dynamic_attributes_json(data: &DataInfo) -> String {
    let map: serde_json::Map<String, serde_json::Value> = data
        .dynamic_attributes()
        .map(|(name, value)| (name.to_string(), serde_json::Value::from(value)))
        .collect();
    serde_json::Value::Object(map).to_string()
}

fn apply_dynamic_attributes(data: &mut DataInfo, json: &str) {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(json) {
        for (name, value) in map {
            data.set(&name, Value::from(value));
        }
    }
}

impl FormRepository for SqliteRepository {
    fn get_form_info(&self, site_id: i64, form_id: i64) -> Result<Option<FormInfo>> {
        let forms = self.query_forms("WHERE SiteId = ?1 AND Id = ?2", &[&site_id, &form_id])?;
        Ok(forms.into_iter().next())
    }

    fn get_form_info_by_title(&self, site_id: i64, title: &str) -> Result<Option<FormInfo>> {
        let forms = self.query_forms("WHERE SiteId = ?1 AND Title = ?2", &[&site_id, &title])?;
        Ok(forms.into_iter().next())
    }

    fn get_form_info_list(&self, site_id: i64) -> Result<Vec<FormInfo>> {
        self.query_forms("WHERE SiteId = ?1 ORDER BY Taxis, Id", &[&site_id])
    }

    fn insert_form(&self, form: &FormInfo) -> Result<i64> {
        let mut form = form.clone();
        stamp(&mut form);
        self.insert_record(FORM_TABLE, &form, Vec::new())
    }

    fn delete_form(&self, site_id: i64, form_id: i64) -> Result<()> {
        self.conn.execute(
            &format!("DELETE FROM {} WHERE SiteId = ?1 AND Id = ?2", FORM_TABLE),
            params![site_id, form_id],
        )?;
        Ok(())
    }
}

impl DataRepository for SqliteRepository {
    fn get_data_info(&self, data_id: i64) -> Result<Option<DataInfo>> {
        let list = self.query_data("WHERE Id = ?1", &[&data_id])?;
        Ok(list.into_iter().next())
    }

    fn get_all_data_info_list(&self, form_id: i64) -> Result<Vec<DataInfo>> {
        self.query_data("WHERE FormId = ?1 ORDER BY Id DESC", &[&form_id])
    }

    fn insert_data(&self, form: &FormInfo, data: &DataInfo) -> Result<i64> {
        let mut data = data.clone();
        data.set_form_id(form.id());
        data.set(form::SITE_ID, form.site_id());
        for name in [form::CHANNEL_ID, form::CONTENT_ID] {
            if let Some(value) = form.get(name) {
                data.set(name, value.clone());
            }
        }
        stamp(&mut data);

        let extend = SqlValue::Text(dynamic_attributes_json(&data));
        self.insert_record(DATA_TABLE, &data, vec![(DATA_EXTEND_VALUES, extend)])
    }

    fn update_data(&self, data: &DataInfo) -> Result<()> {
        let mut data = data.clone();
        data.set_last_modified_date(Some(Local::now().naive_local()));

        let mut assignments = Vec::new();
        let mut values = Vec::new();
        for column in DataInfo::TABLE_COLUMNS
            .iter()
            .filter(|c| c.attribute_name != ID_COLUMN)
        {
            values.push(to_sql(&data.column_value(column.attribute_name)));
            assignments.push(format!("{} = ?{}", column.attribute_name, values.len()));
        }
        values.push(SqlValue::Text(dynamic_attributes_json(&data)));
        assignments.push(format!("{} = ?{}", DATA_EXTEND_VALUES, values.len()));
        values.push(SqlValue::Integer(data.id()));

        self.conn.execute(
            &format!(
                "UPDATE {} SET {} WHERE Id = ?{}",
                DATA_TABLE,
                assignments.join(", "),
                values.len()
            ),
            params_from_iter(values.iter()),
        )?;
        Ok(())
    }

    fn delete_by_form_id(&self, form_id: i64) -> Result<()> {
        self.conn.execute(
            &format!("DELETE FROM {} WHERE FormId = ?1", DATA_TABLE),
            params![form_id],
        )?;
        Ok(())
    }
}

impl TableStyleRepository for SqliteRepository {
    fn get_table_styles(
        &self,
        table_name: &str,
        related_identities: &[i64],
        excluded: &[&str],
    ) -> Result<Vec<TableStyle>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT Id, Body FROM {} WHERE TableName = ?1 AND RelatedIdentity = ?2 ORDER BY Taxis, Id",
            STYLE_TABLE
        ))?;

        let mut styles: Vec<TableStyle> = Vec::new();
        for related_identity in related_identities {
            let rows = stmt.query_map(params![table_name, related_identity], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?;
            for row in rows {
                let (id, body) = row?;
                let mut style: TableStyle = serde_json::from_str(&body)?;
                style.id = id;

                let skip = excluded
                    .iter()
                    .any(|name| name.eq_ignore_ascii_case(&style.attribute_name))
                    || styles
                        .iter()
                        .any(|s| s.attribute_name.eq_ignore_ascii_case(&style.attribute_name));
                if !skip {
                    styles.push(style);
                }
            }
        }
        Ok(styles)
    }

    fn insert_style(&self, related_identities: &[i64], style: &TableStyle) -> Result<i64> {
        let mut style = style.clone();
        if style.related_identity == 0 {
            style.related_identity = related_identities.first().copied().unwrap_or_default();
        }
        style.id = 0;

        self.conn.execute(
            &format!(
                "INSERT INTO {} (TableName, RelatedIdentity, AttributeName, Taxis, Body) VALUES (?1, ?2, ?3, ?4, ?5)",
                STYLE_TABLE
            ),
            params![
                style.table_name,
                style.related_identity,
                style.attribute_name,
                style.taxis,
                serde_json::to_string(&style)?
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn delete_style(
        &self,
        table_name: &str,
        related_identity: i64,
        attribute_name: &str,
    ) -> Result<()> {
        self.conn.execute(
            &format!(
                "DELETE FROM {} WHERE TableName = ?1 AND RelatedIdentity = ?2 AND AttributeName = ?3",
                STYLE_TABLE
            ),
            params![table_name, related_identity, attribute_name],
        )?;
        Ok(())
    }

    fn delete_all_styles(&self, table_name: &str, related_identities: &[i64]) -> Result<()> {
        for related_identity in related_identities {
            self.conn.execute(
                &format!(
                    "DELETE FROM {} WHERE TableName = ?1 AND RelatedIdentity = ?2",
                    STYLE_TABLE
                ),
                params![table_name, related_identity],
            )?;
        }
        Ok(())
    }
}
