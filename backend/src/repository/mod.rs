//! # Repository Collaborators
//!
//! Plain CRUD contracts the form engine relies on. The engine only ever talks to
//! these traits; [`sqlite::SqliteRepository`] is the implementation the server
//! and the tests use.

pub mod sqlite;

use crate::error::Result;
use common::model::data::DataInfo;
use common::model::form::FormInfo;
use common::model::style::TableStyle;

/// Style table shared by every form; styles are scoped by the form id.
pub const TABLE_NAME_DATA: &str = "form_data";

/// Identities a form's styles are scoped by.
pub fn related_identities(form_id: i64) -> Vec<i64> {
    vec![form_id]
}

pub trait FormRepository {
    fn get_form_info(&self, site_id: i64, form_id: i64) -> Result<Option<FormInfo>>;

    fn get_form_info_by_title(&self, site_id: i64, title: &str) -> Result<Option<FormInfo>>;

    fn get_form_info_list(&self, site_id: i64) -> Result<Vec<FormInfo>>;

    /// Returns the new form id.
    fn insert_form(&self, form: &FormInfo) -> Result<i64>;

    fn delete_form(&self, site_id: i64, form_id: i64) -> Result<()>;

    /// First title derived from `title` that no form of the site uses yet.
    fn get_import_title(&self, site_id: i64, title: &str) -> Result<String> {
        let mut candidate = title.to_string();
        loop {
            candidate = next_import_title(&candidate);
            if self.get_form_info_by_title(site_id, &candidate)?.is_none() {
                return Ok(candidate);
            }
        }
    }
}

pub trait DataRepository {
    fn get_data_info(&self, data_id: i64) -> Result<Option<DataInfo>>;

    /// Every record of the form, newest first.
    fn get_all_data_info_list(&self, form_id: i64) -> Result<Vec<DataInfo>>;

    /// Inserts `data` under `form` and returns the new record id.
    fn insert_data(&self, form: &FormInfo, data: &DataInfo) -> Result<i64>;

    fn update_data(&self, data: &DataInfo) -> Result<()>;

    fn delete_by_form_id(&self, form_id: i64) -> Result<()>;
}

pub trait TableStyleRepository {
    /// Styles of the scope ordered by taxis. For several identities the first
    /// one declaring an attribute wins. Attributes named in `excluded` are skipped.
    fn get_table_styles(
        &self,
        table_name: &str,
        related_identities: &[i64],
        excluded: &[&str],
    ) -> Result<Vec<TableStyle>>;

    fn insert_style(&self, related_identities: &[i64], style: &TableStyle) -> Result<i64>;

    fn delete_style(
        &self,
        table_name: &str,
        related_identity: i64,
        attribute_name: &str,
    ) -> Result<()>;

    fn delete_all_styles(&self, table_name: &str, related_identities: &[i64]) -> Result<()>;
}

/// `Contact` becomes `Contact_1`, `Contact_1` becomes `Contact_2`.
pub fn next_import_title(title: &str) -> String {
    if let Some(pos) = title.rfind('_') {
        let (head, tail) = title.split_at(pos + 1);
        if let Some(count) = tail.parse::<u64>().ok().and_then(|c| c.checked_add(1)) {
            return format!("{}{}", head, count);
        }
    }
    format!("{}_1", title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_titles_count_upwards() {
        assert_eq!(next_import_title("Contact"), "Contact_1");
        assert_eq!(next_import_title("Contact_1"), "Contact_2");
        assert_eq!(next_import_title("Contact_us"), "Contact_us_1");
        assert_eq!(next_import_title("Survey_9"), "Survey_10");
        assert_eq!(next_import_title("Survey_4294967295"), "Survey_4294967296");
        assert_eq!(
            next_import_title("Survey_18446744073709551615"),
            "Survey_18446744073709551615_1"
        );
    }
}
