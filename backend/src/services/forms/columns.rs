//! Projects a form's styles onto the columns of the admin record grid.

use super::with_manager;
use crate::config::Settings;
use crate::error::Result;
use actix_web::{web, HttpResponse, Responder};
use common::model::column::ContentColumn;
use common::model::data;
use common::model::form::FormInfo;
use common::model::style::{InputType, TableStyle};
use common::requests::ColumnsRequest;

/// Columns listed when a form does not name its own.
pub const DEFAULT_LIST_ATTRIBUTE_NAMES: &str = "Name,Mobile,Email,Content";

/// Visible attribute names configured on `form`, or the default set.
pub fn list_attribute_names(form: &FormInfo) -> Vec<String> {
    let names = form.list_attribute_names();
    let names = if names.trim().is_empty() {
        DEFAULT_LIST_ATTRIBUTE_NAMES.to_string()
    } else {
        names
    };
    split_names(&names)
}

/// Splits a comma separated name list, dropping blanks.
pub fn split_names(names: &str) -> Vec<String> {
    names
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builds the grid columns: `Id`, `Guid`, one column per listable style,
/// `CreatedDate`, `LastModifiedDate` and, for forms taking replies, the
/// reply columns. Rich-text styles and styles without a display name are
/// never columns. Names are not de-duplicated.
pub fn get_columns(
    visible_attribute_names: &[String],
    styles: &[TableStyle],
    include_reply_columns: bool,
) -> Vec<ContentColumn> {
    let system = |name: &str, display_name: &str| ContentColumn {
        attribute_name: name.to_string(),
        display_name: display_name.to_string(),
        input_type: None,
        is_list: is_visible(visible_attribute_names, name),
    };

    let mut columns = vec![system(data::ID, "Id"), system(data::GUID, "Guid")];

    for style in styles {
        if style.display_name.is_empty() || style.input_type == InputType::TextEditor {
            continue;
        }
        columns.push(ContentColumn {
            attribute_name: style.attribute_name.clone(),
            display_name: style.display_name.clone(),
            input_type: Some(style.input_type),
            is_list: is_visible(visible_attribute_names, &style.attribute_name),
        });
    }

    columns.push(system(data::CREATED_DATE, "Created"));
    columns.push(system(data::LAST_MODIFIED_DATE, "Last modified"));

    if include_reply_columns {
        columns.push(system(data::REPLY_DATE, "Replied"));
        columns.push(system(data::REPLY_CONTENT, "Reply"));
    }

    columns
}

/// Handler for `GET /api/form/forms/columns`.
pub(crate) async fn process(
    settings: web::Data<Settings>,
    query: web::Query<ColumnsRequest>,
) -> impl Responder {
    match get_form_columns(&settings, &query) {
        Ok(columns) => HttpResponse::Ok().json(columns),
        Err(e) => e.to_response(),
    }
}

fn get_form_columns(settings: &Settings, req: &ColumnsRequest) -> Result<Vec<ContentColumn>> {
    with_manager(settings, |manager| {
        let form = manager.get_form_info(req.site_id, req.form_id)?;
        let styles = manager.get_table_styles(form.id())?;
        let visible = match &req.attribute_names {
            Some(names) => split_names(names),
            None => list_attribute_names(&form),
        };
        Ok(get_columns(&visible, &styles, form.is_reply()))
    })
}

fn is_visible(visible_attribute_names: &[String], name: &str) -> bool {
    visible_attribute_names
        .iter()
        .any(|n| n.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(name: &str, display_name: &str, input_type: InputType) -> TableStyle {
        TableStyle {
            attribute_name: name.to_string(),
            display_name: display_name.to_string(),
            input_type,
            ..Default::default()
        }
    }

    fn names(columns: &[ContentColumn]) -> Vec<&str> {
        columns.iter().map(|c| c.attribute_name.as_str()).collect()
    }

    #[test]
    fn system_columns_surround_style_columns() {
        let styles = vec![
            style("Name", "Name", InputType::Text),
            style("Body", "Body", InputType::TextEditor),
            style("Untitled", "", InputType::Text),
            style("Color", "Color", InputType::Radio),
        ];
        let visible = split_names("name, GUID,createddate");

        let columns = get_columns(&visible, &styles, false);
        assert_eq!(
            names(&columns),
            vec!["Id", "Guid", "Name", "Color", "CreatedDate", "LastModifiedDate"]
        );
        let listed: Vec<&str> = columns
            .iter()
            .filter(|c| c.is_list)
            .map(|c| c.attribute_name.as_str())
            .collect();
        assert_eq!(listed, vec!["Guid", "Name", "CreatedDate"]);
        assert_eq!(columns[3].input_type, Some(InputType::Radio));
    }

    #[test]
    fn rich_text_is_never_a_column() {
        let styles = vec![style("Body", "Body", InputType::TextEditor)];
        let visible = vec!["Body".to_string()];
        let columns = get_columns(&visible, &styles, true);
        assert!(!names(&columns).contains(&"Body"));
        assert_eq!(&names(&columns)[4..], &["ReplyDate", "ReplyContent"]);
    }

    #[test]
    fn forms_without_a_list_fall_back_to_defaults() {
        let mut form = FormInfo::new(1, "Contact");
        assert_eq!(list_attribute_names(&form), vec!["Name", "Mobile", "Email", "Content"]);

        form.set(common::model::form::LIST_ATTRIBUTE_NAMES, "Id,Email");
        assert_eq!(list_attribute_names(&form), vec!["Id", "Email"]);
    }
}
