//! Pre-populates a new record from the defaults of a form's styles.

use super::{record_json, with_manager};
use crate::config::Settings;
use crate::error::Result;
use actix_web::{web, HttpResponse, Responder};
use common::model::data::DataInfo;
use common::model::style::{InputType, TableStyle};
use common::requests::FormRequest;

/// Handler for `GET /api/form/forms/record`: the record a new submission of
/// the form starts from, together with the styles it was built from.
pub(crate) async fn process(
    settings: web::Data<Settings>,
    query: web::Query<FormRequest>,
) -> impl Responder {
    match get_new_record(&settings, &query) {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(e) => e.to_response(),
    }
}

fn get_new_record(settings: &Settings, req: &FormRequest) -> Result<serde_json::Value> {
    with_manager(settings, |manager| {
        let form = manager.get_form_info(req.site_id, req.form_id)?;
        let styles = manager.get_table_styles(form.id())?;
        let data = manager.get_data_info(0, form.id(), &styles)?;
        Ok(serde_json::json!({
            "styles": styles,
            "dataInfo": record_json(&data),
        }))
    })
}

/// Builds the blank record a submission form starts from.
///
/// Single-value kinds only set an attribute when a default can be
/// determined. Multi-choice kinds always set one, possibly to an empty list.
pub fn build_default_record(form_id: i64, styles: &[TableStyle]) -> DataInfo {
    let mut data = DataInfo::new(form_id);

    for style in styles {
        let name = style.attribute_name.as_str();
        match style.input_type {
            InputType::Text | InputType::TextArea | InputType::TextEditor | InputType::Hidden => {
                if !style.default_value.is_empty() {
                    data.set(name, style.default_value.as_str());
                }
            }
            InputType::Number => {
                if let Ok(number) = style.default_value.trim().parse::<i64>() {
                    data.set(name, number);
                }
            }
            InputType::CheckBox | InputType::SelectMultiple => {
                let selected: Vec<String> = style
                    .items()
                    .iter()
                    .filter(|item| item.selected)
                    .map(|item| item.value.clone())
                    .collect();
                data.set(name, selected);
            }
            InputType::Radio | InputType::SelectOne => {
                if style.items().is_empty() {
                    if !style.default_value.is_empty() {
                        data.set(name, style.default_value.as_str());
                    }
                } else if let Some(item) = style.items().iter().filter(|i| i.selected).last() {
                    data.set(name, item.value.as_str());
                }
            }
            _ => {}
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::entity::Value;
    use common::model::style::InputStyleItem;

    fn item(value: &str, selected: bool) -> InputStyleItem {
        InputStyleItem {
            label: value.to_uppercase(),
            value: value.to_string(),
            selected,
        }
    }

    fn style(name: &str, input_type: InputType, default_value: &str) -> TableStyle {
        TableStyle {
            attribute_name: name.to_string(),
            display_name: name.to_string(),
            input_type,
            default_value: default_value.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn single_value_kinds_skip_missing_defaults() {
        let styles = vec![
            style("Name", InputType::Text, "anonymous"),
            style("Note", InputType::TextArea, ""),
            style("Age", InputType::Number, "42"),
            style("Count", InputType::Number, "many"),
            style("Secret", InputType::Hidden, "x"),
        ];
        let data = build_default_record(9, &styles);

        assert_eq!(data.form_id(), 9);
        assert_eq!(data.get("Name"), Some(&Value::String("anonymous".into())));
        assert_eq!(data.get("Age"), Some(&Value::Integer(42)));
        assert_eq!(data.get("Secret"), Some(&Value::String("x".into())));
        assert!(data.get("Note").is_none());
        assert!(data.get("Count").is_none());
    }

    #[test]
    fn multi_choice_is_always_set() {
        let mut colors = style("Colors", InputType::CheckBox, "red");
        colors.items = Some(vec![item("red", true), item("green", false), item("blue", true)]);
        let sizes = style("Sizes", InputType::SelectMultiple, "");

        let data = build_default_record(1, &[colors, sizes]);
        assert_eq!(
            data.get("Colors"),
            Some(&Value::List(vec!["red".into(), "blue".into()]))
        );
        assert_eq!(data.get("Sizes"), Some(&Value::List(Vec::new())));
    }

    #[test]
    fn single_choice_prefers_items_and_last_selection_wins() {
        let mut one = style("One", InputType::Radio, "ignored");
        one.items = Some(vec![item("a", false), item("b", true)]);
        let mut last = style("Last", InputType::SelectOne, "");
        last.items = Some(vec![item("a", true), item("b", true)]);
        let mut none = style("None", InputType::Radio, "");
        none.items = Some(vec![item("a", false)]);
        let unselected_with_default = {
            let mut s = style("Unselected", InputType::Radio, "fallback");
            s.items = Some(vec![item("a", false)]);
            s
        };
        let plain = style("Plain", InputType::SelectOne, "z");

        let data = build_default_record(1, &[one, last, none, unselected_with_default, plain]);
        assert_eq!(data.get("One"), Some(&Value::String("b".into())));
        assert_eq!(data.get("Last"), Some(&Value::String("b".into())));
        assert!(data.get("None").is_none());
        assert!(data.get("Unselected").is_none());
        assert_eq!(data.get("Plain"), Some(&Value::String("z".into())));
    }
}
