mod support;

use backend::error::FormError;
use backend::repository::{DataRepository, FormRepository, TableStyleRepository, TABLE_NAME_DATA};
use backend::services::forms::manager::{FormManager, DEFAULT_PAGE_SIZE};
use common::model::column::Record;
use common::model::entity::Value;
use common::model::form::{self, FormInfo};
use common::model::style::{InputType, ValidateType};
use serde_json::json;
use support::{colors_style, values, Installation};

#[test]
fn new_forms_get_the_default_fields() {
    let site = Installation::new();
    let form = site.create_form(1, "Contact");

    let styles = site.run(|manager| {
        manager.create_default_styles(&form).unwrap();
        manager.get_table_styles(form.id()).unwrap()
    });

    let names: Vec<&str> = styles.iter().map(|s| s.attribute_name.as_str()).collect();
    assert_eq!(names, vec!["Name", "Mobile", "Email", "Content"]);
    assert_eq!(styles[3].input_type, InputType::TextArea);
    assert_eq!(styles[3].display_name, "Message");
    assert_eq!(styles[1].rules[0].rule_type, ValidateType::Mobile);
    assert!(styles[0].is_required());
    assert!(!styles[2].is_required());
}

#[test]
fn submit_enforces_required_fields() {
    let site = Installation::new();
    let form = site.create_form(1, "Contact");

    let result = site.run(|manager| {
        let styles = manager.create_default_styles(&form).unwrap();
        manager.submit(&form, &styles, &values(&[("Name", json!("  "))]))
    });

    match result {
        Err(FormError::Validation(message)) => assert!(!message.is_empty()),
        other => panic!("expected a validation error, got {:?}", other),
    }
    assert!(site
        .repository
        .get_all_data_info_list(form.id())
        .unwrap()
        .is_empty());
}

#[test]
fn submit_keeps_only_styled_values() {
    let site = Installation::new();
    let form = site.create_form(1, "Contact");

    let stored = site.run(|manager| {
        manager.create_default_styles(&form).unwrap();
        site.repository
            .insert_style(&[form.id()], &colors_style(form.id()))
            .unwrap();
        let styles = manager.get_table_styles(form.id()).unwrap();
        manager
            .submit(
                &form,
                &styles,
                &values(&[
                    ("name", json!("Ada")),
                    ("Content", json!("Hello")),
                    ("Colors", json!("red")),
                    ("Unknown", json!("dropped")),
                ]),
            )
            .unwrap()
    });

    let data = site.repository.get_data_info(stored.id()).unwrap().unwrap();
    assert_eq!(data.form_id(), form.id());
    assert_eq!(data.get("Name"), Some(&Value::from("Ada")));
    assert_eq!(data.get("Colors"), Some(&Value::List(vec!["red".to_string()])));
    assert!(data.get("Unknown").is_none());
    assert!(!data.guid().is_empty());
    assert!(data.created_date().is_some());
}

#[test]
fn closed_forms_refuse_submissions() {
    let site = Installation::new();
    let mut form = FormInfo::new(1, "Closed");
    form.set(form::IS_CLOSED, true);
    let id = site.repository.insert_form(&form).unwrap();
    let form = site.repository.get_form_info(1, id).unwrap().unwrap();

    let result = site.run(|manager| {
        manager.submit(&form, &[], &values(&[("Name", json!("Ada"))]))
    });
    assert!(matches!(result, Err(FormError::Validation(_))));
}

#[test]
fn reply_marks_the_record() {
    let site = Installation::new();
    let form = site.create_form(1, "Contact");

    let replied = site.run(|manager| {
        let styles = manager.create_default_styles(&form).unwrap();
        let data = manager
            .submit(
                &form,
                &styles,
                &values(&[("Name", json!("Ada")), ("Content", json!("Question"))]),
            )
            .unwrap();
        manager.reply(data.id(), "Answer").unwrap()
    });

    let data = site.repository.get_data_info(replied.id()).unwrap().unwrap();
    assert!(data.is_replied());
    assert_eq!(data.reply_content(), "Answer");
    assert!(data.reply_date().is_some());
    assert_eq!(data.get("Content"), Some(&Value::from("Question")));

    let missing = site.run(|manager| manager.reply(9999, "Answer"));
    assert!(matches!(missing, Err(FormError::NotFound(_))));
}

#[test]
fn delete_removes_styles_and_records() {
    let site = Installation::new();
    let form = site.create_form(1, "Contact");
    let other = site.create_form(1, "Other");

    site.run(|manager| {
        for target in [&form, &other] {
            let styles = manager.create_default_styles(target).unwrap();
            manager
                .submit(
                    target,
                    &styles,
                    &values(&[("Name", json!("Ada")), ("Content", json!("Hi"))]),
                )
                .unwrap();
        }
        manager.delete(1, form.id()).unwrap();
        manager.delete(1, 0).unwrap();
    });

    assert!(site.repository.get_form_info(1, form.id()).unwrap().is_none());
    assert!(site
        .repository
        .get_all_data_info_list(form.id())
        .unwrap()
        .is_empty());
    assert!(site
        .repository
        .get_table_styles(TABLE_NAME_DATA, &[form.id()], &[])
        .unwrap()
        .is_empty());

    assert_eq!(site.repository.get_all_data_info_list(other.id()).unwrap().len(), 1);
    assert_eq!(
        site.repository
            .get_table_styles(TABLE_NAME_DATA, &[other.id()], &[])
            .unwrap()
            .len(),
        4
    );

    let again = site.run(|manager| manager.delete(1, form.id()));
    assert!(matches!(again, Err(FormError::NotFound(_))));
}

#[test]
fn data_info_defaults_come_from_styles() {
    let site = Installation::new();
    let form = site.create_form(1, "Contact");
    site.repository
        .insert_style(&[form.id()], &colors_style(form.id()))
        .unwrap();

    let (fresh, missing) = site.run(|manager| {
        let styles = manager.get_table_styles(form.id()).unwrap();
        (
            manager.get_data_info(0, form.id(), &styles).unwrap(),
            manager.get_data_info(404, form.id(), &styles),
        )
    });

    assert_eq!(fresh.id(), 0);
    assert_eq!(fresh.form_id(), form.id());
    assert_eq!(fresh.entity().get_list("Colors"), vec!["red".to_string()]);
    assert!(matches!(missing, Err(FormError::NotFound(_))));
}

#[test]
fn page_size_falls_back_to_the_default() {
    let mut form = FormInfo::new(1, "Contact");
    assert_eq!(FormManager::get_page_size(&form), DEFAULT_PAGE_SIZE);
    form.set(form::PAGE_SIZE, -5);
    assert_eq!(FormManager::get_page_size(&form), DEFAULT_PAGE_SIZE);
    form.set(form::PAGE_SIZE, 12);
    assert_eq!(FormManager::get_page_size(&form), 12);
}

#[test]
fn table_style_can_be_removed() {
    let site = Installation::new();
    let form = site.create_form(1, "Contact");

    let remaining = site.run(|manager| {
        manager.create_default_styles(&form).unwrap();
        manager.delete_table_style(form.id(), "mobile").unwrap();
        manager.get_table_styles(form.id()).unwrap()
    });

    let names: Vec<&str> = remaining.iter().map(|s| s.attribute_name.as_str()).collect();
    assert_eq!(names, vec!["Name", "Email", "Content"]);
}
