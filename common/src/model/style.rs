use serde::{Deserialize, Serialize};

/// Widget kind of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputType {
    #[default]
    Text,
    TextArea,
    TextEditor,
    Number,
    CheckBox,
    Radio,
    SelectOne,
    SelectMultiple,
    SelectCascading,
    Date,
    DateTime,
    Image,
    Video,
    File,
    Customize,
    Hidden,
}

impl InputType {
    /// Kinds whose value is a list of the selected items.
    pub fn is_multiple(&self) -> bool {
        matches!(self, InputType::CheckBox | InputType::SelectMultiple)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValidateType {
    #[default]
    None,
    Required,
    Email,
    Mobile,
    Url,
    Integer,
    Currency,
    Zip,
    IdCard,
    Chinese,
    English,
    RegExp,
}

impl ValidateType {
    pub fn display_name(&self) -> &'static str {
        match self {
            ValidateType::None => "",
            ValidateType::Required => "This field is required",
            ValidateType::Email => "Please enter a valid email address",
            ValidateType::Mobile => "Please enter a valid mobile number",
            ValidateType::Url => "Please enter a valid url",
            ValidateType::Integer => "Please enter an integer",
            ValidateType::Currency => "Please enter an amount",
            ValidateType::Zip => "Please enter a valid postal code",
            ValidateType::IdCard => "Please enter a valid identity card number",
            ValidateType::Chinese => "Only Chinese characters are allowed",
            ValidateType::English => "Only English letters are allowed",
            ValidateType::RegExp => "The value does not match the required pattern",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputStyleRule {
    #[serde(rename = "type")]
    pub rule_type: ValidateType,
    pub message: String,
    /// Pattern for `RegExp` rules.
    #[serde(default)]
    pub value: String,
}

impl InputStyleRule {
    pub fn new(rule_type: ValidateType) -> Self {
        Self {
            rule_type,
            message: rule_type.display_name().to_string(),
            value: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputStyleItem {
    #[serde(default)]
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub selected: bool,
}

/// One field definition of a form.
///
/// `table_name` + `related_identity` + `attribute_name` identify the style and
/// are not edited after creation. For choice kinds, `items` drives selection and
/// takes precedence over `default_value`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableStyle {
    pub id: i64,
    pub table_name: String,
    pub related_identity: i64,
    pub attribute_name: String,
    pub taxis: i32,
    pub display_name: String,
    pub help_text: String,
    pub input_type: InputType,
    pub default_value: String,
    pub is_horizontal: bool,
    pub rules: Vec<InputStyleRule>,
    pub items: Option<Vec<InputStyleItem>>,
}

impl TableStyle {
    pub fn is_required(&self) -> bool {
        self.rules
            .iter()
            .any(|r| r.rule_type == ValidateType::Required)
    }

    /// Items in declared order, empty when the style has none.
    pub fn items(&self) -> &[InputStyleItem] {
        self.items.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_json_uses_camel_case_and_keeps_item_order() {
        let style = TableStyle {
            attribute_name: "Color".to_string(),
            input_type: InputType::CheckBox,
            rules: vec![InputStyleRule::new(ValidateType::Required)],
            items: Some(vec![
                InputStyleItem {
                    label: "Red".to_string(),
                    value: "red".to_string(),
                    selected: true,
                },
                InputStyleItem {
                    label: "Blue".to_string(),
                    value: "blue".to_string(),
                    selected: false,
                },
            ]),
            ..Default::default()
        };

        let json = serde_json::to_string(&style).unwrap();
        assert!(json.contains("\"attributeName\":\"Color\""));
        assert!(json.contains("\"inputType\":\"CheckBox\""));

        let back: TableStyle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, style);
        assert_eq!(back.items()[0].value, "red");
        assert!(back.is_required());
    }
}
