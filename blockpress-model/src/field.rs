use crate::messages;
use crate::options::{Alignment, Color, MediaKind, PickerSource, TextFormat, Toolbar};
use crate::schema::{Limits, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One editable property of a block.
///
/// The editor decides both the default value and the built-in check that
/// runs on save; `validation` layers extra rules on top or waives checking
/// for this field entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub key: String,
    /// i18n key of the field label.
    pub label: String,
    pub editor: Editor,
    #[serde(default)]
    pub validation: Validation,
}

/// How a field is checked before save.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "rules", rename_all = "snake_case")]
pub enum Validation {
    /// Only the editor's built-in check.
    #[default]
    Editor,
    /// The editor's built-in check followed by the given rules.
    Rules(Vec<Rule>),
    /// Never reports errors, not even the editor's built-in check.
    Waived,
}

/// An additional constraint on a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", content = "value", rename_all = "snake_case")]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Url,
    MinItems(usize),
    MaxItems(usize),
}

/// The editor widget of a field, with its typed props.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "props", rename_all = "snake_case")]
pub enum Editor {
    TextInput(TextInputProps),
    Wysiwyg(WysiwygProps),
    Select(SelectProps),
    ColorSelect(ColorSelectProps),
    AlignSelect(AlignSelectProps),
    IconPicker(IconPickerProps),
    ContentPicker(ContentPickerProps),
    FileUpload(FileUploadProps),
    MultiRange(MultiRangeProps),
    DatePicker(DatePickerProps),
    Checkbox(CheckboxProps),
    TagInput(TagInputProps),
    FieldGroup(FieldGroupProps),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextInputProps {
    #[serde(default)]
    pub format: TextFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WysiwygProps {
    #[serde(default)]
    pub toolbar: Toolbar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectProps {
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub multiple: bool,
}

impl SelectProps {
    fn allows(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSelectProps {
    pub palette: Vec<Color>,
    pub default: Color,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignSelectProps {
    pub allowed: Vec<Alignment>,
    pub default: Alignment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconPickerProps {
    pub icon_set: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPickerProps {
    pub source: PickerSource,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUploadProps {
    /// Accepted media kinds; empty accepts anything.
    pub accept: Vec<MediaKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size_bytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiRangeProps {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatePickerProps {
    #[serde(default)]
    pub include_time: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckboxProps {
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TagInputProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tags: Option<usize>,
}

/// A repeatable group of nested fields, stored as an array of objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldGroupProps {
    pub fields: Schema,
    pub limits: Limits,
}

// ── Shorthand constructors ───────────────────────────────────────

impl FieldDescriptor {
    pub fn new(key: impl Into<String>, label: impl Into<String>, editor: Editor) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            editor,
            validation: Validation::Editor,
        }
    }

    /// Plain single-line text.
    pub fn text(key: &str, label: &str) -> Self {
        Self::new(key, label, Editor::TextInput(TextInputProps::default()))
    }

    /// Single-line text that must be an absolute http(s) URL or a site path.
    pub fn url(key: &str, label: &str) -> Self {
        Self::new(
            key,
            label,
            Editor::TextInput(TextInputProps {
                format: TextFormat::Url,
                ..Default::default()
            }),
        )
    }

    /// Rich text with the given toolbar preset.
    pub fn wysiwyg(key: &str, label: &str, toolbar: Toolbar) -> Self {
        Self::new(key, label, Editor::Wysiwyg(WysiwygProps { toolbar }))
    }

    /// Single choice from a fixed option list.
    pub fn select(key: &str, label: &str, options: Vec<SelectOption>, default: &str) -> Self {
        Self::new(
            key,
            label,
            Editor::Select(SelectProps {
                options,
                default: Some(default.to_string()),
                multiple: false,
            }),
        )
    }

    /// Colour choice from the full palette.
    pub fn color(key: &str, label: &str, default: Color) -> Self {
        Self::new(
            key,
            label,
            Editor::ColorSelect(ColorSelectProps {
                palette: Color::ALL.to_vec(),
                default,
            }),
        )
    }

    pub fn align(key: &str, label: &str, default: Alignment) -> Self {
        Self::new(
            key,
            label,
            Editor::AlignSelect(AlignSelectProps {
                allowed: Alignment::ALL.to_vec(),
                default,
            }),
        )
    }

    pub fn icon(key: &str, label: &str) -> Self {
        Self::new(
            key,
            label,
            Editor::IconPicker(IconPickerProps {
                icon_set: "default".to_string(),
            }),
        )
    }

    /// Reference to a single item of `source`.
    pub fn content(key: &str, label: &str, source: PickerSource) -> Self {
        Self::new(
            key,
            label,
            Editor::ContentPicker(ContentPickerProps {
                source,
                multiple: false,
                max_items: None,
            }),
        )
    }

    /// References to several items of `source`.
    pub fn content_many(key: &str, label: &str, source: PickerSource, max_items: Option<usize>) -> Self {
        Self::new(
            key,
            label,
            Editor::ContentPicker(ContentPickerProps {
                source,
                multiple: true,
                max_items,
            }),
        )
    }

    pub fn file(key: &str, label: &str, accept: &[MediaKind]) -> Self {
        Self::new(
            key,
            label,
            Editor::FileUpload(FileUploadProps {
                accept: accept.to_vec(),
                max_size_bytes: None,
            }),
        )
    }

    pub fn range(key: &str, label: &str, min: f64, max: f64, step: f64) -> Self {
        Self::new(key, label, Editor::MultiRange(MultiRangeProps { min, max, step }))
    }

    pub fn date(key: &str, label: &str, include_time: bool) -> Self {
        Self::new(key, label, Editor::DatePicker(DatePickerProps { include_time }))
    }

    pub fn checkbox(key: &str, label: &str, default: bool) -> Self {
        Self::new(key, label, Editor::Checkbox(CheckboxProps { default }))
    }

    pub fn tags(key: &str, label: &str, max_tags: Option<usize>) -> Self {
        Self::new(key, label, Editor::TagInput(TagInputProps { max_tags }))
    }

    /// Repeatable group of nested fields.
    pub fn group(key: &str, label: &str, fields: Schema, limits: Limits) -> Self {
        Self::new(key, label, Editor::FieldGroup(FieldGroupProps { fields, limits }))
    }

    // ── Modifiers ────────────────────────────────────────────────

    /// Adds a rule on top of the editor's built-in check.
    #[must_use]
    pub fn with_rule(mut self, rule: Rule) -> Self {
        match &mut self.validation {
            Validation::Rules(rules) => rules.push(rule),
            other => *other = Validation::Rules(vec![rule]),
        }
        self
    }

    #[must_use]
    pub fn required(self) -> Self {
        self.with_rule(Rule::Required)
    }

    #[must_use]
    pub fn max_length(self, max: usize) -> Self {
        self.with_rule(Rule::MaxLength(max))
    }

    /// Turns off all checking for this field, including the editor's own.
    #[must_use]
    pub fn waive_validation(mut self) -> Self {
        self.validation = Validation::Waived;
        self
    }

    #[must_use]
    pub fn placeholder(mut self, text: &str) -> Self {
        if let Editor::TextInput(props) = &mut self.editor {
            props.placeholder = Some(text.to_string());
        }
        self
    }

    /// Whether saving runs any check on this field.
    pub fn has_validator(&self) -> bool {
        !matches!(self.validation, Validation::Waived)
    }

    /// The value a freshly created block starts with.
    pub fn default_value(&self) -> Value {
        self.editor.default_value()
    }

    /// Runs the editor check and any rules against `value`.
    ///
    /// Nested group items are not descended into; the validation engine
    /// walks them so that errors keep their item index.
    pub fn check(&self, value: &Value) -> Vec<String> {
        let rules: &[Rule] = match &self.validation {
            Validation::Waived => return Vec::new(),
            Validation::Editor => &[],
            Validation::Rules(rules) => rules,
        };

        let mut errors = self.editor.check(value);
        let blank = is_blank(value);
        for rule in rules {
            let failed = match rule {
                Rule::Required => blank.then_some(messages::REQUIRED),
                _ if blank => None,
                Rule::MinLength(min) => (text_len(value) < *min).then_some(messages::MIN_LENGTH),
                Rule::MaxLength(max) => (text_len(value) > *max).then_some(messages::MAX_LENGTH),
                Rule::Url => value
                    .as_str()
                    .filter(|s| !looks_like_url(s))
                    .map(|_| messages::URL),
                Rule::MinItems(min) => (item_count(value) < *min).then_some(messages::MIN_ITEMS),
                Rule::MaxItems(max) => (item_count(value) > *max).then_some(messages::MAX_ITEMS),
            };
            if let Some(message) = failed {
                push_unique(&mut errors, message);
            }
        }
        errors
    }
}

impl Editor {
    /// Short name of the editor kind, as used in serialized schemas.
    pub fn kind(&self) -> &'static str {
        match self {
            Editor::TextInput(_) => "text_input",
            Editor::Wysiwyg(_) => "wysiwyg",
            Editor::Select(_) => "select",
            Editor::ColorSelect(_) => "color_select",
            Editor::AlignSelect(_) => "align_select",
            Editor::IconPicker(_) => "icon_picker",
            Editor::ContentPicker(_) => "content_picker",
            Editor::FileUpload(_) => "file_upload",
            Editor::MultiRange(_) => "multi_range",
            Editor::DatePicker(_) => "date_picker",
            Editor::Checkbox(_) => "checkbox",
            Editor::TagInput(_) => "tag_input",
            Editor::FieldGroup(_) => "field_group",
        }
    }

    pub fn default_value(&self) -> Value {
        match self {
            Editor::TextInput(_) | Editor::Wysiwyg(_) | Editor::IconPicker(_) => json!(""),
            Editor::Select(props) if props.multiple => json!([]),
            Editor::Select(props) => props
                .default
                .clone()
                .or_else(|| props.options.first().map(|o| o.value.clone()))
                .map_or_else(|| json!(""), Value::String),
            Editor::ColorSelect(props) => json!(props.default.as_str()),
            Editor::AlignSelect(props) => json!(props.default.as_str()),
            Editor::ContentPicker(props) if props.multiple => json!([]),
            Editor::ContentPicker(_) | Editor::FileUpload(_) | Editor::DatePicker(_) => Value::Null,
            Editor::MultiRange(props) => json!([props.min, props.max]),
            Editor::Checkbox(props) => json!(props.default),
            Editor::TagInput(_) => json!([]),
            Editor::FieldGroup(props) => Value::Array(
                (0..props.limits.min)
                    .map(|_| Value::Object(props.fields.default_state()))
                    .collect(),
            ),
        }
    }

    /// Built-in check of the editor kind. Blank values pass; presence is
    /// the job of [`Rule::Required`].
    pub fn check(&self, value: &Value) -> Vec<String> {
        let mut errors = Vec::new();
        if value.is_null() {
            return errors;
        }
        match self {
            Editor::TextInput(props) => match value.as_str() {
                None => errors.push(messages::EXPECTED_TEXT.to_string()),
                Some(text) => {
                    if props.max_length.is_some_and(|max| text.chars().count() > max) {
                        errors.push(messages::MAX_LENGTH.to_string());
                    }
                    let text = text.trim();
                    if !text.is_empty() {
                        match props.format {
                            TextFormat::Plain => {}
                            TextFormat::Url if !looks_like_url(text) => {
                                errors.push(messages::URL.to_string())
                            }
                            TextFormat::Email if !looks_like_email(text) => {
                                errors.push(messages::EMAIL.to_string())
                            }
                            _ => {}
                        }
                    }
                }
            },
            Editor::Wysiwyg(_) | Editor::IconPicker(_) => {
                if !value.is_string() {
                    errors.push(messages::EXPECTED_TEXT.to_string());
                }
            }
            Editor::Select(props) => {
                let chosen: Option<Vec<&Value>> = if props.multiple {
                    value.as_array().map(|items| items.iter().collect())
                } else {
                    Some(vec![value])
                };
                match chosen {
                    None => errors.push(messages::EXPECTED_LIST.to_string()),
                    Some(items) => {
                        let unknown = items.iter().any(|item| match item.as_str() {
                            Some("") => false,
                            Some(v) => !props.allows(v),
                            None => true,
                        });
                        if unknown {
                            errors.push(messages::UNKNOWN_OPTION.to_string());
                        }
                    }
                }
            }
            Editor::ColorSelect(props) => {
                let known = value
                    .as_str()
                    .and_then(Color::from_name)
                    .is_some_and(|c| props.palette.contains(&c));
                if !known {
                    errors.push(messages::UNKNOWN_OPTION.to_string());
                }
            }
            Editor::AlignSelect(props) => {
                let known = value
                    .as_str()
                    .and_then(Alignment::from_name)
                    .is_some_and(|a| props.allowed.contains(&a));
                if !known {
                    errors.push(messages::UNKNOWN_OPTION.to_string());
                }
            }
            Editor::ContentPicker(props) => {
                if props.multiple {
                    match value.as_array() {
                        None => errors.push(messages::EXPECTED_LIST.to_string()),
                        Some(items) => {
                            if !items.iter().all(is_reference) {
                                errors.push(messages::EXPECTED_REFERENCE.to_string());
                            }
                            if props.max_items.is_some_and(|max| items.len() > max) {
                                errors.push(messages::MAX_ITEMS.to_string());
                            }
                        }
                    }
                } else if !is_reference(value) {
                    errors.push(messages::EXPECTED_REFERENCE.to_string());
                }
            }
            Editor::FileUpload(props) => match value.as_object() {
                Some(file) if file.get("url").is_some_and(Value::is_string) => {
                    let mime = file.get("mime_type").and_then(Value::as_str);
                    if let Some(mime) = mime {
                        if !props.accept.is_empty() && !props.accept.iter().any(|k| k.matches_mime(mime)) {
                            errors.push(messages::FILE_KIND.to_string());
                        }
                    }
                    let size = file.get("size").and_then(Value::as_u64);
                    if let (Some(size), Some(max)) = (size, props.max_size_bytes) {
                        if size > max {
                            errors.push(messages::FILE_SIZE.to_string());
                        }
                    }
                }
                _ => errors.push(messages::EXPECTED_FILE.to_string()),
            },
            Editor::MultiRange(props) => {
                let bounds = value.as_array().and_then(|pair| match pair.as_slice() {
                    [lo, hi] => Some((lo.as_f64()?, hi.as_f64()?)),
                    _ => None,
                });
                let valid = bounds.is_some_and(|(lo, hi)| props.min <= lo && lo <= hi && hi <= props.max);
                if !valid {
                    errors.push(messages::RANGE.to_string());
                }
            }
            Editor::DatePicker(props) => {
                let parsed = value.as_str().is_some_and(|s| {
                    if props.include_time {
                        chrono::DateTime::parse_from_rfc3339(s).is_ok()
                    } else {
                        chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
                    }
                });
                if !parsed {
                    errors.push(messages::DATE.to_string());
                }
            }
            Editor::Checkbox(_) => {
                if !value.is_boolean() {
                    errors.push(messages::EXPECTED_BOOL.to_string());
                }
            }
            Editor::TagInput(props) => match value.as_array() {
                Some(tags) if tags.iter().all(Value::is_string) => {
                    if props.max_tags.is_some_and(|max| tags.len() > max) {
                        errors.push(messages::MAX_ITEMS.to_string());
                    }
                }
                _ => errors.push(messages::EXPECTED_LIST.to_string()),
            },
            Editor::FieldGroup(props) => match value.as_array() {
                Some(items) if items.iter().all(Value::is_object) => {
                    if items.len() < props.limits.min {
                        errors.push(messages::MIN_ITEMS.to_string());
                    } else if items.len() > props.limits.max {
                        errors.push(messages::MAX_ITEMS.to_string());
                    }
                }
                _ => errors.push(messages::EXPECTED_LIST.to_string()),
            },
        }
        errors
    }
}

/// Null, whitespace-only text, an empty list, or a file without a URL.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty() || map.get("url").is_some_and(|u| u.as_str() == Some("")),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn text_len(value: &Value) -> usize {
    value.as_str().map_or(0, |s| s.chars().count())
}

fn item_count(value: &Value) -> usize {
    value.as_array().map_or(0, Vec::len)
}

fn is_reference(value: &Value) -> bool {
    value.as_i64().is_some_and(|id| id > 0)
}

fn push_unique(errors: &mut Vec<String>, message: &str) {
    if !errors.iter().any(|e| e == message) {
        errors.push(message.to_string());
    }
}

fn looks_like_url(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    match s.strip_prefix("https://").or_else(|| s.strip_prefix("http://")) {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
            host.contains('.') || host.starts_with("localhost")
        }
        None => s.starts_with('/'),
    }
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.contains('@') && domain.contains('.') && !domain.ends_with('.')
        }
        None => false,
    }
}
