//! Validation message keys.
//!
//! Messages are i18n keys; the surrounding layer resolves them to text.

pub const REQUIRED: &str = "validation.required";
pub const EXPECTED_TEXT: &str = "validation.expected_text";
pub const EXPECTED_BOOL: &str = "validation.expected_bool";
pub const EXPECTED_LIST: &str = "validation.expected_list";
pub const EXPECTED_REFERENCE: &str = "validation.expected_reference";
pub const EXPECTED_FILE: &str = "validation.expected_file";
pub const MIN_LENGTH: &str = "validation.min_length";
pub const MAX_LENGTH: &str = "validation.max_length";
pub const URL: &str = "validation.url";
pub const EMAIL: &str = "validation.email";
pub const UNKNOWN_OPTION: &str = "validation.unknown_option";
pub const MIN_ITEMS: &str = "validation.min_items";
pub const MAX_ITEMS: &str = "validation.max_items";
pub const FILE_KIND: &str = "validation.file_kind";
pub const FILE_SIZE: &str = "validation.file_size";
pub const RANGE: &str = "validation.range";
pub const DATE: &str = "validation.date";
