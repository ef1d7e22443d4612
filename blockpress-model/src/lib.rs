//! Block schema model for Blockpress.
//!
//! Defines the types every block type and every persistence path share:
//! - [`FieldDescriptor`] and the closed [`Editor`] union: one editable property
//! - [`Schema`]: ordered field declarations that also produce default state
//! - [`ContentBlockConfig`]: the edit-time aggregate of one block
//! - [`PersistedContentBlockRow`] / [`BlockRowDraft`]: the storage-facing row
//! - [`validate`]: the pure save-time validation pass
//!
//! Labels and validation messages are i18n keys; resolving them to text is
//! the caller's concern.

mod config;
mod field;
pub mod messages;
pub mod options;
mod row;
mod schema;
mod validate;

pub use config::{
    move_block, positions_are_dense, reindex_positions, BlockSection, BlockState, ComponentPayload,
    Components, ContentBlockConfig,
};
pub use field::{
    is_blank, AlignSelectProps, CheckboxProps, ColorSelectProps, ContentPickerProps, DatePickerProps,
    Editor, FieldDescriptor, FieldGroupProps, FileUploadProps, IconPickerProps, MultiRangeProps, Rule,
    SelectOption, SelectProps, TagInputProps, TextInputProps, Validation, WysiwygProps,
};
pub use row::{BlockRowDraft, BlockVariables, PersistedContentBlockRow};
pub use schema::{Limits, Schema};
pub use validate::{cardinality_ok, validate, FieldPath, PathSegment, ValidationReport};

/// A state object: field key → JSON value.
pub type StateMap = serde_json::Map<String, serde_json::Value>;

/// Result type for in-place edits of a block.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised by field-level setters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("index {index} out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("block body is not repeatable")]
    NotRepeated,

    #[error("cannot add more than {max} items")]
    LimitReached { max: usize },

    #[error("cannot go below {min} items")]
    BelowMinimum { min: usize },
}
