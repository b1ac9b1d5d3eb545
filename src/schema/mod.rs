mod blocks;
mod types;

pub use blocks::{substitute_block, TagTemplate};
pub use types::{
    Config, ContentKind, ContentTypeDefinition, DelimiterSpec, Dialect, FieldDefinition,
    FieldType, ListSpec, MediaDefinition, PatternSpec, SerializationFormat, ViewOptions,
};

/// Type tag of the structural nested-object field.
pub const OBJECT_TAG: &str = "object";

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
