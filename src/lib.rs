//! Schema-driven content transformation engine for file-backed structured
//! content: a declarative content model compiles into validators,
//! bidirectional value transforms, a frontmatter-aware codec, and derived
//! file names. The crate is synchronous and performs no I/O; storage,
//! caching, and presentation are external collaborators.

pub mod codec;
pub mod config;
pub mod filename;
pub mod registry;
pub mod schema;
pub mod transform;
pub mod validate;

// Re-export commonly used types
pub use codec::{parse, stringify, CodecError, CodecOptions, BODY_KEY};
pub use config::{
    normalize_source, normalize_value, resolve_by_path, resolve_content_by_name,
    resolve_media_by_name, ConfigIssue, Normalized, Severity, DEFAULT_FILENAME_PATTERN,
};
pub use filename::{generate, generate_at};
pub use registry::{BuiltinType, FieldTypeHandler, RegistryError, TypeRegistry};
pub use schema::{
    Config, ContentKind, ContentTypeDefinition, DelimiterSpec, Dialect, FieldDefinition,
    FieldType, ListSpec, MediaDefinition, PatternSpec, SerializationFormat, ViewOptions,
    OBJECT_TAG,
};
pub use transform::{deep_map, default_values, read_values, write_values};
pub use validate::{build_validator, ValidationIssue, ValidatorKind, ValidatorNode};
