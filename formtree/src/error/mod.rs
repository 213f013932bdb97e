//! Error types

mod path;
mod schema;
mod submit;

pub use path::*;
pub use schema::*;
pub use submit::*;

/// Umbrella error for engine operations that can fail either way.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// Schema construction failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Path resolution failed.
    #[error(transparent)]
    Path(#[from] PathError),
}
