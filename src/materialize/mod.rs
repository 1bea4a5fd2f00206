//! Record materialization module
//!
//! Converts raw records (string-keyed JSON maps) into strongly typed domain
//! objects.
//!
//! # Overview
//!
//! Every domain type implements [`Materialize`] and exposes a static
//! [`Schema`] built once on first use. The schema maps each wire field name to
//! a typed setter:
//!
//! - scalar fields go through a coercion (`string`, `integer`, `boolean`, ...)
//! - nested objects and arrays of objects recurse through the nested type's
//!   own schema
//!
//! Missing keys and `null` values leave the field at its default, unknown keys
//! are ignored, and a value that cannot be coerced fails with
//! `SchemaMismatch` carrying the full field path. No partially built object is
//! ever returned.

pub mod coerce;
mod schema;
mod types;

pub use schema::{FieldSpec, ScalarConverter, Schema, SchemaBuilder};
pub use types::{FieldKind, FieldPath, HookFlow, Hooks};

use crate::error::{Error, Result};
use crate::types::Record;

/// A domain type that can be built from a record
///
/// ```rust,ignore
/// impl Materialize for IncidentLabel {
///     const TYPE_NAME: &'static str = "IncidentLabel";
///
///     fn schema() -> &'static Schema<Self> {
///         static SCHEMA: LazyLock<Schema<IncidentLabel>> = LazyLock::new(|| {
///             Schema::<IncidentLabel>::builder(IncidentLabel::TYPE_NAME)
///                 .string("labelName", |l| &mut l.label_name)
///                 .build()
///         });
///         &SCHEMA
///     }
/// }
/// ```
pub trait Materialize: Default + Sized + 'static {
    /// Name used in diagnostics and schema descriptions
    const TYPE_NAME: &'static str;

    /// The field table for this type
    fn schema() -> &'static Schema<Self>;
}

/// Build `T` from a record with no hooks
pub fn materialize<T: Materialize>(record: Record) -> Result<T> {
    materialize_with(record, &Hooks::none())
}

/// Build `T` from a record, running the given hooks around conversion
pub fn materialize_with<T: Materialize>(mut record: Record, hooks: &Hooks<T>) -> Result<T> {
    if let Some(before) = &hooks.before {
        if before(&mut record) == HookFlow::Stop {
            return Ok(T::default());
        }
    }

    let mut target = T::default();
    T::schema().apply(&mut target, &record, &FieldPath::root())?;

    if let Some(after) = &hooks.after {
        after(&mut target, &record).map_err(|source| Error::Hook {
            type_name: T::TYPE_NAME.to_string(),
            source,
        })?;
    }

    Ok(target)
}

/// Reusable materializer for one domain type, carrying its hooks
#[derive(Debug)]
pub struct Materializer<T> {
    hooks: Hooks<T>,
}

impl<T: Materialize> Materializer<T> {
    /// Create a materializer without hooks
    pub fn new() -> Self {
        Self {
            hooks: Hooks::none(),
        }
    }

    /// Create a materializer with hooks
    pub fn with_hooks(hooks: Hooks<T>) -> Self {
        Self { hooks }
    }

    /// Convert one record
    pub fn materialize(&self, record: Record) -> Result<T> {
        materialize_with(record, &self.hooks)
    }

    /// Convert a whole page; any failing record fails the page
    pub fn materialize_page(&self, records: Vec<Record>) -> Result<Vec<T>> {
        records
            .into_iter()
            .map(|record| self.materialize(record))
            .collect()
    }
}

impl<T: Materialize> Default for Materializer<T> {
    fn default() -> Self {
        Self::new()
    }
}
