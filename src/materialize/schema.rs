//! Static per-type schema tables
//!
//! A `Schema<T>` maps wire field names to typed setters. Schemas are built
//! once per domain type (usually inside a `LazyLock`) and are read-only
//! afterwards.

use super::coerce;
use super::types::{FieldKind, FieldPath};
use super::Materialize;
use crate::error::{Error, Result};
use crate::types::{describe_value, JsonValue, Record};
use chrono::{DateTime, Utc};
use std::fmt;

type Setter<T> = Box<dyn Fn(&mut T, &JsonValue, &FieldPath) -> Result<()> + Send + Sync>;

fn boxed_setter<T, F>(f: F) -> Setter<T>
where
    F: Fn(&mut T, &JsonValue, &FieldPath) -> Result<()> + Send + Sync + 'static,
{
    Box::new(f)
}

/// Scalar conversion function: raw value at a path to a primitive
pub type ScalarConverter<V> = fn(&JsonValue, &FieldPath) -> Result<V>;

/// One declared field of a domain type
pub struct FieldSpec<T> {
    name: &'static str,
    kind: FieldKind,
    setter: Setter<T>,
}

impl<T> FieldSpec<T> {
    /// Wire name of the field
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared kind of the field
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }
}

impl<T> fmt::Debug for FieldSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Field table for a domain type
pub struct Schema<T> {
    type_name: &'static str,
    fields: Vec<FieldSpec<T>>,
}

impl<T: 'static> Schema<T> {
    /// Start building a schema for the named type
    pub fn builder(type_name: &'static str) -> SchemaBuilder<T> {
        SchemaBuilder {
            type_name,
            fields: Vec::new(),
        }
    }

    /// Name of the domain type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Declared fields in registration order
    pub fn fields(&self) -> &[FieldSpec<T>] {
        &self.fields
    }

    /// Look up a declared field by wire name
    pub fn field(&self, name: &str) -> Option<&FieldSpec<T>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Populate `target` from `record`
    ///
    /// Keys missing from the record, or set to `null`, leave the field at its
    /// default. Keys not declared in the schema are ignored.
    pub(crate) fn apply(&self, target: &mut T, record: &Record, path: &FieldPath) -> Result<()> {
        for field in &self.fields {
            match record.get(field.name) {
                None | Some(JsonValue::Null) => {}
                Some(value) => (field.setter)(target, value, &path.key(field.name))?,
            }
        }
        Ok(())
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Builder for `Schema<T>`
pub struct SchemaBuilder<T> {
    type_name: &'static str,
    fields: Vec<FieldSpec<T>>,
}

impl<T: 'static> SchemaBuilder<T> {
    fn push(mut self, name: &'static str, kind: FieldKind, setter: Setter<T>) -> Self {
        assert!(
            !self.fields.iter().any(|f| f.name == name),
            "field '{name}' registered twice on {}",
            self.type_name
        );
        self.fields.push(FieldSpec { name, kind, setter });
        self
    }

    /// Register a field with a custom scalar conversion
    pub fn scalar<V: 'static>(
        self,
        name: &'static str,
        kind: FieldKind,
        convert: ScalarConverter<V>,
        access: fn(&mut T) -> &mut Option<V>,
    ) -> Self {
        let setter = boxed_setter(move |target, value, path| {
            *access(target) = Some(convert(value, path)?);
            Ok(())
        });
        self.push(name, kind, setter)
    }

    /// Register a text field
    pub fn string(self, name: &'static str, access: fn(&mut T) -> &mut Option<String>) -> Self {
        self.scalar(name, FieldKind::String, coerce::to_string, access)
    }

    /// Register an integer field
    pub fn integer(self, name: &'static str, access: fn(&mut T) -> &mut Option<i64>) -> Self {
        self.scalar(name, FieldKind::Integer, coerce::to_i64, access)
    }

    /// Register a floating point field
    pub fn number(self, name: &'static str, access: fn(&mut T) -> &mut Option<f64>) -> Self {
        self.scalar(name, FieldKind::Number, coerce::to_f64, access)
    }

    /// Register a boolean field
    pub fn boolean(self, name: &'static str, access: fn(&mut T) -> &mut Option<bool>) -> Self {
        self.scalar(name, FieldKind::Boolean, coerce::to_bool, access)
    }

    /// Register a timestamp field
    pub fn datetime(
        self,
        name: &'static str,
        access: fn(&mut T) -> &mut Option<DateTime<Utc>>,
    ) -> Self {
        self.scalar(name, FieldKind::DateTime, coerce::to_datetime, access)
    }

    /// Register an array-of-text field
    pub fn strings(self, name: &'static str, access: fn(&mut T) -> &mut Vec<String>) -> Self {
        let setter = boxed_setter(move |target, value, path| {
            *access(target) = coerce::to_string_list(value, path)?;
            Ok(())
        });
        self.push(name, FieldKind::StringArray, setter)
    }

    /// Register a nested object field
    pub fn object<N: Materialize>(
        self,
        name: &'static str,
        access: fn(&mut T) -> &mut Option<N>,
    ) -> Self {
        let setter = boxed_setter(move |target, value, path| {
            *access(target) = Some(materialize_nested::<N>(value, path)?);
            Ok(())
        });
        self.push(name, FieldKind::Object(N::TYPE_NAME), setter)
    }

    /// Register an array-of-objects field
    pub fn objects<N: Materialize>(
        self,
        name: &'static str,
        access: fn(&mut T) -> &mut Vec<N>,
    ) -> Self {
        let setter = boxed_setter(move |target, value, path| {
            let JsonValue::Array(items) = value else {
                return Err(Error::mismatch(
                    path.to_string(),
                    FieldKind::ObjectArray(N::TYPE_NAME).to_string(),
                    describe_value(value),
                ));
            };
            // Built into a local vector so a failing element leaves no partial array
            let converted = items
                .iter()
                .enumerate()
                .map(|(i, item)| materialize_nested::<N>(item, &path.index(i)))
                .collect::<Result<Vec<N>>>()?;
            *access(target) = converted;
            Ok(())
        });
        self.push(name, FieldKind::ObjectArray(N::TYPE_NAME), setter)
    }

    /// Finish the schema
    pub fn build(self) -> Schema<T> {
        Schema {
            type_name: self.type_name,
            fields: self.fields,
        }
    }
}

/// Materialize a nested value, which must itself be a record
pub(crate) fn materialize_nested<N: Materialize>(
    value: &JsonValue,
    path: &FieldPath,
) -> Result<N> {
    let JsonValue::Object(record) = value else {
        return Err(Error::mismatch(
            path.to_string(),
            FieldKind::Object(N::TYPE_NAME).to_string(),
            describe_value(value),
        ));
    };
    let mut target = N::default();
    N::schema().apply(&mut target, record, path)?;
    Ok(target)
}
