//! Materialization types
//!
//! Field paths, field kinds and the hook pair injectable into materialization.

use crate::types::Record;
use std::fmt;

// ============================================================================
// Field Path
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside a record, e.g. `properties.labels[1].labelName`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The path of the record itself
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of a named field below this one
    #[must_use]
    pub fn key(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(name.into()));
        Self { segments }
    }

    /// Path of an array element below this one
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, "$");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

// ============================================================================
// Field Kind
// ============================================================================

/// Declared type of a schema field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Text value
    String,
    /// Signed integer
    Integer,
    /// Floating point number
    Number,
    /// Boolean flag
    Boolean,
    /// RFC 3339 timestamp
    DateTime,
    /// Array of text values
    StringArray,
    /// Custom scalar conversion (enums, identifiers, ...)
    Scalar(&'static str),
    /// Nested record of the named domain type
    Object(&'static str),
    /// Array of nested records of the named domain type
    ObjectArray(&'static str),
}

impl FieldKind {
    /// Check if values of this kind are nested records
    pub fn is_nested(&self) -> bool {
        matches!(self, Self::Object(_) | Self::ObjectArray(_))
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => write!(f, "string"),
            FieldKind::Integer => write!(f, "integer"),
            FieldKind::Number => write!(f, "number"),
            FieldKind::Boolean => write!(f, "boolean"),
            FieldKind::DateTime => write!(f, "datetime"),
            FieldKind::StringArray => write!(f, "array of string"),
            FieldKind::Scalar(name) => write!(f, "{name}"),
            FieldKind::Object(name) => write!(f, "object {name}"),
            FieldKind::ObjectArray(name) => write!(f, "array of {name}"),
        }
    }
}

// ============================================================================
// Hooks
// ============================================================================

/// Whether materialization should proceed after the `before` hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookFlow {
    /// Convert the record as usual
    #[default]
    Continue,
    /// Skip conversion and return the default object
    Stop,
}

type BeforeHook = Box<dyn Fn(&mut Record) -> HookFlow + Send + Sync>;
type AfterHook<T> = Box<dyn Fn(&mut T, &Record) -> anyhow::Result<()> + Send + Sync>;

/// Pre-process / post-process callbacks around materialization of `T`
///
/// `before` sees the raw record and may rewrite it or stop conversion.
/// `after` sees the fully built object together with the record it came from.
pub struct Hooks<T> {
    pub(crate) before: Option<BeforeHook>,
    pub(crate) after: Option<AfterHook<T>>,
}

impl<T> Hooks<T> {
    /// Hooks that do nothing
    pub fn none() -> Self {
        Self {
            before: None,
            after: None,
        }
    }

    /// Set the pre-process callback
    #[must_use]
    pub fn before<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Record) -> HookFlow + Send + Sync + 'static,
    {
        self.before = Some(Box::new(f));
        self
    }

    /// Set the post-process callback
    #[must_use]
    pub fn after<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut T, &Record) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.after = Some(Box::new(f));
        self
    }

    /// Check if any hook is set
    pub fn is_empty(&self) -> bool {
        self.before.is_none() && self.after.is_none()
    }
}

impl<T> Default for Hooks<T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T> fmt::Debug for Hooks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}
