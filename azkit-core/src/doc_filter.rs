//! # doc_filter: field projection for documents
//!
//! A [`DocFilter`] reduces a document (a Cosmos DB or MongoDB record, a JSON
//! object read from disk, a blob listing entry) to the attributes a caller
//! wants to see or export, per a fixed set of inclusions and exclusions.
//!
//! ## Selection rules
//! - No inclusions: every attribute is kept unless it is excluded.
//! - With inclusions: only included attributes that are present in the
//!   document are kept, and exclusions still apply.
//! - An attribute listed in both sets is always dropped.
//! - Included attributes missing from the document are ignored; no
//!   placeholder keys are inserted.
//!
//! The filter never looks at values and never mutates its input. It is
//! immutable after construction, so one instance can be shared freely
//! between threads and applied to any number of documents.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::debug;

/// A single document: attribute name to arbitrary JSON value.
pub type Document = Map<String, Value>;

/// Errors raised when a value handed to the filter is not a document.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Serialised form of a [`DocFilter`], as read from YAML or JSON config.
/// Missing or null lists mean "empty".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub include_attrs: Option<Vec<String>>,
    #[serde(default)]
    pub exclude_attrs: Option<Vec<String>>,
}

/// Immutable include/exclude projection over documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "FilterConfig")]
pub struct DocFilter {
    include_attrs: BTreeSet<String>,
    exclude_attrs: BTreeSet<String>,
}

impl DocFilter {
    pub fn new<I, E, S, T>(include_attrs: I, exclude_attrs: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        let filter = Self {
            include_attrs: include_attrs.into_iter().map(Into::into).collect(),
            exclude_attrs: exclude_attrs.into_iter().map(Into::into).collect(),
        };
        debug!(
            include = ?filter.include_attrs,
            exclude = ?filter.exclude_attrs,
            "Constructed DocFilter"
        );
        filter
    }

    /// Build a filter where `None` stands for an empty set.
    pub fn from_options<S, T>(include_attrs: Option<Vec<S>>, exclude_attrs: Option<Vec<T>>) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        Self::new(
            include_attrs.unwrap_or_default(),
            exclude_attrs.unwrap_or_default(),
        )
    }

    /// Keep only the given attributes.
    pub fn including<I, S>(include_attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(include_attrs, std::iter::empty::<String>())
    }

    /// Keep everything except the given attributes.
    pub fn excluding<E, T>(exclude_attrs: E) -> Self
    where
        E: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::new(std::iter::empty::<String>(), exclude_attrs)
    }

    pub fn include_attrs(&self) -> &BTreeSet<String> {
        &self.include_attrs
    }

    pub fn exclude_attrs(&self) -> &BTreeSet<String> {
        &self.exclude_attrs
    }

    /// Project `doc` into a new document per the include/exclude sets.
    pub fn filter(&self, doc: &Document) -> Document {
        if self.include_attrs.is_empty() {
            doc.iter()
                .filter(|(attr, _)| !self.exclude_attrs.contains(*attr))
                .map(|(attr, value)| (attr.clone(), value.clone()))
                .collect()
        } else {
            self.include_attrs
                .iter()
                .filter(|attr| !self.exclude_attrs.contains(*attr))
                .filter_map(|attr| doc.get(attr).map(|value| (attr.clone(), value.clone())))
                .collect()
        }
    }

    /// Like [`DocFilter::filter`], for an untyped JSON value. Anything other
    /// than an object is rejected.
    pub fn filter_value(&self, value: &Value) -> Result<Value, FilterError> {
        match value {
            Value::Object(doc) => Ok(Value::Object(self.filter(doc))),
            other => Err(FilterError::NotAnObject(json_kind(other))),
        }
    }

    /// Filter a batch of documents, preserving their order.
    pub fn filter_all(&self, docs: &[Document]) -> Vec<Document> {
        docs.iter().map(|doc| self.filter(doc)).collect()
    }
}

impl From<FilterConfig> for DocFilter {
    fn from(config: FilterConfig) -> Self {
        DocFilter::from_options(config.include_attrs, config.exclude_attrs)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
