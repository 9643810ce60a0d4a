//! Input validation and the field-error mapping.
//!
//! # Responsibilities
//! - Collect per-field complaints with their location (`body`, `query`, `path`)
//! - Flatten locations into dotted keys for the error envelope
//! - Provide extractors that deserialize and then validate request input
//!
//! # Design Decisions
//! - The `body` root segment is dropped from keys; `query` and `path` are kept
//! - When one field reports several errors the last one wins on its key
//! - Missing JSON fields are reported as `required` on the field itself
//! - Deserialization failures are located by their serde path, and parsing
//!   keeps going past them so every invalid field is reported at once

use std::collections::BTreeSet;
use std::fmt;

use axum::{
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_path_to_error::{Path, Segment};

use crate::http::error::ApiError;
use crate::http::response::FieldErrorMap;

/// Message used for absent required fields.
pub const REQUIRED: &str = "required";

/// One segment of a field location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocSegment {
    Key(String),
    Index(usize),
}

impl LocSegment {
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    fn is_body_root(&self) -> bool {
        matches!(self, Self::Key(key) if key == "body")
    }
}

impl fmt::Display for LocSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// A single complaint about an input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub loc: Vec<LocSegment>,
    pub msg: String,
}

impl FieldError {
    pub fn new(loc: Vec<LocSegment>, msg: impl Into<String>) -> Self {
        Self { loc, msg: msg.into() }
    }

    /// Complaint about a field of the JSON body.
    pub fn body(field: &str, msg: impl Into<String>) -> Self {
        Self::new(vec![LocSegment::key("body"), LocSegment::key(field)], msg)
    }

    /// Complaint about a query string parameter.
    pub fn query(param: &str, msg: impl Into<String>) -> Self {
        Self::new(vec![LocSegment::key("query"), LocSegment::key(param)], msg)
    }

    /// Complaint about a path parameter.
    pub fn path(param: &str, msg: impl Into<String>) -> Self {
        Self::new(vec![LocSegment::key("path"), LocSegment::key(param)], msg)
    }

    /// Dotted key with `body` segments removed.
    pub fn key(&self) -> String {
        let key = self
            .loc
            .iter()
            .filter(|segment| !segment.is_body_root())
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".");
        if key.is_empty() {
            "body".to_string()
        } else {
            key
        }
    }
}

/// Ordered list of field errors, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Flatten into the envelope mapping. Later entries overwrite earlier
    /// ones with the same key.
    pub fn to_map(&self) -> FieldErrorMap {
        self.0
            .iter()
            .map(|error| (error.key(), error.msg.clone()))
            .collect()
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", error.key(), error.msg)?;
        }
        Ok(())
    }
}

impl FromIterator<FieldError> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Semantic checks run after a request value has been deserialized.
pub trait Validate {
    /// Returns every problem found, not just the first.
    fn validate(&self) -> Result<(), FieldErrors>;
}

/// Deserialize a JSON body into `T` and validate it.
///
/// A field that fails to deserialize is reported and dropped, and parsing is
/// retried, so one response lists every bad field. [`Validate`] complaints on
/// a key that already failed to deserialize are not repeated.
pub fn validate_json<T>(value: Value) -> Result<T, FieldErrors>
where
    T: DeserializeOwned + Validate,
{
    collect_errors(
        "body",
        value,
        |value: &Value| serde_path_to_error::deserialize(value),
        remove_at,
    )
}

/// Deserialize a URL query string into `T` and validate it.
pub fn validate_query<T>(query: &str) -> Result<T, FieldErrors>
where
    T: DeserializeOwned + Validate,
{
    let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes()).into_owned().collect();
    collect_errors(
        "query",
        pairs,
        |pairs: &Vec<(String, String)>| {
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs.iter())
                .finish();
            serde_path_to_error::deserialize(serde_urlencoded::Deserializer::new(
                form_urlencoded::parse(encoded.as_bytes()),
            ))
        },
        |pairs, path| match path.iter().next() {
            Some(Segment::Map { key }) => {
                let before = pairs.len();
                pairs.retain(|(name, _)| name != key);
                pairs.len() != before
            }
            _ => false,
        },
    )
}

fn collect_errors<I, T, E>(
    root: &str,
    mut input: I,
    parse: impl Fn(&I) -> Result<T, serde_path_to_error::Error<E>>,
    discard: impl Fn(&mut I, &Path) -> bool,
) -> Result<T, FieldErrors>
where
    T: Validate,
    E: fmt::Display,
{
    let mut errors = FieldErrors::new();
    let parsed = loop {
        match parse(&input) {
            Ok(parsed) => break Some(parsed),
            Err(err) => {
                errors.push(located(root, &err));
                if !discard(&mut input, err.path()) {
                    break None;
                }
            }
        }
    };

    let Some(parsed) = parsed else {
        return Err(errors);
    };
    if let Err(invalid) = parsed.validate() {
        let reported: BTreeSet<String> = errors.iter().map(FieldError::key).collect();
        for error in &invalid {
            if !reported.contains(&error.key()) {
                errors.push(error.clone());
            }
        }
    }
    errors.into_result().map(|()| parsed)
}

/// Field error for a deserialization failure, located under `root`.
fn located<E: fmt::Display>(root: &str, err: &serde_path_to_error::Error<E>) -> FieldError {
    let mut loc = vec![LocSegment::key(root)];
    for segment in err.path().iter() {
        match segment {
            Segment::Map { key } => loc.push(LocSegment::key(key.as_str())),
            Segment::Seq { index } => loc.push(LocSegment::Index(*index)),
            Segment::Enum { variant } => loc.push(LocSegment::key(variant.as_str())),
            _ => {}
        }
    }

    let msg = err.inner().to_string();
    // Serde reports a missing field on its parent, naming it only in the text.
    if let Some(field) = missing_field(&msg) {
        loc.push(LocSegment::key(field));
        return FieldError::new(loc, REQUIRED);
    }
    FieldError::new(loc, msg)
}

fn missing_field(message: &str) -> Option<&str> {
    message.strip_prefix("missing field `")?.split('`').next()
}

/// Remove the object entry `path` points at. Array elements are left alone.
fn remove_at(value: &mut Value, path: &Path) -> bool {
    let segments: Vec<&Segment> = path.iter().collect();
    let Some((last, parents)) = segments.split_last() else {
        return false;
    };

    let mut current = value;
    for segment in parents.iter().copied() {
        current = match (segment, current) {
            (Segment::Map { key }, Value::Object(map)) => match map.get_mut(key.as_str()) {
                Some(next) => next,
                None => return false,
            },
            (Segment::Seq { index }, Value::Array(items)) => match items.get_mut(*index) {
                Some(next) => next,
                None => return false,
            },
            _ => return false,
        };
    }

    match (*last, current) {
        (Segment::Map { key }, Value::Object(map)) => map.remove(key.as_str()).is_some(),
        _ => false,
    }
}

/// JSON body extractor that also runs [`Validate`].
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await?;
        validate_json(value).map(Self).map_err(ApiError::InvalidInput)
    }
}

/// Query string extractor that also runs [`Validate`].
#[derive(Debug, Clone)]
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        validate_query(query).map(Self).map_err(ApiError::InvalidInput)
    }
}
