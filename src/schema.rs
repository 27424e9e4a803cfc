//! Record Schemas
//!
//! Static record types for the five collections together with the total
//! validation functions that turn a raw JSON value into a normalized record.
//!
//! Validation keeps only the declared fields and coerces values to the declared
//! types:
//! - integers accept JSON integers, integral floats and numeric strings
//! - strings accept JSON strings and JSON numbers
//! - nested objects are validated recursively and report dotted field paths
//!
//! A record either validates completely or is rejected; no partially filled
//! record is ever produced.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::SchemaError;

/// A record type with a fixed field set that can be validated from raw JSON
pub trait Schema: Sized + Serialize {
    /// Validate and normalize a raw JSON value
    fn validate(raw: &Value) -> Result<Self, SchemaError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub user_id: i64,
    pub id: i64,
    pub title: String,
    pub body: String,
}

impl Schema for Post {
    fn validate(raw: &Value) -> Result<Self, SchemaError> {
        let fields = Fields::of(raw)?;
        Ok(Self {
            user_id: fields.int("userId")?,
            id: fields.int("id")?,
            title: fields.string("title")?,
            body: fields.string("body")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub post_id: i64,
    pub id: i64,
    pub name: String,
    pub email: String,
    pub body: String,
}

impl Schema for Comment {
    fn validate(raw: &Value) -> Result<Self, SchemaError> {
        let fields = Fields::of(raw)?;
        Ok(Self {
            post_id: fields.int("postId")?,
            id: fields.int("id")?,
            name: fields.string("name")?,
            email: fields.string("email")?,
            body: fields.string("body")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub user_id: i64,
    pub id: i64,
    pub title: String,
}

impl Schema for Album {
    fn validate(raw: &Value) -> Result<Self, SchemaError> {
        let fields = Fields::of(raw)?;
        Ok(Self {
            user_id: fields.int("userId")?,
            id: fields.int("id")?,
            title: fields.string("title")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub album_id: i64,
    pub id: i64,
    pub title: String,
    pub url: String,
    pub thumbnail_url: String,
}

impl Schema for Photo {
    fn validate(raw: &Value) -> Result<Self, SchemaError> {
        let fields = Fields::of(raw)?;
        Ok(Self {
            album_id: fields.int("albumId")?,
            id: fields.int("id")?,
            title: fields.string("title")?,
            url: fields.string("url")?,
            thumbnail_url: fields.string("thumbnailUrl")?,
        })
    }
}

/// Postal address nested in a [`User`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    /// Free-form coordinates, serialized as `null` when absent
    pub geo: Option<Map<String, Value>>,
}

impl Schema for Address {
    fn validate(raw: &Value) -> Result<Self, SchemaError> {
        let fields = Fields::of(raw)?;
        Ok(Self {
            street: fields.string("street")?,
            suite: fields.string("suite")?,
            city: fields.string("city")?,
            zipcode: fields.string("zipcode")?,
            geo: fields.optional_mapping("geo")?,
        })
    }
}

/// Employer nested in a [`User`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub catch_phrase: String,
    pub bs: String,
}

impl Schema for Company {
    fn validate(raw: &Value) -> Result<Self, SchemaError> {
        let fields = Fields::of(raw)?;
        Ok(Self {
            name: fields.string("name")?,
            catch_phrase: fields.string("catchPhrase")?,
            bs: fields.string("bs")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub address: Address,
    pub phone: String,
    pub website: String,
    pub company: Company,
}

impl Schema for User {
    fn validate(raw: &Value) -> Result<Self, SchemaError> {
        let fields = Fields::of(raw)?;
        Ok(Self {
            id: fields.int("id")?,
            name: fields.string("name")?,
            username: fields.string("username")?,
            email: fields.string("email")?,
            address: fields.object("address")?,
            phone: fields.string("phone")?,
            website: fields.string("website")?,
            company: fields.object("company")?,
        })
    }
}

/// The five record schemas known to the crawler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Posts,
    Comments,
    Albums,
    Photos,
    Users,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 5] = [
        CollectionKind::Posts,
        CollectionKind::Comments,
        CollectionKind::Albums,
        CollectionKind::Photos,
        CollectionKind::Users,
    ];

    /// Collection name, which is also the URL path segment and output file stem
    pub fn name(&self) -> &'static str {
        match self {
            CollectionKind::Posts => "posts",
            CollectionKind::Comments => "comments",
            CollectionKind::Albums => "albums",
            CollectionKind::Photos => "photos",
            CollectionKind::Users => "users",
        }
    }

    /// Validate a raw value against this collection's schema
    pub fn validate(&self, raw: &Value) -> Result<NormalizedRecord, SchemaError> {
        Ok(match self {
            CollectionKind::Posts => NormalizedRecord::Post(Post::validate(raw)?),
            CollectionKind::Comments => NormalizedRecord::Comment(Comment::validate(raw)?),
            CollectionKind::Albums => NormalizedRecord::Album(Album::validate(raw)?),
            CollectionKind::Photos => NormalizedRecord::Photo(Photo::validate(raw)?),
            CollectionKind::Users => NormalizedRecord::User(User::validate(raw)?),
        })
    }
}

/// A record that passed validation, serialized without any variant tag
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedRecord {
    Post(Post),
    Comment(Comment),
    Album(Album),
    Photo(Photo),
    User(User),
}

/// Typed field access over a raw JSON object
struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    fn of(raw: &'a Value) -> Result<Self, SchemaError> {
        match raw {
            Value::Object(map) => Ok(Self { map }),
            other => Err(SchemaError::NotAnObject {
                found: json_type(other).to_string(),
            }),
        }
    }

    fn required(&self, field: &str) -> Result<&'a Value, SchemaError> {
        self.map.get(field).ok_or_else(|| SchemaError::MissingField {
            field: field.to_string(),
        })
    }

    fn int(&self, field: &str) -> Result<i64, SchemaError> {
        let value = self.required(field)?;
        coerce_int(value).ok_or_else(|| wrong_type(field, "integer", value))
    }

    fn string(&self, field: &str) -> Result<String, SchemaError> {
        let value = self.required(field)?;
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(wrong_type(field, "string", other)),
        }
    }

    fn object<T: Schema>(&self, field: &str) -> Result<T, SchemaError> {
        let value = self.required(field)?;
        T::validate(value).map_err(|e| e.nested_under(field))
    }

    fn optional_mapping(&self, field: &str) -> Result<Option<Map<String, Value>>, SchemaError> {
        match self.map.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map.clone())),
            Some(other) => Err(wrong_type(field, "object", other)),
        }
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i);
            }
            if n.is_u64() {
                return None;
            }
            let f = n.as_f64()?;
            if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                Some(f as i64)
            } else {
                None
            }
        }
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn wrong_type(field: &str, expected: &'static str, found: &Value) -> SchemaError {
    SchemaError::WrongType {
        field: field.to_string(),
        expected,
        found: json_type(found).to_string(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
