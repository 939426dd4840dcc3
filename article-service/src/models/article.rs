use mongodb::bson::{self, Document};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

pub const CODIGO: &str = "codigo";
pub const PRECIO: &str = "precio";
/// Store-owned identifier; never accepted from callers nor returned.
pub const STORE_ID: &str = "_id";

/// A supermarket article as persisted.
///
/// Only `codigo`, `nombre`, `categoria` and `precio` carry meaning for the
/// service; any other field the caller sent is kept untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Article(Map<String, Value>);

impl Article {
    /// Accepts any JSON object without an `_id`; other JSON values are not
    /// articles.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) if !fields.contains_key(STORE_ID) => Some(Self(fields)),
            _ => None,
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn has_codigo(&self, codigo: i64) -> bool {
        match self.0.get(CODIGO) {
            Some(Value::Number(n)) => match n.as_i64() {
                Some(value) => value == codigo,
                None => n.as_f64() == Some(codigo as f64),
            },
            _ => false,
        }
    }

    /// Non-string values never match, mirroring a `$regex` filter.
    pub fn field_matches(&self, field: ArticleField, pattern: &Regex) -> bool {
        self.0
            .get(field.as_str())
            .and_then(Value::as_str)
            .is_some_and(|value| pattern.is_match(value))
    }

    pub fn set_precio(&mut self, precio: Number) {
        self.0.insert(PRECIO.to_string(), Value::Number(precio));
    }

    pub fn to_document(&self) -> Result<Document, bson::ser::Error> {
        bson::to_document(&self.0)
    }
}

impl From<Document> for Article {
    fn from(document: Document) -> Self {
        Self(
            document
                .into_iter()
                .map(|(key, value)| (key, value.into_relaxed_extjson()))
                .collect(),
        )
    }
}

/// Text fields that support substring search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleField {
    Nombre,
    Categoria,
}

impl ArticleField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleField::Nombre => "nombre",
            ArticleField::Categoria => "categoria",
        }
    }
}

/// Body of the price update and its echo in the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub precio: Number,
}
