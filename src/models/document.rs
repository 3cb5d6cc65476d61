use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::field::{flatten_fields, FieldValue};

/// Placeholder used wherever a text field is absent
pub const MISSING: &str = "N/A";

/// Document as returned by the REST API, fields still type-tagged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name, e.g. `projects/p/databases/(default)/documents/competitions/abc`
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub fields: Map<String, Value>,

    pub create_time: Option<String>,

    pub update_time: Option<String>,
}

/// Body of a collection listing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    #[serde(default)]
    pub documents: Vec<Document>,

    pub next_page_token: Option<String>,
}

/// One element of a `:runQuery` response stream
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryItem {
    pub document: Option<Document>,
}

/// Document with plain field values
#[derive(Debug, Clone, Serialize)]
pub struct FlatDocument {
    pub id: String,
    pub name: String,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
    pub fields: BTreeMap<String, FieldValue>,
}

/// Last path segment of a resource name
pub fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Convert a tagged document into plain field values
pub fn flatten(document: &Document) -> FlatDocument {
    FlatDocument {
        id: document_id(&document.name).to_string(),
        name: document.name.clone(),
        create_time: document.create_time.clone(),
        update_time: document.update_time.clone(),
        fields: flatten_fields(&document.fields),
    }
}

impl FlatDocument {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Look up a dotted path through nested maps, e.g. `actualScore.verified`
    pub fn get_path(&self, path: &str) -> Option<&FieldValue> {
        let mut segments = path.split('.');
        let mut current = self.fields.get(segments.next()?)?;

        for segment in segments {
            current = current.as_map()?.get(segment)?;
        }

        Some(current)
    }

    pub fn is_present(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Text value of a field, or `"N/A"`
    pub fn text(&self, field: &str) -> &str {
        self.text_or(field, MISSING)
    }

    pub fn text_or<'a>(&'a self, field: &str, default: &'a str) -> &'a str {
        self.get_path(field)
            .and_then(FieldValue::as_text)
            .unwrap_or(default)
    }

    /// Boolean value at a dotted path, or `false`
    pub fn flag(&self, path: &str) -> bool {
        self.get_path(path)
            .and_then(FieldValue::as_bool)
            .unwrap_or(false)
    }
}
