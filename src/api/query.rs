use serde::Serialize;
use serde_json::{json, Value};

/// Body of a `:runQuery` request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryRequest {
    pub structured_query: StructuredQuery,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructuredQuery {
    pub from: Vec<CollectionSelector>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSelector {
    pub collection_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub field_filter: FieldFilter,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldFilter {
    pub field: FieldReference,
    pub op: String,
    /// Type-tagged value, e.g. `{"stringValue": "abc"}`
    pub value: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReference {
    pub field_path: String,
}

impl StructuredQuery {
    /// `SELECT * FROM collection WHERE field == value` for a string value
    pub fn field_equals(collection: &str, field: &str, value: &str) -> Self {
        Self {
            from: vec![CollectionSelector {
                collection_id: collection.to_string(),
            }],
            filter: Some(Filter {
                field_filter: FieldFilter {
                    field: FieldReference {
                        field_path: field.to_string(),
                    },
                    op: "EQUAL".to_string(),
                    value: json!({ "stringValue": value }),
                },
            }),
        }
    }

    pub fn into_request(self) -> RunQueryRequest {
        RunQueryRequest {
            structured_query: self,
        }
    }

    /// Collection the query reads from
    pub fn collection(&self) -> Option<&str> {
        self.from.first().map(|c| c.collection_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_equals_body() {
        let body = serde_json::to_value(
            StructuredQuery::field_equals("predictions", "competitionId", "c1").into_request(),
        )
        .unwrap();

        assert_eq!(
            body,
            json!({
                "structuredQuery": {
                    "from": [{"collectionId": "predictions"}],
                    "where": {
                        "fieldFilter": {
                            "field": {"fieldPath": "competitionId"},
                            "op": "EQUAL",
                            "value": {"stringValue": "c1"}
                        }
                    }
                }
            })
        );
    }
}
