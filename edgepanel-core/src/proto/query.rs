use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    data::Frame,
    err::{Context, Result},
    query::{Query, RenderedQuery, TimeRange, VariableBinding},
};

/// A batch of panel queries sent by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QueryDataRequest {
    /// Queries which fail to decode are kept so the failure can be
    /// reported under their own ref id
    pub queries: Vec<QueryRecord>,
    /// Current dashboard variable values
    #[serde(default)]
    pub variables: Vec<VariableBinding>,
    /// Dashboard time range, exposed to queries as `$__from` and `$__to`
    #[serde(default)]
    pub range: Option<TimeRange>,
}

/// A query of a request as it was received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryRecord {
    Query(Query),
    Malformed(serde_json::Value),
}

impl QueryRecord {
    /// The ref id of the query, empty when a malformed query has none
    pub fn ref_id(&self) -> &str {
        match self {
            QueryRecord::Query(q) => &q.ref_id,
            QueryRecord::Malformed(v) => v.get("refId").and_then(|r| r.as_str()).unwrap_or(""),
        }
    }

    /// Returns the decoded query or the reason it could not be decoded
    pub fn decode(&self) -> Result<Query> {
        match self {
            QueryRecord::Query(q) => Ok(q.clone()),
            QueryRecord::Malformed(v) => {
                serde_json::from_value(v.clone()).context("Failed to parse query")
            }
        }
    }
}

impl From<Query> for QueryRecord {
    fn from(query: Query) -> Self {
        QueryRecord::Query(query)
    }
}

/// Responses to a batch of queries keyed by ref id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QueryDataResponse {
    pub responses: BTreeMap<String, DataResponse>,
}

impl QueryDataResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, ref_id: &str) -> Option<&DataResponse> {
        self.responses.get(ref_id)
    }
}

/// The result of a single query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DataResponse {
    #[serde(default)]
    pub frames: Vec<Frame>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DataResponse {
    pub fn frames(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            frames: vec![],
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Rendered queries returned without executing them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RenderResponse {
    pub queries: Vec<RenderedQuery>,
    /// Queries which could not be rendered, keyed by ref id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, String>,
}
