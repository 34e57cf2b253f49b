use std::fmt::{self, Display};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// The query text offered when a panel is first created
pub const DEFAULT_QUERY_TEXT: &str = "SELECT SomeTimeSeries { time := .timestamp, value } filter .time >= to_datetime($__from / 1000) and .time <= to_datetime($__to / 1000);";

/// The ref id assigned to queries issued by the variable editor
pub const VARIABLE_QUERY_REF_ID: &str = "EdgeDBDatasource-VariableQuery";

/// A query as authored in a dashboard panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    /// Identifies the query within a request, responses are keyed by it
    pub ref_id: String,
    /// The raw EdgeQL which may contain variable placeholders
    #[serde(default)]
    pub query_text: String,
    #[serde(default)]
    pub datasource_id: i64,
    #[serde(default)]
    pub interval_ms: i64,
    #[serde(default)]
    pub max_data_points: i64,
}

impl Query {
    pub fn new(ref_id: impl Into<String>, query_text: impl Into<String>) -> Self {
        Self {
            ref_id: ref_id.into(),
            query_text: query_text.into(),
            ..Default::default()
        }
    }

    /// A query pre-populated with the default query text
    pub fn with_default_text(ref_id: impl Into<String>) -> Self {
        Self::new(ref_id, DEFAULT_QUERY_TEXT)
    }

    /// Converts the query string from the variable editor into a query
    pub fn variable_query(query: impl Into<String>) -> Self {
        Self::new(VARIABLE_QUERY_REF_ID, query)
    }
}

/// A query with all placeholders substituted, ready for execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedQuery {
    ref_id: String,
    query_text: String,
}

impl RenderedQuery {
    pub fn new(ref_id: impl Into<String>, query_text: impl Into<String>) -> Self {
        Self {
            ref_id: ref_id.into(),
            query_text: query_text.into(),
        }
    }

    pub fn ref_id(&self) -> &str {
        &self.ref_id
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }
}

/// The current value of a dashboard variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Text(String),
    Number(serde_json::Number),
    List(Vec<String>),
    /// Any other shape the host sends (`null`, booleans, mixed lists, objects).
    /// Treated as a sequence of its items when rendered.
    Other(serde_json::Value),
}

impl VariableValue {
    /// The items of an [`VariableValue::Other`] value as text: the elements
    /// of an array, nothing for `null`, otherwise the value itself
    pub fn other_items(value: &serde_json::Value) -> Vec<String> {
        use serde_json::Value;

        let item = |v: &Value| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        match value {
            Value::Null => vec![],
            Value::Array(items) => items.iter().map(item).collect(),
            other => vec![item(other)],
        }
    }
}

impl Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableValue::Text(s) => write!(f, "{}", s),
            VariableValue::Number(n) => write!(f, "{}", n),
            VariableValue::List(l) => write!(f, "{}", l.iter().join(",")),
            VariableValue::Other(v) => write!(f, "{}", Self::other_items(v).iter().join(",")),
        }
    }
}

impl From<&str> for VariableValue {
    fn from(s: &str) -> Self {
        VariableValue::Text(s.to_string())
    }
}

impl From<String> for VariableValue {
    fn from(s: String) -> Self {
        VariableValue::Text(s)
    }
}

impl From<i64> for VariableValue {
    fn from(n: i64) -> Self {
        VariableValue::Number(n.into())
    }
}

impl From<Vec<String>> for VariableValue {
    fn from(l: Vec<String>) -> Self {
        VariableValue::List(l)
    }
}

impl From<Vec<&str>> for VariableValue {
    fn from(l: Vec<&str>) -> Self {
        VariableValue::List(l.into_iter().map(String::from).collect())
    }
}

/// Selection modes of the variable that owns a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VariableFlags {
    /// Several values can be selected at once
    pub multi: bool,
    /// The variable offers an "all values" option
    pub include_all: bool,
}

impl VariableFlags {
    pub fn new(multi: bool, include_all: bool) -> Self {
        Self { multi, include_all }
    }

    pub fn single() -> Self {
        Self::default()
    }

    pub fn multi() -> Self {
        Self::new(true, false)
    }

    /// Whether values must render as self-delimiting literals
    pub fn is_multi_valued(&self) -> bool {
        self.multi || self.include_all
    }
}

/// A named variable bound to its current value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableBinding {
    pub name: String,
    pub value: VariableValue,
    #[serde(default)]
    pub multi: bool,
    #[serde(default)]
    pub include_all: bool,
}

impl VariableBinding {
    pub fn new(name: impl Into<String>, value: impl Into<VariableValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            multi: false,
            include_all: false,
        }
    }

    pub fn multi(name: impl Into<String>, value: impl Into<VariableValue>) -> Self {
        Self {
            multi: true,
            ..Self::new(name, value)
        }
    }

    pub fn flags(&self) -> VariableFlags {
        VariableFlags::new(self.multi, self.include_all)
    }
}

/// The dashboard time range in epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: i64,
    pub to: i64,
}

impl TimeRange {
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }

    /// The range as the built-in `__from` and `__to` variables
    pub fn bindings(&self) -> Vec<VariableBinding> {
        vec![
            VariableBinding::new("__from", self.from),
            VariableBinding::new("__to", self.to),
        ]
    }
}
