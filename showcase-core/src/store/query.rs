//! Query and patch descriptions understood by every `DocumentStore`.

use std::cmp::Ordering;

use serde_json::Value;

use super::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Compare one field of a document against a value.
#[derive(Debug, Clone)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn new(field: &str, op: FilterOp, value: impl Into<Value>) -> Self {
        Filter {
            field: field.to_string(),
            op,
            value: value.into(),
        }
    }

    /// Missing fields and values of a different JSON type never match.
    pub fn matches(&self, document: &Document) -> bool {
        let Some(actual) = document.get(&self.field) else {
            return false;
        };

        let ordering = compare_values(actual, &self.value);
        match self.op {
            // Arrays, objects and nulls only match by structural equality
            FilterOp::Eq => ordering.map_or(actual == &self.value, Ordering::is_eq),
            FilterOp::Lt => ordering.is_some_and(Ordering::is_lt),
            FilterOp::Le => ordering.is_some_and(Ordering::is_le),
            FilterOp::Gt => ordering.is_some_and(Ordering::is_gt),
            FilterOp::Ge => ordering.is_some_and(Ordering::is_ge),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: &str, op: FilterOp, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::new(field, op, value));
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some((field.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.filters.iter().all(|f| f.matches(document))
    }

    /// Filter, order and truncate a set of documents.
    pub fn apply(&self, documents: impl IntoIterator<Item = Document>) -> Vec<Document> {
        let mut selected: Vec<Document> =
            documents.into_iter().filter(|d| self.matches(d)).collect();

        if let Some((field, direction)) = &self.order_by {
            selected.sort_by(|a, b| {
                let ordering = match (a.get(field), b.get(field)) {
                    (Some(x), Some(y)) => compare_values(x, y).unwrap_or(Ordering::Equal),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                match direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }

        selected
    }
}

fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// A single field mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOp {
    Set { field: String, value: Value },
    /// Add `by` to a numeric field, treating a missing field as 0.
    Increment { field: String, by: i64 },
    /// Append each value not already present in the array field.
    ArrayUnion { field: String, values: Vec<Value> },
}

/// An ordered list of field mutations applied atomically.
///
/// A gated patch only applies its `Set`/`Increment` ops when at least one
/// `ArrayUnion` actually added a member. This couples a counter to a set
/// so that a repeated request can never count twice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    pub ops: Vec<FieldOp>,
    pub gated: bool,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.ops.push(FieldOp::Set {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn increment(mut self, field: &str, by: i64) -> Self {
        self.ops.push(FieldOp::Increment {
            field: field.to_string(),
            by,
        });
        self
    }

    pub fn array_union(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.ops.push(FieldOp::ArrayUnion {
            field: field.to_string(),
            values: vec![value.into()],
        });
        self
    }

    pub fn gate_on_union(mut self) -> Self {
        self.gated = true;
        self
    }
}

/// Result of applying a patch.
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    /// The document after the patch.
    pub document: Document,
    /// Whether any union added a value that was not already present.
    pub union_added: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("test documents must be objects"),
        }
    }

    #[test]
    fn test_filter_compares_numbers_numerically() {
        let d = doc(json!({"expiration_date": 1_000}));

        assert!(Filter::new("expiration_date", FilterOp::Lt, 1_001).matches(&d));
        assert!(!Filter::new("expiration_date", FilterOp::Lt, 1_000).matches(&d));
        assert!(Filter::new("expiration_date", FilterOp::Le, 1_000).matches(&d));
        assert!(Filter::new("expiration_date", FilterOp::Gt, 999.5).matches(&d));
    }

    #[test]
    fn test_filter_equality() {
        let d = doc(json!({"upvotes": 3, "open": true, "voters": ["device_a"], "note": null}));

        assert!(Filter::new("upvotes", FilterOp::Eq, 3.0).matches(&d), "Numbers compare numerically");
        assert!(!Filter::new("upvotes", FilterOp::Eq, 4).matches(&d));
        assert!(Filter::new("open", FilterOp::Eq, true).matches(&d));
        assert!(Filter::new("voters", FilterOp::Eq, json!(["device_a"])).matches(&d));
        assert!(Filter::new("note", FilterOp::Eq, Value::Null).matches(&d));
        assert!(!Filter::new("upvotes", FilterOp::Eq, "3").matches(&d));
    }

    #[test]
    fn test_filter_ignores_missing_and_mismatched_fields() {
        let d = doc(json!({"title": "Demo"}));

        assert!(!Filter::new("missing", FilterOp::Eq, "Demo").matches(&d));
        assert!(!Filter::new("title", FilterOp::Gt, 3).matches(&d));
        assert!(Filter::new("title", FilterOp::Eq, "Demo").matches(&d));
    }

    #[test]
    fn test_query_orders_and_limits() {
        let docs = vec![
            doc(json!({"id": "a", "created_at": 2})),
            doc(json!({"id": "b", "created_at": 3})),
            doc(json!({"id": "c", "created_at": 1})),
        ];

        let result = Query::new()
            .order_by("created_at", Direction::Descending)
            .limit(2)
            .apply(docs);

        let ids: Vec<_> = result.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
