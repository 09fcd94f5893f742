//! Column assignments handed to the transaction primitive.
//!
//! Repositories translate typed inputs into a [`FieldPatch`]; backends turn
//! it into SQL (or apply it to in-memory rows). Values are stored the way
//! SQLite keeps them: timestamps as RFC 3339 text, dates as `YYYY-MM-DD`,
//! JSON documents as text.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use sea_query::Value;

/// A single column value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
	/// SQL `NULL`
	Null,
	/// Boolean
	Bool(bool),
	/// Integer
	Int(i64),
	/// Text
	Text(String),
	/// JSON document, stored as text
	Json(serde_json::Value),
	/// Timestamp, stored as RFC 3339 text
	Timestamp(DateTime<Utc>),
	/// Calendar date
	Date(NaiveDate),
}

impl FieldValue {
	/// Convert to a bindable sea-query value
	pub fn to_value(&self) -> Value {
		match self {
			FieldValue::Null => Value::from(None::<String>),
			FieldValue::Bool(b) => Value::from(*b),
			FieldValue::Int(i) => Value::from(*i),
			FieldValue::Text(s) => Value::from(s.clone()),
			FieldValue::Json(j) => Value::from(j.to_string()),
			FieldValue::Timestamp(ts) => Value::from(format_timestamp(ts)),
			FieldValue::Date(d) => Value::from(d.format("%Y-%m-%d").to_string()),
		}
	}

	/// Integer content, if any
	pub fn as_int(&self) -> Option<i64> {
		match self {
			FieldValue::Int(i) => Some(*i),
			_ => None,
		}
	}
}

/// Canonical timestamp text
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
	ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl From<bool> for FieldValue {
	fn from(v: bool) -> Self {
		FieldValue::Bool(v)
	}
}

impl From<i64> for FieldValue {
	fn from(v: i64) -> Self {
		FieldValue::Int(v)
	}
}

impl From<String> for FieldValue {
	fn from(v: String) -> Self {
		FieldValue::Text(v)
	}
}

impl From<&str> for FieldValue {
	fn from(v: &str) -> Self {
		FieldValue::Text(v.to_string())
	}
}

impl From<serde_json::Value> for FieldValue {
	fn from(v: serde_json::Value) -> Self {
		FieldValue::Json(v)
	}
}

impl From<DateTime<Utc>> for FieldValue {
	fn from(v: DateTime<Utc>) -> Self {
		FieldValue::Timestamp(v)
	}
}

impl From<NaiveDate> for FieldValue {
	fn from(v: NaiveDate) -> Self {
		FieldValue::Date(v)
	}
}

/// Ordered set of column assignments. Setting a column twice keeps the last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
	fields: Vec<(&'static str, FieldValue)>,
}

impl FieldPatch {
	/// Empty patch
	pub fn new() -> Self {
		Self::default()
	}

	/// Assign a column
	pub fn set(&mut self, column: &'static str, value: impl Into<FieldValue>) -> &mut Self {
		let value = value.into();
		match self.fields.iter_mut().find(|(c, _)| *c == column) {
			Some(slot) => slot.1 = value,
			None => self.fields.push((column, value)),
		}
		self
	}

	/// Assign a column only when a value was supplied
	pub fn set_opt<T: Into<FieldValue>>(&mut self, column: &'static str, value: Option<T>) -> &mut Self {
		if let Some(value) = value {
			self.set(column, value);
		}
		self
	}

	/// Stamp `created_at` and `updated_at`
	pub fn stamp_created(&mut self, now: DateTime<Utc>) -> &mut Self {
		self.set("created_at", now).set("updated_at", now)
	}

	/// Stamp `updated_at`
	pub fn stamp_updated(&mut self, now: DateTime<Utc>) -> &mut Self {
		self.set("updated_at", now)
	}

	/// Value assigned to `column`
	pub fn get(&self, column: &str) -> Option<&FieldValue> {
		self.fields.iter().find(|(c, _)| *c == column).map(|(_, v)| v)
	}

	/// Whether any column is assigned
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Assignments in insertion order
	pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
		self.fields.iter().map(|(c, v)| (*c, v))
	}
}
