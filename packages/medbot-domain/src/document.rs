use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};
use serde_json::{Map, Value};

use crate::matcher::normalize_treatment_name;

/// A document returned by the retrieval collaborator. The core only reads it.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct RetrievedDocument {
	pub content: String,
	#[serde(default)]
	pub metadata: Map<String, Value>,
}
impl RetrievedDocument {
	pub fn new(content: impl Into<String>) -> Self {
		Self { content: content.into(), metadata: Map::new() }
	}

	pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
		self.metadata.insert(key.to_string(), value.into());

		self
	}

	pub fn source(&self) -> Option<&str> {
		self.metadata_str("source")
	}

	pub fn document_type(&self) -> Option<&str> {
		self.metadata_str("document_type")
	}

	pub fn content_type(&self) -> Option<&str> {
		self.metadata_str("content_type")
	}

	pub fn has_price_info(&self) -> bool {
		matches!(self.metadata.get("has_price_info"), Some(Value::Bool(true)))
	}

	/// Structured `treatment -> price` pairs attached by the indexer.
	///
	/// String and numeric values are accepted; anything else is skipped.
	pub fn price_data(&self) -> Option<Vec<(&str, String)>> {
		let Some(Value::Object(data)) = self.metadata.get("price_data") else { return None };
		let mut out = Vec::with_capacity(data.len());

		for (treatment, price) in data {
			let price = match price {
				Value::String(raw) => raw.trim().to_string(),
				Value::Number(number) => number.to_string(),
				_ => continue,
			};

			if !price.is_empty() {
				out.push((treatment.as_str(), price));
			}
		}

		Some(out)
	}

	fn metadata_str(&self, key: &str) -> Option<&str> {
		self.metadata.get(key).and_then(Value::as_str).map(str::trim).filter(|value| !value.is_empty())
	}
}

/// A retrieval hit. Lower scores are closer matches.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ScoredDocument {
	pub document: RetrievedDocument,
	pub score: f32,
}

/// Per-query `treatment -> price` mapping.
///
/// Keys are stored normalized and kept in insertion order. Re-inserting a key replaces its price
/// in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PriceMap {
	entries: Vec<(String, String)>,
}
impl PriceMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns `false` when the name normalizes to nothing and nothing was stored.
	pub fn insert(&mut self, treatment: &str, price: impl Into<String>) -> bool {
		let key = normalize_treatment_name(treatment);

		if key.is_empty() {
			return false;
		}

		let price = price.into();

		match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
			Some(entry) => entry.1 = price,
			None => self.entries.push((key, price)),
		}

		true
	}

	pub fn get(&self, treatment: &str) -> Option<&str> {
		self.entry(treatment).map(|(_, price)| price)
	}

	/// Looks up by normalized name and returns the stored key alongside the price.
	pub fn entry(&self, treatment: &str) -> Option<(&str, &str)> {
		let key = normalize_treatment_name(treatment);

		self.entries
			.iter()
			.find(|(existing, _)| *existing == key)
			.map(|(key, price)| (key.as_str(), price.as_str()))
	}

	pub fn contains(&self, treatment: &str) -> bool {
		self.entry(treatment).is_some()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries.iter().map(|(key, price)| (key.as_str(), price.as_str()))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
impl Serialize for PriceMap {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut map = serializer.serialize_map(Some(self.entries.len()))?;

		for (key, price) in &self.entries {
			map.serialize_entry(key, price)?;
		}

		map.end()
	}
}
impl<'a> FromIterator<(&'a str, &'a str)> for PriceMap {
	fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
		let mut map = Self::new();

		for (treatment, price) in iter {
			map.insert(treatment, price);
		}

		map
	}
}
