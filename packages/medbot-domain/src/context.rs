use std::sync::LazyLock;

use regex::Regex;

use crate::document::RetrievedDocument;

pub const CONTENT_TRUNCATED_MARKER: &str = "... [content truncated]";
pub const CONTEXT_TRUNCATED_MARKER: &str = "... [additional context truncated]";

static PRICE_HINT: LazyLock<Regex> =
	LazyLock::new(|| crate::compile(r"(?i)price|cost|bdt|taka|tk|\d+"));

/// Packs retrieved documents into the bounded context handed to the text generator.
///
/// Price-bearing documents come first and are labeled `[PRICE INFO n]`; the rest follow as
/// `[Section n]`. Every cut is marked, and the result never exceeds `max_chars` characters.
#[derive(Clone, Debug, Default)]
pub struct ContextAssembler {
	limits: medbot_config::Context,
}
impl ContextAssembler {
	pub fn new(limits: &medbot_config::Context) -> Self {
		Self { limits: limits.clone() }
	}

	pub fn assemble<'a, I>(&self, documents: I, doc_type: Option<&str>) -> String
	where
		I: IntoIterator<Item = &'a RetrievedDocument>,
	{
		let (price_docs, other_docs): (Vec<_>, Vec<_>) =
			documents.into_iter().partition(|document| is_price_bearing(&document.content));
		let mut parts = Vec::new();

		if let Some(doc_type) = doc_type.map(str::trim).filter(|value| !value.is_empty()) {
			parts.push(format!("--- {doc_type} ---"));
		}

		for (idx, document) in price_docs.iter().take(self.limits.max_price_documents).enumerate() {
			parts.push(self.render(&format!("PRICE INFO {}", idx + 1), document));
		}
		for (idx, document) in other_docs.iter().take(self.limits.max_other_documents).enumerate() {
			parts.push(self.render(&format!("Section {}", idx + 1), document));
		}

		let context = parts.join("\n\n");
		let length = context.chars().count();

		if length <= self.limits.max_chars {
			return context;
		}

		tracing::warn!(length, max = self.limits.max_chars, "Context truncated.");

		let marker_chars = CONTEXT_TRUNCATED_MARKER.chars().count();

		// A budget smaller than the marker gets a cut marker and no content.
		if self.limits.max_chars <= marker_chars {
			return char_prefix(CONTEXT_TRUNCATED_MARKER, self.limits.max_chars).to_string();
		}

		let keep = self.limits.max_chars - marker_chars;

		format!("{}{CONTEXT_TRUNCATED_MARKER}", char_prefix(&context, keep))
	}

	fn render(&self, label: &str, document: &RetrievedDocument) -> String {
		let content = document.content.trim();
		let content = if content.chars().count() > self.limits.max_document_chars {
			format!("{}{CONTENT_TRUNCATED_MARKER}", char_prefix(content, self.limits.max_document_chars))
		} else {
			content.to_string()
		};

		format!("[{label}]{}: {content}", source_suffix(document))
	}
}

/// Content mentions a price, cost, or currency keyword, or contains any digit.
pub fn is_price_bearing(content: &str) -> bool {
	PRICE_HINT.is_match(content)
}

fn source_suffix(document: &RetrievedDocument) -> String {
	if document.metadata.is_empty() {
		return String::new();
	}

	let source = document.source().unwrap_or("Unknown");

	match document.document_type() {
		Some(doc_type) => format!(" (Source: {source}, Type: {doc_type})"),
		None => format!(" (Source: {source})"),
	}
}

fn char_prefix(text: &str, max_chars: usize) -> &str {
	match text.char_indices().nth(max_chars) {
		Some((idx, _)) => &text[..idx],
		None => text,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn char_prefix_respects_multibyte_boundaries() {
		assert_eq!(char_prefix("টাকা500", 2), "টা");
		assert_eq!(char_prefix("short", 10), "short");
	}

	#[test]
	fn suffix_omits_missing_type() {
		let doc = RetrievedDocument::new("x").with_metadata("source", "rates.pdf");

		assert_eq!(source_suffix(&doc), " (Source: rates.pdf)");
	}

	#[test]
	fn suffix_defaults_unknown_source() {
		let doc = RetrievedDocument::new("x").with_metadata("document_type", "pricing");

		assert_eq!(source_suffix(&doc), " (Source: Unknown, Type: pricing)");
	}
}
