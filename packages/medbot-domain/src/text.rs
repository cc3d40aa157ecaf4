//! Sentence counting and trimming.
//!
//! A sentence boundary is a `.`, `!`, or `?` followed by whitespace. Abbreviations ("Dr. Rahman")
//! and decimals followed by a space are not special-cased, so they count as boundaries too.

use std::sync::LazyLock;

use regex::Regex;

static SENTENCE_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| crate::compile(r"[.!?]\s+"));

/// Counts sentence boundaries in `text`. A single unterminated sentence counts as zero.
pub fn count_sentences(text: &str) -> usize {
	SENTENCE_BOUNDARY.find_iter(text).count()
}

/// Keeps the first `max_sentences` sentences of `text`.
///
/// Text that already fits is returned byte-for-byte. Only the last sentence can lack a terminator,
/// so trimmed output always ends in `.`, `!`, or `?`.
pub fn limit_sentences(text: &str, max_sentences: usize) -> String {
	let sentences = split_sentences(text.trim());

	if sentences.len() <= max_sentences {
		return text.to_string();
	}
	if max_sentences == 0 {
		return String::new();
	}

	sentences[..max_sentences].join(" ")
}

pub(crate) fn ends_with_terminator(text: &str) -> bool {
	text.ends_with(|ch| matches!(ch, '.' | '!' | '?'))
}

/// Splits on boundaries, keeping each terminator with the sentence it closes.
fn split_sentences(text: &str) -> Vec<&str> {
	let mut sentences = Vec::new();
	let mut start = 0;

	for boundary in SENTENCE_BOUNDARY.find_iter(text) {
		// Terminators are ASCII, so the sentence ends one byte into the match.
		sentences.push(&text[start..boundary.start() + 1]);

		start = boundary.end();
	}

	if start < text.len() {
		sentences.push(&text[start..]);
	}

	sentences
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn splits_keep_terminators() {
		assert_eq!(split_sentences("One. Two! Three? Four"), vec!["One.", "Two!", "Three?", "Four"]);
	}

	#[test]
	fn repeated_terminators_stay_with_their_sentence() {
		assert_eq!(split_sentences("Wow!! Next."), vec!["Wow!!", "Next."]);
	}

	#[test]
	fn decimals_without_trailing_space_are_not_boundaries() {
		assert_eq!(count_sentences("It costs 12.50 today. Thanks."), 1);
	}

	#[test]
	fn abbreviations_are_counted_as_boundaries() {
		assert_eq!(count_sentences("Ask Dr. Rahman. He knows."), 2);
	}
}
