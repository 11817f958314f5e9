use crate::ConfigurationError;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use unicode_normalization::UnicodeNormalization;

/// Characters the document store refuses inside an index name.
const INDEX_NAME_STRIP: &[char] = &[
    '\\', '/', '*', '?', '"', '<', '>', '|', ' ', '#', '\'',
];

/// Characters stripped from an instance URI before it becomes a document id.
const DOCUMENT_ID_STRIP: &[char] = &[
    '<', '>', ':', '/', '#', '.', '?', '&', '=', ';', ',', '+', '*', '(', ')', '[',
    ']', '{', '}', '|', '"', '\'', '`',
];

/// Percent-encode everything that is not alphanumeric, `-` or `_`.
const DOCUMENT_ID_ENCODE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

/// Derives the target index name from a class label.
///
/// Compatibility-decomposes the label, lowercases and trims it, strips the
/// characters the document store rejects, then strips a leading run of `-`,
/// `_` and `+`. The derivation is idempotent. A result of `"."` or `".."` is
/// an illegal index name and fails hard.
pub fn index_name(class_label: &str) -> Result<String, ConfigurationError> {
    let lowered = class_label.nfkd().collect::<String>().to_lowercase();
    let stripped = lowered
        .trim()
        .chars()
        .filter(|c| !INDEX_NAME_STRIP.contains(c))
        .collect::<String>();
    let name = stripped.trim_start_matches(['-', '_', '+']);
    if name == "." || name == ".." {
        return Err(ConfigurationError::IllegalIndexName(name.to_owned()));
    }
    Ok(name.to_owned())
}

/// Derives a stable document id from an instance URI.
///
/// Strips URI punctuation, replaces the remaining spaces with underscores and
/// percent-encodes the rest. The same URI always yields the same id; no
/// collision check is performed.
pub fn document_id(instance_uri: &str) -> String {
    let cleaned = instance_uri
        .chars()
        .filter(|c| !DOCUMENT_ID_STRIP.contains(c))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect::<String>();
    utf8_percent_encode(&cleaned, DOCUMENT_ID_ENCODE).to_string()
}

/// The local name of a class URI: the fragment when present, otherwise the
/// last path segment.
pub fn class_label(class_uri: &str) -> String {
    if let Some((_, fragment)) = class_uri.rsplit_once('#') {
        if !fragment.is_empty() {
            return fragment.to_owned();
        }
    }
    class_uri
        .trim_end_matches('#')
        .rsplit('/')
        .next()
        .unwrap_or(class_uri)
        .to_owned()
}
