//! Content-type admission control.

/// Content type assumed when the response does not declare one.
pub(crate) const UNKNOWN_CONTENT_TYPE: &str = "application/octet-stream";

/// Subtypes never safe to treat as plain text, whatever the primary type
/// says. Keeps scripting and structured-data formats out even when they
/// arrive labeled `text/*`.
const DISALLOWED_SUBTYPES: [&str; 7] = [
    "x-httpd-php",
    "xml",
    "xhtml+xml",
    "x-sh",
    "x-csh",
    "json",
    "ld+json",
];

/// Classifies a `Content-Type` header value as binary.
///
/// Binary means: primary type other than `text`, or a disallowed subtype
/// (parameters after `;` ignored). A value with no `/` is binary.
pub(crate) fn is_binary_mime_type(content_type: &str) -> bool {
    let Some((primary, rest)) = content_type.split_once('/') else {
        return true;
    };
    let primary = primary.trim().to_ascii_lowercase();
    let subtype = rest
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    primary != "text" || DISALLOWED_SUBTYPES.contains(&subtype.as_str())
}
