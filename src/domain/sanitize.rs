//! Input sanitization for user-submitted form values.
//!
//! Submitted values may later be rendered in HTML views, so markup is
//! neutralized before anything else looks at them: tags are stripped and
//! the remaining markup-significant characters are escaped.

/// Escape markup-significant characters.
pub fn escape_markup(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Sanitize a submitted password.
///
/// Strips markup tags, escapes what is left, and trims surrounding
/// whitespace. An empty result means the submission had no usable
/// content and must be re-requested from the user.
pub fn sanitize_password(raw: &str) -> String {
    let mut stripped = String::with_capacity(raw.len());
    let mut in_tag = false;
    for c in raw.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            _ => stripped.push(c),
        }
    }

    escape_markup(&stripped).trim().to_string()
}
