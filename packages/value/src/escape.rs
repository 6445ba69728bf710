//! Escaping applied when a collection is rendered as text.

/// Transforms rendered text before it leaves the library.
pub trait Escape {
    fn escape(&self, text: &str) -> String;
}

/// HTML special-character escaping: `&`, `<`, `>`, `"` and `'`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlEscape;

impl Escape for HtmlEscape {
    fn escape(&self, text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#039;"),
                other => escaped.push(other),
            }
        }
        escaped
    }
}

impl<F: Fn(&str) -> String> Escape for F {
    fn escape(&self, text: &str) -> String {
        self(text)
    }
}
