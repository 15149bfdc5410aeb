//! Small helpers for emitting script literals.

use std::fmt;

/// Quote `s` as a script string literal that is also safe inside `<script>`.
pub fn string_literal(s: &str) -> Result<String, fmt::Error> {
    let quoted = serde_json::to_string(s).map_err(|_| fmt::Error)?;
    Ok(quoted.replace("</", "<\\/"))
}

/// `d["field"]` on the record bound to `var`
pub fn field_access(var: &str, field: &str) -> Result<String, fmt::Error> {
    Ok(format!("{}[{}]", var, string_literal(field)?))
}

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

/// Prefix every non-empty line of `text` with `prefix`
pub fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| if line.is_empty() { String::new() } else { format!("{}{}", prefix, line) })
        .collect::<Vec<_>>()
        .join("\n")
}
