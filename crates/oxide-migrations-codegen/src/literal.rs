//! Literal rendering.
//!
//! Every function returns the source text of one argument value. The DSL
//! lexer reads each form back to the same value and width.

use oxide_migrations::{DefaultValue, ReferentialAction};

/// Renders a quoted string literal.
#[must_use]
pub fn string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Renders a 32-bit integer.
#[must_use]
pub fn int(value: i32) -> String {
    value.to_string()
}

/// Renders a 64-bit integer with the `L` suffix.
#[must_use]
pub fn long(value: i64) -> String {
    format!("{value}L")
}

/// Renders a double in its shortest round-tripping form.
#[must_use]
pub fn double(value: f64) -> String {
    if value.is_nan() {
        "double.NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "double.PositiveInfinity".to_string()
        } else {
            "double.NegativeInfinity".to_string()
        }
    } else {
        format!("{value:?}")
    }
}

/// Renders a boolean.
#[must_use]
pub const fn bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Renders a referential action.
#[must_use]
pub fn referential_action(action: ReferentialAction) -> String {
    format!("ReferentialAction.{}", action.name())
}

/// Renders a column default.
#[must_use]
pub fn default_value(value: &DefaultValue) -> String {
    match value {
        DefaultValue::Bool(b) => bool(*b).to_string(),
        DefaultValue::Int(i) => int(*i),
        DefaultValue::Long(l) => long(*l),
        DefaultValue::Double(d) => double(*d),
        DefaultValue::String(s) => string(s),
    }
}

/// Renders a string array, `new[] { "A", "B" }`.
#[must_use]
pub fn string_array(values: &[String]) -> String {
    let items: Vec<String> = values.iter().map(|v| string(v)).collect();
    format!("new[] {{ {} }}", items.join(", "))
}
