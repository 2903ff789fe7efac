//! `data-*` attribute decoding.
//!
//! Attribute suffixes are camel-cased (`data-row-selectable` → `rowSelectable`)
//! and values are coerced the way jQuery's `.data()` does it: `true`, `false`
//! and `null` literals, numbers only when they round-trip to the same text,
//! JSON objects/arrays when they parse, strings otherwise.

use super::value::{OptionValue, Options};

const DATA_PREFIX: &str = "data-";

/// Camel-case a dashed attribute suffix.
pub fn camel_case(suffix: &str) -> String {
    let mut out = String::with_capacity(suffix.len());
    let mut upper_next = false;
    for c in suffix.chars() {
        if c == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Decode a raw attribute value.
pub fn decode_data_value(raw: &str) -> OptionValue {
    match raw {
        "true" => return OptionValue::Bool(true),
        "false" => return OptionValue::Bool(false),
        "null" => return OptionValue::Null,
        _ => {}
    }

    if let Ok(n) = raw.parse::<f64>() {
        if n.is_finite() && format_number(n) == raw {
            return OptionValue::Number(n);
        }
    }

    let trimmed = raw.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(raw) {
            return OptionValue::from(json);
        }
    }

    OptionValue::String(raw.to_string())
}

/// Collect the `data-*` attributes of an element into options.
pub fn element_data<'a, I>(attributes: I) -> Options
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    attributes
        .into_iter()
        .filter_map(|(name, value)| {
            let suffix = name.strip_prefix(DATA_PREFIX)?;
            if suffix.is_empty() {
                return None;
            }
            Some((camel_case(suffix), decode_data_value(value)))
        })
        .collect()
}

/// Shortest textual form of a number, matching how scripts print it.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("plugin"), "plugin");
        assert_eq!(camel_case("row-selectable"), "rowSelectable");
        assert_eq!(camel_case("label-ok"), "labelOk");
        assert_eq!(camel_case("change-header-on"), "changeHeaderOn");
    }

    #[test]
    fn test_decode_literals() {
        assert_eq!(decode_data_value("true"), OptionValue::Bool(true));
        assert_eq!(decode_data_value("false"), OptionValue::Bool(false));
        assert_eq!(decode_data_value("null"), OptionValue::Null);
    }

    #[test]
    fn test_decode_numbers_only_when_canonical() {
        assert_eq!(decode_data_value("10"), OptionValue::Number(10.0));
        assert_eq!(decode_data_value("-5"), OptionValue::Number(-5.0));
        assert_eq!(decode_data_value("1.5"), OptionValue::Number(1.5));
        assert_eq!(decode_data_value("1.50"), OptionValue::String("1.50".into()));
        assert_eq!(decode_data_value("010"), OptionValue::String("010".into()));
        assert_eq!(decode_data_value("1e3"), OptionValue::String("1e3".into()));
    }

    #[test]
    fn test_decode_json() {
        let value = decode_data_value(r#"{"min": 2}"#);
        assert_eq!(value.as_map().unwrap().get_f64("min"), Some(2.0));

        // Broken JSON stays a string
        assert_eq!(decode_data_value("{oops"), OptionValue::String("{oops".into()));
    }

    #[test]
    fn test_element_data() {
        let attrs = [
            ("class", "table"),
            ("data-plugin", "selectable"),
            ("data-row-selectable", "true"),
            ("data-", "ignored"),
        ];
        let data = element_data(attrs);

        assert_eq!(data.len(), 2);
        assert_eq!(data.get_str("plugin"), Some("selectable"));
        assert_eq!(data.get_bool("rowSelectable"), Some(true));
    }
}
