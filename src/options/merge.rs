//! Deep merge of option maps.
//!
//! Last writer wins. Nested maps merge key by key; every other value
//! (lists and functions included) is replaced wholesale, so a function is
//! always taken by reference and never merged field-by-field.

use super::value::{OptionValue, Options};

/// Merge `overlay` into `base` in place.
pub fn deep_merge(base: &mut Options, overlay: &Options) {
    for (key, value) in overlay.iter() {
        if let (Some(OptionValue::Map(existing)), OptionValue::Map(incoming)) =
            (base.get_mut(key), value)
        {
            deep_merge(existing, incoming);
            continue;
        }
        base.insert(key, value.clone());
    }
}

/// Merge a sequence of layers, lowest precedence first.
///
/// ```
/// use spark_components::options::{merge_layers, Options};
///
/// let defaults = Options::new().with("a", 1).with("b", 2);
/// let data = Options::new().with("b", 3);
/// let explicit = Options::new().with("a", 4);
///
/// let merged = merge_layers([&defaults, &data, &explicit]);
/// assert_eq!(merged, Options::new().with("a", 4).with("b", 3));
/// ```
pub fn merge_layers<'a, I>(layers: I) -> Options
where
    I: IntoIterator<Item = &'a Options>,
{
    let mut merged = Options::new();
    for layer in layers {
        deep_merge(&mut merged, layer);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence() {
        let defaults = Options::new().with("a", 1).with("b", 2);
        let data = Options::new().with("b", 3);
        let explicit = Options::new().with("a", 4);

        let merged = merge_layers([&defaults, &data, &explicit]);
        assert_eq!(merged, Options::new().with("a", 4).with("b", 3));
    }

    #[test]
    fn test_nested_maps_merge() {
        let defaults = Options::new().with(
            "classes",
            Options::new().with("svg", "pie-progress-svg").with("number", "pie-progress-number"),
        );
        let overlay = Options::new().with("classes", Options::new().with("svg", "custom-svg"));

        let merged = merge_layers([&defaults, &overlay]);
        let classes = merged.get_map("classes").unwrap();
        assert_eq!(classes.get_str("svg"), Some("custom-svg"));
        assert_eq!(classes.get_str("number"), Some("pie-progress-number"));
    }

    #[test]
    fn test_map_replaced_by_scalar() {
        let defaults = Options::new().with("visibleNum", Options::new().with("0", 3));
        let overlay = Options::new().with("visibleNum", 5);

        let merged = merge_layers([&defaults, &overlay]);
        assert_eq!(merged.get_f64("visibleNum"), Some(5.0));
    }

    #[test]
    fn test_lists_replace() {
        let defaults = Options::new().with("browser", vec![OptionValue::from("a"), OptionValue::from("b")]);
        let overlay = Options::new().with("browser", vec![OptionValue::from("c")]);

        let merged = merge_layers([&defaults, &overlay]);
        assert_eq!(merged.get("browser"), Some(&OptionValue::List(vec![OptionValue::from("c")])));
    }

    #[test]
    fn test_functions_taken_by_reference() {
        let f = OptionValue::function(|_| OptionValue::Bool(true));
        let defaults = Options::new().with("onShow", OptionValue::Null);
        let overlay = Options::new().with("onShow", f.clone());

        let merged = merge_layers([&defaults, &overlay]);
        assert_eq!(merged.get("onShow"), Some(&f));
    }

    #[test]
    fn test_merge_does_not_alias_base() {
        let defaults = Options::new().with("nested", Options::new().with("x", 1));
        let mut copy = merge_layers([&defaults]);
        deep_merge(&mut copy, &Options::new().with("nested", Options::new().with("x", 2)));

        assert_eq!(defaults.get_map("nested").unwrap().get_f64("x"), Some(1.0));
        assert_eq!(copy.get_map("nested").unwrap().get_f64("x"), Some(2.0));
    }
}
