//! Options - dynamic option values, deep merge, `data-*` decoding.
//!
//! Every component receives its configuration as an [`Options`] map built by
//! layering, lowest precedence first:
//!
//! ```text
//! definition defaults → environment overrides → element data-* → caller overrides
//! ```

mod data_attrs;
mod merge;
mod value;

pub use data_attrs::{camel_case, decode_data_value, element_data};
pub use merge::{deep_merge, merge_layers};
pub use value::{OptionFn, OptionValue, Options};
