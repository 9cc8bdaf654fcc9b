//! Runtime helpers emitted ahead of the program body.
//!
//! Built-in methods that have no native JavaScript counterpart on the
//! receiver compile to calls of these functions. Only helpers the program
//! actually uses are emitted.

use std::collections::BTreeSet;

pub const PRELUDE: &[(&str, &str)] = &[
    ("__hsc_toNumber", "const __hsc_toNumber = (s) => Number(s);"),
    ("__hsc_keys", "const __hsc_keys = (o) => Object.keys(o);"),
    ("__hsc_values", "const __hsc_values = (o) => Object.values(o);"),
    ("__hsc_entries", "const __hsc_entries = (o) => Object.entries(o);"),
];

/// Definitions of the used helpers, one per line, in a fixed order.
pub fn render_prelude(used: &BTreeSet<&str>) -> String {
    PRELUDE
        .iter()
        .filter(|(name, _)| used.contains(name))
        .map(|(_, definition)| format!("{}\n", definition))
        .collect()
}
