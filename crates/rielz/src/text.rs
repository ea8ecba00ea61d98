/// Strip leading and trailing whitespace without reallocating untouched values.
pub(crate) fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Longest name, type, location or phone value the schema stores.
pub(crate) const MAX_SHORT_TEXT: usize = 100;
/// Longest email address the schema stores.
pub(crate) const MAX_EMAIL: usize = 255;

/// Length in characters, matching how `VARCHAR(n)` counts.
pub(crate) fn too_long(value: &str, max: usize) -> bool {
    value.chars().count() > max
}
