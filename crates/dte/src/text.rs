//! Field-length policy of the DTE schema.

pub const NAME_MAX: usize = 200;
pub const CODE_MAX: usize = 25;
pub const DESCRIPTION_MAX: usize = 1000;
pub const PHONE_MAX: usize = 25;
pub const EMAIL_MAX: usize = 100;
pub const ADDRESS_MAX: usize = 200;
pub const DEPARTMENT_MAX: usize = 2;
pub const OBSERVATIONS_MAX: usize = 3000;

/// Keep at most `max` characters (not bytes).
pub fn truncate(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}

pub fn truncate_opt(value: Option<&str>, max: usize) -> Option<String> {
    value.map(|v| truncate(v, max))
}
