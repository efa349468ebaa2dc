//! Environment variable parsing shared by the observability settings.

/// Looks up an environment variable, trimmed, treating empty as unset.
pub fn lookup_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Interprets `true`/`1`/`yes` (any case) as true, anything else as false.
pub fn parse_bool(value: &str) -> bool {
    let value = value.to_lowercase();
    value == "true" || value == "1" || value == "yes"
}
