use airlock_types::AUTH_COMMAND_PREFIXES;

/// Canonical form of a raw command line for gate checks: surrounding
/// whitespace trimmed, at most one leading `/` removed, lower-cased.
pub fn normalize_command(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_slash = trimmed.strip_prefix('/').unwrap_or(trimmed);
    without_slash.trim_start().to_lowercase()
}

/// Whether a frozen actor may run this command.
///
/// Prefix match so arguments pass through (`login hunter2`); everything
/// else is denied while frozen, including informational commands.
pub fn is_auth_command(raw: &str) -> bool {
    let normalized = normalize_command(raw);
    AUTH_COMMAND_PREFIXES
        .iter()
        .any(|prefix| normalized.starts_with(prefix))
}
