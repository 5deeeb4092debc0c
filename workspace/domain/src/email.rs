use validator::ValidateEmail;

/// Longest address the `users.email` column accepts.
pub const MAX_EMAIL_LENGTH: usize = 255;

/// Normalizes an email address by lowercasing its domain part.
///
/// The local part is kept as written. Surrounding whitespace is dropped.
/// Input without an `@` comes back trimmed but otherwise untouched; it is
/// rejected later by [`is_valid_email`].
pub fn normalize_email(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => trimmed.to_string(),
    }
}

/// Returns true for a non-empty, syntactically valid address.
pub fn is_valid_email(raw: &str) -> bool {
    let candidate = raw.trim().to_string();
    !candidate.is_empty() && candidate.validate_email()
}
