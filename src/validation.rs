//! Field-level request validation: the pre-condition gate handlers run
//! before touching the store. Failures surface as 400 responses with a
//! message naming the operation.

use url::Url;

/// Bounds shared by user display fields and card names.
const TEXT_MIN: usize = 2;
const TEXT_MAX: usize = 30;

pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("email cannot be empty".to_string());
    }

    // Basic email format check
    if !email.contains('@') || !email.contains('.') {
        return Err("invalid email format".to_string());
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err("invalid email format".to_string());
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("password cannot be empty".to_string());
    }

    Ok(())
}

pub fn validate_text_field(field: &str, value: &str) -> Result<(), String> {
    let length = value.chars().count();
    if length < TEXT_MIN || length > TEXT_MAX {
        return Err(format!(
            "{} must be between {} and {} characters",
            field, TEXT_MIN, TEXT_MAX
        ));
    }

    Ok(())
}

pub fn validate_url_field(field: &str, value: &str) -> Result<(), String> {
    let parsed = Url::parse(value).map_err(|_| format!("{} must be a valid URL", field))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(format!("{} must be an http or https URL", field));
    }

    Ok(())
}
