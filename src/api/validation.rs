use super::ApiError;

/// Longest query text accepted from clients.
pub const MAX_QUERY_LEN: usize = 200;

pub fn validate_query_text(query: &str) -> Result<&str, ApiError> {
    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ApiError::validation(format!(
            "Query must be {MAX_QUERY_LEN} characters or less"
        )));
    }

    if query.chars().any(char::is_control) {
        return Err(ApiError::validation(
            "Query cannot contain control characters",
        ));
    }

    Ok(query)
}

pub fn validate_limit(limit: u64) -> Result<u64, ApiError> {
    const MAX_LIMIT: u64 = 100;
    const MIN_LIMIT: u64 = 1;

    if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {}. Limit must be between {} and {}",
            limit, MIN_LIMIT, MAX_LIMIT
        )));
    }
    Ok(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_text_accepts_empty_and_whitespace() {
        assert!(validate_query_text("").is_ok());
        assert!(validate_query_text("  dune ").is_ok());
    }

    #[test]
    fn query_text_rejects_overlong_and_control_chars() {
        assert!(validate_query_text(&"a".repeat(MAX_QUERY_LEN + 1)).is_err());
        assert!(validate_query_text("du\nne").is_err());
    }

    #[test]
    fn limit_bounds() {
        assert!(validate_limit(0).is_err());
        assert!(validate_limit(5).is_ok());
        assert!(validate_limit(101).is_err());
    }
}
