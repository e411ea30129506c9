use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid email or password")]
    Rejected,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        // Back off to a char boundary; bodies are arbitrary UTF-8 and a
        // fixed byte offset can land inside a multi-byte character.
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..end],
            body.len()
        )
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 | 403 => ApiError::Rejected,
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn short_bodies_pass_through_untruncated() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert_eq!(err.to_string(), "Server error: boom");
    }

    #[test]
    fn long_bodies_truncate_without_splitting_codepoints() {
        // 499 ASCII bytes followed by 3-byte characters, so the truncation
        // offset falls mid-codepoint.
        let body = format!("{}{}", "a".repeat(MAX_ERROR_BODY_LENGTH - 1), "\u{20ac}\u{20ac}");
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);

        let message = err.to_string();
        assert!(message.contains("truncated"));
        assert!(message.contains(&format!("{} total bytes", body.len())));
        assert!(!message.contains('\u{20ac}'));
    }

    #[test]
    fn rejected_status_with_long_multibyte_body_maps_to_rejected() {
        let body = "\u{20ac}".repeat(MAX_ERROR_BODY_LENGTH);
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, &body),
            ApiError::Rejected
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, &body),
            ApiError::Rejected
        ));
    }
}
