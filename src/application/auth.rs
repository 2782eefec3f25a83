use std::fmt;

/// Opaque bearer token supplied by the caller for mutating requests.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Returns `None` for blank input so a missing token and an empty key file
    /// are treated the same way.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_tokens_are_rejected() {
        assert!(AuthToken::new("").is_none());
        assert!(AuthToken::new("  \n").is_none());
    }

    #[test]
    fn token_is_trimmed_and_redacted() {
        let token = AuthToken::new(" secret\n").expect("token");
        assert_eq!(token.bearer(), "Bearer secret");
        assert_eq!(format!("{token:?}"), "AuthToken(***)");
    }
}
