//! Explicit user identity for store operations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::StoreError;

/// Identifies the user every store operation is scoped to.
///
/// Callers resolve the identity once per session and pass it to each call;
/// the store keeps no notion of a current user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a user id from its string form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identity used when nobody is signed in: the nil UUID.
    pub fn anonymous() -> Self {
        Self(Uuid::nil().to_string())
    }

    /// Returns true for the anonymous identity.
    pub fn is_anonymous(&self) -> bool {
        Uuid::parse_str(&self.0).is_ok_and(|id| id.is_nil())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(StoreError::Validation("user id cannot be empty".to_string()));
        }
        Ok(Self::new(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_is_nil_uuid() {
        let user = UserId::anonymous();
        assert_eq!(user.as_str(), "00000000-0000-0000-0000-000000000000");
        assert!(user.is_anonymous());
        assert_eq!(UserId::default(), user);
    }

    #[test]
    fn test_parse_trims() {
        let user: UserId = "  alice ".parse().unwrap();
        assert_eq!(user.as_str(), "alice");
        assert!(!user.is_anonymous());
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert!("   ".parse::<UserId>().is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&UserId::new("bob")).unwrap();
        assert_eq!(json, "\"bob\"");
    }
}
