//! Token-based admin classification.
//!
//! Session and identity management live outside this service; all it needs
//! is a yes/no answer on whether a caller is administrative. A static token
//! set from configuration is enough for that seam.

use std::collections::HashSet;

use async_trait::async_trait;

use super::traits::BaseAuthorizer;

/// Checks bearer tokens against the configured admin token set.
pub struct TokenAuthorizer {
    tokens: HashSet<String>,
}

impl TokenAuthorizer {
    pub fn new(tokens: impl IntoIterator<Item = String>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
        }
    }
}

#[async_trait]
impl BaseAuthorizer for TokenAuthorizer {
    async fn is_admin(&self, bearer_token: Option<&str>) -> bool {
        match bearer_token {
            Some(token) => self.tokens.contains(token),
            None => false,
        }
    }
}
