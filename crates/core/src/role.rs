//! # Role Module
//!
//! Role gate: map token của request sang một tier trước khi workflow chạy.
//! State machine không biết token được cấp thế nào.

use crate::error::{CoreError, CoreResult};
use crate::tier::Tier;
use std::collections::HashMap;

/// Resolve token của request thành tier của người gọi.
///
/// Token thiếu hoặc không nhận diện được -> `Unauthorized`.
pub trait RoleResolver: Send + Sync {
    fn resolve_role(&self, token: Option<&str>) -> CoreResult<Tier>;
}

/// Resolver với một token cố định cho mỗi tier, nạp từ config.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenResolver {
    tokens: HashMap<String, Tier>,
}

impl StaticTokenResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gán token cho tier. Token rỗng bị bỏ qua.
    pub fn with_token(mut self, tier: Tier, token: impl Into<String>) -> Self {
        let token = token.into();
        if !token.trim().is_empty() {
            self.tokens.insert(token, tier);
        }
        self
    }

    /// Gán token nếu có
    pub fn with_optional_token(self, tier: Tier, token: Option<String>) -> Self {
        match token {
            Some(token) => self.with_token(tier, token),
            None => self,
        }
    }

    /// Các tier đã được cấu hình token
    pub fn configured_tiers(&self) -> Vec<Tier> {
        Tier::ALL
            .into_iter()
            .filter(|tier| self.tokens.values().any(|t| t == tier))
            .collect()
    }
}

impl RoleResolver for StaticTokenResolver {
    fn resolve_role(&self, token: Option<&str>) -> CoreResult<Tier> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CoreError::Unauthorized("missing role token".to_string()))?;

        self.tokens
            .get(token)
            .copied()
            .ok_or_else(|| CoreError::Unauthorized("unrecognized role token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> StaticTokenResolver {
        StaticTokenResolver::new()
            .with_token(Tier::Admin, "k")
            .with_token(Tier::HigherOfficial, "p")
            .with_token(Tier::SuperOfficial, "m")
    }

    #[test]
    fn test_resolves_each_tier() {
        let r = resolver();
        assert_eq!(r.resolve_role(Some("k")).unwrap(), Tier::Admin);
        assert_eq!(r.resolve_role(Some("p")).unwrap(), Tier::HigherOfficial);
        assert_eq!(r.resolve_role(Some("m")).unwrap(), Tier::SuperOfficial);
    }

    #[test]
    fn test_missing_or_unknown_token_is_unauthorized() {
        let r = resolver();
        assert!(r.resolve_role(None).unwrap_err().is_unauthorized());
        assert!(r.resolve_role(Some("")).unwrap_err().is_unauthorized());
        assert!(r.resolve_role(Some("K")).unwrap_err().is_unauthorized());
    }

    #[test]
    fn test_blank_tokens_not_registered() {
        let r = StaticTokenResolver::new()
            .with_token(Tier::Admin, "  ")
            .with_optional_token(Tier::SuperOfficial, Some("m".to_string()))
            .with_optional_token(Tier::HigherOfficial, None);
        assert_eq!(r.configured_tiers(), vec![Tier::SuperOfficial]);
        assert!(r.resolve_role(Some("  ")).is_err());
    }
}
