//! Secret masking for display

use std::collections::HashSet;

use crate::domain::api_key::ApiKeyId;

/// Characters of the secret left visible when masked
pub const VISIBLE_PREFIX_LEN: usize = 3;
/// Appended after the visible prefix
pub const MASK_SUFFIX: &str = "••••••••••••";
/// Shown in place of secrets too short to keep a prefix
pub const SHORT_MASK: &str = "••••";

/// Masked rendering of a secret: its first three characters and a fixed suffix
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= VISIBLE_PREFIX_LEN {
        return SHORT_MASK.to_string();
    }

    let prefix: String = secret.chars().take(VISIBLE_PREFIX_LEN).collect();
    format!("{}{}", prefix, MASK_SUFFIX)
}

/// Ids whose secrets are currently shown in full; everything else is masked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaskState {
    unmasked: HashSet<ApiKeyId>,
}

impl MaskState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one record between masked and unmasked; returns whether it is now unmasked
    pub fn toggle(&mut self, id: &ApiKeyId) -> bool {
        if self.unmasked.remove(id) {
            false
        } else {
            self.unmasked.insert(id.clone());
            true
        }
    }

    pub fn is_unmasked(&self, id: &ApiKeyId) -> bool {
        self.unmasked.contains(id)
    }

    /// Forget ids that fail `keep`
    pub fn retain(&mut self, mut keep: impl FnMut(&ApiKeyId) -> bool) {
        self.unmasked.retain(|id| keep(id));
    }

    /// The secret as it should be displayed for `id`
    pub fn display(&self, id: &ApiKeyId, secret: &str) -> String {
        if self.is_unmasked(id) {
            secret.to_string()
        } else {
            mask_secret(secret)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret() {
        assert_eq!(
            mask_secret("sk_0123456789abcdef0123456789abcdef"),
            "sk_••••••••••••"
        );
        assert_eq!(mask_secret("abcd"), "abc••••••••••••");
    }

    #[test]
    fn test_mask_short_secret() {
        assert_eq!(mask_secret(""), SHORT_MASK);
        assert_eq!(mask_secret("ab"), SHORT_MASK);
        assert_eq!(mask_secret("abc"), SHORT_MASK);
    }

    #[test]
    fn test_toggle_twice_restores_mask() {
        let id = ApiKeyId::new("k1").unwrap();
        let secret = "sk_0123456789abcdef0123456789abcdef";
        let mut state = MaskState::new();

        assert_eq!(state.display(&id, secret), "sk_••••••••••••");

        assert!(state.toggle(&id));
        assert_eq!(state.display(&id, secret), secret);

        assert!(!state.toggle(&id));
        assert_eq!(state.display(&id, secret), "sk_••••••••••••");
        assert!(!state.is_unmasked(&id));
        assert_eq!(state, MaskState::new());
    }

    #[test]
    fn test_toggle_is_per_record() {
        let a = ApiKeyId::new("a").unwrap();
        let b = ApiKeyId::new("b").unwrap();
        let mut state = MaskState::new();

        state.toggle(&a);

        assert!(state.is_unmasked(&a));
        assert!(!state.is_unmasked(&b));
    }

    #[test]
    fn test_retain() {
        let a = ApiKeyId::new("a").unwrap();
        let b = ApiKeyId::new("b").unwrap();
        let mut state = MaskState::new();
        state.toggle(&a);
        state.toggle(&b);

        state.retain(|id| id == &b);

        assert!(!state.is_unmasked(&a));
        assert!(state.is_unmasked(&b));
    }
}
