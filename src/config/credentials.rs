//! API credentials loaded from the environment
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file by the binary before loading. Tokens are wiped from memory on drop.

use std::fmt;

use zeroize::Zeroizing;

use crate::error::SyncError;

pub const YNAB_TOKEN_VAR: &str = "YNAB_TOKEN";
pub const YNAB_BUDGET_ID_VAR: &str = "YNAB_BUDGET_ID";
pub const SPLITWISE_KEY_VAR: &str = "SPLITWISE_KEY";
pub const SPLITWISE_GROUP_ID_VAR: &str = "SPLITWISE_GROUP_ID";

/// YNAB's alias for the most recently opened budget
const LAST_USED_BUDGET: &str = "last-used";

/// Credentials for both remote services
pub struct Credentials {
    pub ynab_token: Zeroizing<String>,
    pub budget_id: String,
    pub splitwise_key: Zeroizing<String>,
    /// Overrides `Settings::splitwise_group_id` when present
    pub splitwise_group_id: Option<u64>,
}

impl Credentials {
    /// Load credentials from the process environment
    pub fn from_env() -> Result<Self, SyncError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load credentials through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SyncError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let ynab_token =
            non_empty(YNAB_TOKEN_VAR).ok_or(SyncError::MissingCredential(YNAB_TOKEN_VAR))?;
        let splitwise_key =
            non_empty(SPLITWISE_KEY_VAR).ok_or(SyncError::MissingCredential(SPLITWISE_KEY_VAR))?;
        let budget_id =
            non_empty(YNAB_BUDGET_ID_VAR).unwrap_or_else(|| LAST_USED_BUDGET.to_string());

        let splitwise_group_id = match non_empty(SPLITWISE_GROUP_ID_VAR) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                SyncError::Config(format!("{} is not a valid id: {}", SPLITWISE_GROUP_ID_VAR, e))
            })?),
            None => None,
        };

        Ok(Self {
            ynab_token: Zeroizing::new(ynab_token),
            budget_id,
            splitwise_key: Zeroizing::new(splitwise_key),
            splitwise_group_id,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("ynab_token", &"[REDACTED]")
            .field("budget_id", &self.budget_id)
            .field("splitwise_key", &"[REDACTED]")
            .field("splitwise_group_id", &self.splitwise_group_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_all_present() {
        let creds = Credentials::from_lookup(lookup(&[
            (YNAB_TOKEN_VAR, "ynab-secret"),
            (YNAB_BUDGET_ID_VAR, "budget-1"),
            (SPLITWISE_KEY_VAR, "sw-secret"),
            (SPLITWISE_GROUP_ID_VAR, "5600408"),
        ]))
        .unwrap();

        assert_eq!(creds.ynab_token.as_str(), "ynab-secret");
        assert_eq!(creds.budget_id, "budget-1");
        assert_eq!(creds.splitwise_group_id, Some(5600408));
    }

    #[test]
    fn test_missing_ynab_token() {
        let err = Credentials::from_lookup(lookup(&[(SPLITWISE_KEY_VAR, "sw")])).unwrap_err();
        assert!(matches!(err, SyncError::MissingCredential(YNAB_TOKEN_VAR)));
    }

    #[test]
    fn test_blank_splitwise_key_is_missing() {
        let err = Credentials::from_lookup(lookup(&[
            (YNAB_TOKEN_VAR, "t"),
            (SPLITWISE_KEY_VAR, "   "),
        ]))
        .unwrap_err();
        assert!(matches!(err, SyncError::MissingCredential(SPLITWISE_KEY_VAR)));
    }

    #[test]
    fn test_budget_defaults_to_last_used() {
        let creds = Credentials::from_lookup(lookup(&[
            (YNAB_TOKEN_VAR, "t"),
            (SPLITWISE_KEY_VAR, "k"),
        ]))
        .unwrap();
        assert_eq!(creds.budget_id, "last-used");
        assert_eq!(creds.splitwise_group_id, None);
    }

    #[test]
    fn test_invalid_group_id() {
        let err = Credentials::from_lookup(lookup(&[
            (YNAB_TOKEN_VAR, "t"),
            (SPLITWISE_KEY_VAR, "k"),
            (SPLITWISE_GROUP_ID_VAR, "abc"),
        ]))
        .unwrap_err();
        assert!(matches!(err, SyncError::Config(_)));
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let creds = Credentials::from_lookup(lookup(&[
            (YNAB_TOKEN_VAR, "ynab-secret"),
            (SPLITWISE_KEY_VAR, "sw-secret"),
        ]))
        .unwrap();
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("ynab-secret"));
        assert!(!debug.contains("sw-secret"));
    }
}
