//! Managed resource kinds
//!
//! Each kind knows three things beyond the generic reconcile engine:
//! - how to read live state and reshape it like the desired document
//! - which baseline entries must always exist
//! - how to route and shape its create/update/delete calls

use clap::ValueEnum;
use reconcile::{ApplyError, KindAdapter, ResourceMapping, Strategy, merge_baseline};
use std::fmt;
use vaultapi::VaultClient;

pub mod auth_method;
pub mod policy;
pub mod userpass;

pub use auth_method::AuthMethods;
pub use policy::Policies;
pub use userpass::UserAccounts;

/// Core trait for every kind of resource vaultsync manages
pub trait ManagedKind: KindAdapter {
    /// Which kind this is
    fn kind(&self) -> Kind;

    /// How desired and live definitions are compared
    fn strategy(&self) -> Strategy;

    /// Entries always merged over the desired document
    fn baseline(&self) -> ResourceMapping {
        ResourceMapping::new()
    }

    /// Validate and normalize the user's document before the baseline merge
    fn prepare_desired(&self, document: ResourceMapping) -> Result<ResourceMapping, ApplyError> {
        Ok(document)
    }

    /// Read live state, shaped like the desired document. Read-only.
    fn fetch_live(&self, client: &VaultClient) -> vaultapi::Result<ResourceMapping>;

    /// Effective desired state: prepared document with the baseline on top
    fn desired_state(&self, document: ResourceMapping) -> Result<ResourceMapping, ApplyError> {
        Ok(merge_baseline(self.prepare_desired(document)?, &self.baseline()))
    }
}

/// Resource kinds selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum Kind {
    /// Auth backends mounted under sys/auth
    AuthMethods,
    /// ACL policies
    Policies,
    /// Accounts in userpass backends
    #[value(name = "userpass")]
    UserAccounts,
}

impl Kind {
    /// All kinds, in the order a full sync applies them
    ///
    /// Auth methods come first so userpass backends exist before accounts
    /// are written into them.
    pub const ALL: [Kind; 3] = [Kind::AuthMethods, Kind::Policies, Kind::UserAccounts];

    /// Section name in a combined document and in reports
    pub fn document_key(&self) -> &'static str {
        match self {
            Self::AuthMethods => "auth_methods",
            Self::Policies => "policies",
            Self::UserAccounts => "userpasses",
        }
    }

    /// Human-readable title
    pub fn title(&self) -> &'static str {
        match self {
            Self::AuthMethods => "Auth methods",
            Self::Policies => "Policies",
            Self::UserAccounts => "Userpass accounts",
        }
    }

    /// Singular noun for one resource, used in log lines
    pub fn noun(&self) -> &'static str {
        match self {
            Self::AuthMethods => "auth method",
            Self::Policies => "policy",
            Self::UserAccounts => "account",
        }
    }

    /// The manager for this kind
    pub fn manager(&self) -> Box<dyn ManagedKind> {
        match self {
            Self::AuthMethods => Box::new(AuthMethods),
            Self::Policies => Box::new(Policies),
            Self::UserAccounts => Box::new(UserAccounts),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.document_key())
    }
}

/// Names returned by a LIST call; anything but an array of strings is empty
pub(crate) fn list_names(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_order_and_keys() {
        let keys: Vec<_> = Kind::ALL.iter().map(Kind::document_key).collect();
        assert_eq!(keys, vec!["auth_methods", "policies", "userpasses"]);
    }

    #[test]
    fn test_kind_manager_matches_kind() {
        for kind in Kind::ALL {
            assert_eq!(kind.manager().kind(), kind);
        }
    }

    #[test]
    fn test_kind_value_names() {
        assert_eq!(
            Kind::from_str("auth-methods", false).unwrap(),
            Kind::AuthMethods
        );
        assert_eq!(Kind::from_str("userpass", false).unwrap(), Kind::UserAccounts);
    }

    #[test]
    fn test_list_names() {
        assert_eq!(list_names(&json!(["a", "b"])), vec!["a", "b"]);
        assert!(list_names(&json!({"errors": []})).is_empty());
        assert!(list_names(&json!({})).is_empty());
        assert!(list_names(&serde_json::Value::Null).is_empty());
    }
}
