//! Authentication
//!
//! Identity is established by the hosted auth provider; this module only decides what a
//! signed-in user may do.

use serde::{Deserialize, Serialize};

/// A signed-in user as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Provider user id
    pub uid: String,

    /// Email address, when the provider shares one
    pub email: Option<String>,

    /// Display name, when the provider shares one
    pub display_name: Option<String>,
}

impl Identity {
    /// Creates an identity with only a user id and email.
    pub fn new(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: Some(email.into()),
            display_name: None,
        }
    }
}

/// Which identity may administer the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminPolicy {
    admin_email: String,
}

impl AdminPolicy {
    /// Policy granting admin rights to the account with `admin_email`.
    pub fn new(admin_email: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into(),
        }
    }

    /// Whether `identity` is the administrator. Emails compare case-insensitively.
    pub fn is_admin(&self, identity: Option<&Identity>) -> bool {
        identity
            .and_then(|identity| identity.email.as_deref())
            .is_some_and(|email| email.to_lowercase() == self.admin_email.to_lowercase())
    }
}

/// The current user's session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    /// An anonymous session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session for a signed-in user.
    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// The signed-in user, if any.
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Enquiries may only be sent by signed-in users.
    pub fn can_enquire(&self) -> bool {
        self.identity.is_some()
    }

    /// Sign out.
    pub fn sign_out(&mut self) {
        self.identity = None;
    }
}
