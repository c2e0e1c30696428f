//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bakehouse_core::{BuyerIdentity, Email, Role, UserId};

/// A marketplace account.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub role: Role,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Name shown to other users: the display name, else the email.
    #[must_use]
    pub fn public_name(&self) -> String {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(|| self.email.to_string(), String::from)
    }

    #[must_use]
    pub fn as_buyer(&self) -> BuyerIdentity {
        BuyerIdentity {
            id: self.id,
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }
}
