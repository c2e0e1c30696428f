//! Account roles and order statuses.

use serde::{Deserialize, Serialize};

/// Marketplace account role.
///
/// Stored as snake_case text in `bakehouse.user.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Browses the marketplace, fills a cart and pays over UPI.
    Customer,
    /// Uploads products and receives order notifications.
    Seller,
    /// Manages users. Created from the CLI only.
    Admin,
}

impl Role {
    /// Where the client should go after logging in.
    #[must_use]
    pub const fn landing_path(self) -> &'static str {
        match self {
            Self::Customer => "/customer/marketplace",
            Self::Seller => "/seller/dashboard",
            Self::Admin => "/admin/dashboard",
        }
    }

    /// Whether the public signup endpoint may create this role.
    #[must_use]
    pub const fn can_self_register(self) -> bool {
        matches!(self, Self::Customer | Self::Seller)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Seller => "seller",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "seller" => Ok(Self::Seller),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

/// Order status.
///
/// Checkout writes `Paid` once the buyer reports a UPI reference and nothing
/// ever moves an order out of it; sellers verify payment by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Paid,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "Paid",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Paid" => Ok(Self::Paid),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_paths() {
        assert_eq!(Role::Seller.landing_path(), "/seller/dashboard");
        assert_eq!(Role::Customer.landing_path(), "/customer/marketplace");
        assert_eq!(Role::Admin.landing_path(), "/admin/dashboard");
    }

    #[test]
    fn test_role_text_roundtrip() {
        for role in [Role::Customer, Role::Seller, Role::Admin] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert!("baker".parse::<Role>().is_err());
    }

    #[test]
    fn test_admin_cannot_self_register() {
        assert!(Role::Customer.can_self_register());
        assert!(Role::Seller.can_self_register());
        assert!(!Role::Admin.can_self_register());
    }

    #[test]
    fn test_order_status_serializes_capitalized() {
        assert_eq!(serde_json::to_string(&OrderStatus::Paid).unwrap(), "\"Paid\"");
        assert_eq!("Paid".parse::<OrderStatus>().unwrap(), OrderStatus::Paid);
    }
}
