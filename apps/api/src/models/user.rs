//! User model for Pulse

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User record from the users table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Account balance
    pub balance: f64,
}

/// User creation input
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub balance: f64,
}

/// Partial user update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeUser {
    pub name: Option<String>,
    pub balance: Option<f64>,
}

impl ChangeUser {
    /// Apply the changed fields to an existing row
    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(balance) = self.balance {
            user.balance = balance;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_user_applies_only_set_fields() {
        let mut user = User {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            balance: 10.0,
        };

        ChangeUser {
            name: None,
            balance: Some(42.5),
        }
        .apply(&mut user);

        assert_eq!(user.name, "Ada");
        assert_eq!(user.balance, 42.5);
    }

    #[test]
    fn test_user_serialization() {
        let user = User {
            id: Uuid::nil(),
            name: "Ada".to_string(),
            balance: 1.5,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["name"], "Ada");
        assert_eq!(json["balance"], 1.5);
    }
}
