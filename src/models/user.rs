use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ValidationError, required_text};
use crate::store::Document;

const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Coach,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            role: Role::default(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

impl Document for User {
    fn id(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> Uuid {
        self.id
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Registration input after validation, password still in clear text.
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<NewUser, ValidationError> {
        let name = required_text(self.name, "Le nom est requis")?;
        let email = normalize_email(&required_text(self.email, "L'email est requis")?);
        let password = self
            .password
            .ok_or_else(|| ValidationError("Le mot de passe est requis".to_string()))?;

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError(format!(
                "Le mot de passe doit contenir au moins {} caractères",
                MIN_PASSWORD_LENGTH
            )));
        }

        Ok(NewUser {
            name,
            email,
            password,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[test]
    fn test_register_normalizes_email() {
        let new_user = request("Coach Kim", "  Kim@Example.COM ", "secret1")
            .validate()
            .unwrap();

        assert_eq!(new_user.email, "kim@example.com");
        assert_eq!(new_user.name, "Coach Kim");
    }

    #[test]
    fn test_register_rejects_short_password() {
        assert!(request("Kim", "kim@example.com", "12345").validate().is_err());
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let user = User::new(
            "Kim".to_string(),
            "kim@example.com".to_string(),
            "$2b$hash".to_string(),
        );
        let value = serde_json::to_value(&user).unwrap();

        assert!(value.get("passwordHash").is_none());
        assert_eq!(value["role"], "coach");
        assert_eq!(value["isActive"], true);
    }
}
