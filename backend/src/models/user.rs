use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Participant,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Participant => write!(f, "participant"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Pool participant. Points are never stored; they are recomputed from
/// predictions and match results on every read.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Stable id derived from an email: every non-alphanumeric becomes `_`
    pub fn id_from_email(email: &str) -> String {
        email
            .trim()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }
}

/// Admin invitation of a new participant or admin
#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct InviteUserDTO {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub role: Role,
}

impl From<InviteUserDTO> for User {
    fn from(dto: InviteUserDTO) -> Self {
        let email = dto.email.trim().to_lowercase();
        Self {
            id: User::id_from_email(&email),
            name: dto.name.trim().to_string(),
            email,
            role: dto.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_email() {
        assert_eq!(User::id_from_email("zico@flamengo.com"), "zico_flamengo_com");
    }

    #[test]
    fn test_invite_builds_participant_by_default() {
        let dto: InviteUserDTO = serde_json::from_value(serde_json::json!({
            "email": "Adilio@Flamengo.com",
            "name": " Adílio "
        }))
        .unwrap();
        assert!(dto.validate().is_ok());

        let user = User::from(dto);
        assert_eq!(user.id, "adilio_flamengo_com");
        assert_eq!(user.name, "Adílio");
        assert_eq!(user.role, Role::Participant);
    }

    #[test]
    fn test_invite_rejects_bad_email() {
        let dto = InviteUserDTO {
            email: "not-an-email".to_string(),
            name: "Zico".to_string(),
            role: Role::Admin,
        };
        assert!(dto.validate().is_err());
    }
}
