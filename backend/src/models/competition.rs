use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq, Validate)]
pub struct Competition {
    #[validate(length(min = 1, message = "Competition id is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "Competition name is required"))]
    pub name: String,
}

impl Competition {
    /// Placeholder for a competition referenced by matches but never registered.
    /// `copa_do_brasil` becomes "Copa Do Brasil".
    pub fn from_unregistered_id(id: &str) -> Self {
        let name = id
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            id: id.to_string(),
            name,
        }
    }
}
