use crate::model::{
    id::UserId,
    identity::VerifiedIdentity,
    user::Address,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUser {
    pub user_id: UserId,
    pub subject_id: String,
    pub email: String,
    pub display_name: String,
    pub photo_url: String,
}

impl From<&VerifiedIdentity> for CreateUser {
    fn from(value: &VerifiedIdentity) -> Self {
        let email = value.email.trim().to_lowercase();
        let display_name = value
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());
        Self {
            user_id: UserId::new(),
            subject_id: value.subject.clone(),
            email,
            display_name,
            photo_url: value.picture.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserProfile {
    pub user_id: UserId,
    pub display_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<Address>,
}
