use crate::model::{
    id::UserId,
    identity::Identity,
    role::Role,
};

pub mod event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub subject_id: String,
    pub email: String,
    pub display_name: String,
    pub photo_url: String,
    pub role: Role,
    pub phone_number: Option<String>,
    pub address: Option<Address>,
}

impl User {
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id,
            subject: self.subject_id.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.street.is_none() && self.city.is_none() && self.state.is_none() && self.zip_code.is_none()
    }
}

/// Result of a find-or-create lookup; `created` is true only for the insert that won.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUser {
    pub user: User,
    pub created: bool,
}
