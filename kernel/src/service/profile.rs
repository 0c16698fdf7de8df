use std::sync::Arc;

use derive_new::new;
use shared::error::AppResult;

use crate::{
    model::{
        identity::Identity,
        user::{event::UpdateUserProfile, Address, User},
    },
    repository::user::UserRepository,
    service::{guard, non_blank},
};

/// Profile edits by the account holder and the admin-only user directory.
#[derive(new, Clone)]
pub struct UserDirectory {
    users: Arc<dyn UserRepository>,
}

impl UserDirectory {
    /// Applies only the fields that carry a non-blank value; role and email are never touched.
    pub async fn update_profile(
        &self,
        actor: &Identity,
        display_name: Option<String>,
        phone_number: Option<String>,
        address: Option<Address>,
    ) -> AppResult<User> {
        let event = UpdateUserProfile {
            user_id: actor.user_id,
            display_name: non_blank(display_name),
            phone_number: non_blank(phone_number),
            address: address.map(normalize_address).filter(|a| !a.is_empty()),
        };
        let user = self.users.update_profile(event).await?;
        tracing::info!(user_id = %user.user_id, "Profile updated");
        Ok(user)
    }

    pub async fn list_all(&self, actor: &Identity) -> AppResult<Vec<User>> {
        guard::require_admin(actor)?;
        self.users.find_all().await
    }
}

fn normalize_address(address: Address) -> Address {
    Address {
        street: non_blank(address.street),
        city: non_blank(address.city),
        state: non_blank(address.state),
        zip_code: non_blank(address.zip_code),
    }
}
