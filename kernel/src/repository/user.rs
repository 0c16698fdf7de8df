use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::user::{
    event::{CreateUser, UpdateUserProfile},
    User,
};

#[mockall::automock]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_subject(&self, subject_id: &str) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    /// Inserts unless a user with the same subject id exists; `None` means another writer won.
    async fn insert_if_absent(&self, event: CreateUser) -> AppResult<Option<User>>;
    /// Strict insert; a duplicate subject id or email is a `Conflict`.
    async fn create(&self, event: CreateUser) -> AppResult<User>;
    async fn find_all(&self) -> AppResult<Vec<User>>;
    async fn update_profile(&self, event: UpdateUserProfile) -> AppResult<User>;
}
