use async_trait::async_trait;
use derive_new::new;
use kernel::model::user::{
    event::{CreateUser, UpdateUserProfile},
    User,
};
use kernel::repository::user::UserRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::user::{UserRow, USER_COLUMNS},
    ConnectionPool,
};

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_by_subject(&self, subject_id: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE subject_id = $1"
        ))
        .bind(subject_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(User::try_from)
        .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.to_lowercase())
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(User::try_from)
        .transpose()
    }

    async fn insert_if_absent(&self, event: CreateUser) -> AppResult<Option<User>> {
        // a concurrent first sign-in for the same subject loses here and returns no row
        sqlx::query_as::<_, UserRow>(&format!(
            r#"
                INSERT INTO users (user_id, subject_id, email, display_name, photo_url)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (subject_id) DO NOTHING
                RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(event.user_id)
        .bind(&event.subject_id)
        .bind(event.email.to_lowercase())
        .bind(&event.display_name)
        .bind(&event.photo_url)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(|e| AppError::from_write(e, "Email is already registered"))?
        .map(User::try_from)
        .transpose()
    }

    async fn create(&self, event: CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, UserRow>(&format!(
            r#"
                INSERT INTO users (user_id, subject_id, email, display_name, photo_url)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(event.user_id)
        .bind(&event.subject_id)
        .bind(event.email.to_lowercase())
        .bind(&event.display_name)
        .bind(&event.photo_url)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(|e| AppError::from_write(e, "User already exists"))
        .and_then(User::try_from)
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(User::try_from)
        .collect()
    }

    async fn update_profile(&self, event: UpdateUserProfile) -> AppResult<User> {
        let UpdateUserProfile {
            user_id,
            display_name,
            phone_number,
            address,
        } = event;
        // a provided address replaces the stored one as a whole
        let replace_address = address.is_some();
        let address = address.unwrap_or_default();

        sqlx::query_as::<_, UserRow>(&format!(
            r#"
                UPDATE users
                SET
                    display_name = COALESCE($2, display_name),
                    phone_number = COALESCE($3, phone_number),
                    address_street = CASE WHEN $4 THEN $5 ELSE address_street END,
                    address_city = CASE WHEN $4 THEN $6 ELSE address_city END,
                    address_state = CASE WHEN $4 THEN $7 ELSE address_state END,
                    address_zip_code = CASE WHEN $4 THEN $8 ELSE address_zip_code END
                WHERE user_id = $1
                RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(display_name)
        .bind(phone_number)
        .bind(replace_address)
        .bind(address.street)
        .bind(address.city)
        .bind(address.state)
        .bind(address.zip_code)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| AppError::EntityNotFound("User not found".into()))
        .and_then(User::try_from)
    }
}
