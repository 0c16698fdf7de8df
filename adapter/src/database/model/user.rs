use kernel::model::{
    id::UserId,
    role::Role,
    user::{Address, User},
};
use shared::error::AppError;
use std::str::FromStr;

pub const USER_COLUMNS: &str = r#"
    user_id, subject_id, email, display_name, photo_url, role,
    phone_number, address_street, address_city, address_state, address_zip_code
"#;

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub user_id: UserId,
    pub subject_id: String,
    pub email: String,
    pub display_name: String,
    pub photo_url: String,
    pub role: String,
    pub phone_number: Option<String>,
    pub address_street: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_zip_code: Option<String>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(value: UserRow) -> Result<Self, Self::Error> {
        let UserRow {
            user_id,
            subject_id,
            email,
            display_name,
            photo_url,
            role,
            phone_number,
            address_street,
            address_city,
            address_state,
            address_zip_code,
        } = value;
        let address = Address {
            street: address_street,
            city: address_city,
            state: address_state,
            zip_code: address_zip_code,
        };
        Ok(User {
            user_id,
            subject_id,
            email,
            display_name,
            photo_url,
            role: Role::from_str(&role)
                .map_err(|_| AppError::ConversionEntityError(format!("unknown role: {role}")))?,
            phone_number,
            address: (!address.is_empty()).then_some(address),
        })
    }
}
