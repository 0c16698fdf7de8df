use garde::Validate;
use kernel::model::{
    id::UserId,
    role::Role,
    user::{Address, User},
};
use serde::{Deserialize, Serialize};
use strum::VariantNames;

#[derive(Debug, Serialize, Deserialize, VariantNames)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoleName {
    Admin,
    User,
}

impl From<Role> for RoleName {
    fn from(value: Role) -> Self {
        match value {
            Role::Admin => Self::Admin,
            Role::User => Self::User,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersResponse {
    pub items: Vec<ProfileResponse>,
}

impl From<Vec<User>> for UsersResponse {
    fn from(value: Vec<User>) -> Self {
        Self {
            items: value.into_iter().map(ProfileResponse::from).collect(),
        }
    }
}

/// Public shape of an account, as returned by the auth endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: UserId,
    pub uid: String,
    pub email: String,
    pub display_name: String,
    #[serde(rename = "photoURL")]
    pub photo_url: String,
    pub role: RoleName,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        let User {
            user_id,
            subject_id,
            email,
            display_name,
            photo_url,
            role,
            ..
        } = value;
        Self {
            user_id,
            uid: subject_id,
            email,
            display_name,
            photo_url,
            role: RoleName::from(role),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub phone_number: Option<String>,
    pub address: Option<AddressBody>,
}

impl From<User> for ProfileResponse {
    fn from(mut value: User) -> Self {
        let phone_number = value.phone_number.take();
        let address = value.address.take().map(AddressBody::from);
        Self {
            user: UserResponse::from(value),
            phone_number,
            address,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddressBody {
    #[garde(length(max = 255))]
    pub street: Option<String>,
    #[garde(length(max = 255))]
    pub city: Option<String>,
    #[garde(length(max = 255))]
    pub state: Option<String>,
    #[garde(length(max = 32))]
    pub zip_code: Option<String>,
}

impl From<Address> for AddressBody {
    fn from(value: Address) -> Self {
        let Address {
            street,
            city,
            state,
            zip_code,
        } = value;
        Self {
            street,
            city,
            state,
            zip_code,
        }
    }
}

impl From<AddressBody> for Address {
    fn from(value: AddressBody) -> Self {
        let AddressBody {
            street,
            city,
            state,
            zip_code,
        } = value;
        Self {
            street,
            city,
            state,
            zip_code,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[garde(length(max = 255))]
    pub display_name: Option<String>,
    #[garde(length(max = 64))]
    pub phone_number: Option<String>,
    #[garde(dive)]
    pub address: Option<AddressBody>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub message: &'static str,
    pub user: UserResponse,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdatedResponse {
    pub message: &'static str,
    pub user: ProfileResponse,
}
