use strum::{AsRefStr, Display, EnumString};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, AsRefStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}
