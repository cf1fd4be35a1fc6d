use serde::{Deserialize, Serialize};

use crate::domain::ValidatedUser;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub message: String,
    pub service: String,
}

/// Body of `POST /validate-user`. Both fields are optional on the wire so
/// their absence is reported as a validation failure, not a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidateUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateUserResponse {
    pub message: String,
    pub email: String,
    pub name: String,
}

impl From<ValidatedUser> for ValidateUserResponse {
    fn from(user: ValidatedUser) -> Self {
        Self {
            message: "User validation successful".to_owned(),
            email: user.email,
            name: user.name,
        }
    }
}
