use serde::Deserialize;
use ts_rs::TS;

/// Registration / account creation request
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub profile_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Profile update request
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateProfileRequest {
    pub profile_name: Option<String>,
    pub avatar_url: Option<String>,
}
