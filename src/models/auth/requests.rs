use serde::Deserialize;
use ts_rs::TS;

// Login request (username or email plus password)
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginRequest {
    /// Username or email
    pub username: String,
    /// Password
    pub password: String,
    /// Extend the refresh token lifetime
    #[serde(default)]
    pub remember_me: bool,
}
