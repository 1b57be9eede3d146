//! Request and response bodies for the auth endpoints.
//!
//! The upload pipeline only needs the bearer token these calls produce and
//! the current user's id; everything else is carried for the CLI.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
}

/// The authenticated user, as returned by `/auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub phone: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub has_given_consent: bool,
    #[serde(default)]
    pub consent_given_at: Option<String>,
    #[serde(default)]
    pub last_login_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendOtpRequest {
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendOtpResponse {
    pub status: String,
    pub message: String,
    pub reference_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    pub phone_number: String,
    pub otp_code: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub has_given_consent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    pub user_id: String,
    pub phone_number: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_tolerates_missing_optionals() {
        let json = r#"{"id":"u1","phone":"+911234567890"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "u1");
        assert!(user.email.is_none());
        assert!(!user.is_active);
    }

    #[test]
    fn verify_request_field_names() {
        let req = VerifyOtpRequest {
            phone_number: "+91".into(),
            otp_code: "123456".into(),
            name: "A".into(),
            email: "a@example.com".into(),
            password: "pw".into(),
            has_given_consent: true,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["otp_code"], "123456");
        assert_eq!(value["has_given_consent"], true);
    }
}
