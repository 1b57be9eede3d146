//! Auth endpoints.
//!
//! These issue the bearer token the upload calls need; the client itself
//! never stores it. Build a new [`Client`] with the returned token.

use corpus_protocol::Endpoint;
use corpus_protocol::auth::{
    LoginRequest, LoginResponse, SendOtpRequest, SendOtpResponse, User, VerifyOtpRequest,
    VerifyOtpResponse,
};

use crate::client::{Client, Error};

impl Client {
    /// Exchanges phone and password for an access token.
    pub async fn login(&self, phone: &str, password: &str) -> Result<LoginResponse, Error> {
        let req = LoginRequest {
            phone: phone.to_string(),
            password: password.to_string(),
        };
        self.post_json(Endpoint::Login, &req).await
    }

    /// Returns the user the current credential belongs to.
    pub async fn current_user(&self) -> Result<User, Error> {
        self.get_json(Endpoint::CurrentUser).await
    }

    pub async fn send_signup_otp(&self, phone_number: &str) -> Result<SendOtpResponse, Error> {
        let req = SendOtpRequest {
            phone_number: phone_number.to_string(),
        };
        self.post_json(Endpoint::SendSignupOtp, &req).await
    }

    pub async fn verify_signup_otp(
        &self,
        req: &VerifyOtpRequest,
    ) -> Result<VerifyOtpResponse, Error> {
        self.post_json(Endpoint::VerifySignupOtp, req).await
    }

    pub async fn resend_signup_otp(&self, phone_number: &str) -> Result<SendOtpResponse, Error> {
        let req = SendOtpRequest {
            phone_number: phone_number.to_string(),
        };
        self.post_json(Endpoint::ResendSignupOtp, &req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Credentials;
    use crate::test_support::{MockResponse, mock_server};

    #[tokio::test]
    async fn login_returns_token() {
        let (url, handle) = mock_server(vec![MockResponse::json(
            200,
            r#"{"access_token":"tok-abc","token_type":"bearer"}"#,
        )])
        .await;

        let client = Client::new(&url, &Credentials::Anonymous).unwrap();
        let resp = client.login("+911234567890", "secret").await.unwrap();
        assert_eq!(resp.access_token, "tok-abc");

        let requests = handle.await.unwrap();
        let req = &requests[0];
        assert!(req.starts_with("POST /api/v1/auth/login "));
        assert!(req.contains(r#""phone":"+911234567890""#));
        assert!(req.to_ascii_lowercase().contains("content-type: application/json"));
    }

    #[tokio::test]
    async fn login_failure_uses_fallback() {
        let (url, handle) =
            mock_server(vec![MockResponse::json(401, r#"{"detail":"Invalid credentials"}"#)])
                .await;

        let client = Client::new(&url, &Credentials::Anonymous).unwrap();
        let err = client.login("+91", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Login failed");
        handle.abort();
    }

    #[tokio::test]
    async fn current_user_sends_bearer() {
        let (url, handle) = mock_server(vec![MockResponse::json(
            200,
            r#"{"id":"user-1","phone":"+91","name":"Asha","is_active":true}"#,
        )])
        .await;

        let client = Client::new(&url, &Credentials::Bearer("tok".into())).unwrap();
        let user = client.current_user().await.unwrap();
        assert_eq!(user.id, "user-1");
        assert!(user.is_active);

        let requests = handle.await.unwrap();
        assert!(requests[0].starts_with("GET /api/v1/auth/me "));
        assert!(requests[0].to_ascii_lowercase().contains("authorization: bearer tok"));
    }

    #[tokio::test]
    async fn otp_flow() {
        let (url, handle) = mock_server(vec![
            MockResponse::json(
                200,
                r#"{"status":"sent","message":"OTP sent","reference_id":"ref-1"}"#,
            ),
            MockResponse::json(
                422,
                r#"{"detail":[{"msg":"Invalid OTP code"}]}"#,
            ),
            MockResponse::json(
                200,
                r#"{"access_token":"t","token_type":"bearer","user_id":"u","phone_number":"+91","roles":["contributor"]}"#,
            ),
        ])
        .await;

        let client = Client::new(&url, &Credentials::Anonymous).unwrap();
        let sent = client.send_signup_otp("+91").await.unwrap();
        assert_eq!(sent.reference_id, "ref-1");

        let req = VerifyOtpRequest {
            phone_number: "+91".into(),
            otp_code: "000000".into(),
            name: "Asha".into(),
            email: "asha@example.com".into(),
            password: "pw".into(),
            has_given_consent: true,
        };
        let err = client.verify_signup_otp(&req).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid OTP code");

        let verified = client.verify_signup_otp(&req).await.unwrap();
        assert_eq!(verified.roles, vec!["contributor".to_string()]);

        let requests = handle.await.unwrap();
        assert!(requests[0].starts_with("POST /api/v1/auth/signup/send-otp "));
        assert!(requests[1].starts_with("POST /api/v1/auth/signup/verify-otp "));
    }

    #[tokio::test]
    async fn resend_failure_uses_fallback() {
        let (url, handle) = mock_server(vec![MockResponse::json(500, "")]).await;

        let client = Client::new(&url, &Credentials::Anonymous).unwrap();
        let err = client.resend_signup_otp("+91").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to resend OTP");
        handle.abort();
    }
}
