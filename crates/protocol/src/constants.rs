use std::time::Duration;

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Timeout for JSON requests and the finalize call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for a single chunk upload.
///
/// Chunk requests carry up to a full chunk of binary data and the server
/// writes it to storage before acknowledging, so they get a longer budget.
pub const CHUNK_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP endpoints exposed by the corpus API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    // Records
    UploadChunk,
    UploadRecord,

    // Auth
    Login,
    CurrentUser,
    SendSignupOtp,
    VerifySignupOtp,
    ResendSignupOtp,
}

impl Endpoint {
    /// Path relative to the API base URL.
    pub const fn path(self) -> &'static str {
        match self {
            Self::UploadChunk => "/api/v1/records/upload/chunk",
            Self::UploadRecord => "/api/v1/records/upload",
            Self::Login => "/api/v1/auth/login",
            Self::CurrentUser => "/api/v1/auth/me",
            Self::SendSignupOtp => "/api/v1/auth/signup/send-otp",
            Self::VerifySignupOtp => "/api/v1/auth/signup/verify-otp",
            Self::ResendSignupOtp => "/api/v1/auth/signup/resend-otp",
        }
    }

    /// Message surfaced when a failed response carries no usable detail.
    pub const fn fallback_error(self) -> &'static str {
        match self {
            Self::UploadChunk => "Failed to upload chunk",
            Self::UploadRecord => "Failed to upload record",
            Self::Login => "Login failed",
            Self::CurrentUser => "Failed to get user info",
            Self::SendSignupOtp => "Failed to send OTP",
            Self::VerifySignupOtp => "Failed to verify OTP",
            Self::ResendSignupOtp => "Failed to resend OTP",
        }
    }
}
