//! Authentication payloads and the persisted session.

mod types;

pub use types::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, OAuthExchangeRequest, OtpRequest,
    RefreshRequest, RefreshResponse, ResetPasswordRequest, Session, SignupRequest,
    token_preview,
};
