use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const PASSWORD_MIN_LEN: usize = 6;

/// A single failed validation rule, reported back to the client.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"))
}

pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value)
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

fn require(
    value: Option<String>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v),
        _ => {
            errors.push(FieldError::new(field, "is required"));
            None
        }
    }
}

fn require_email(value: Option<String>, errors: &mut Vec<FieldError>) -> Option<String> {
    let email = require(value, "email", errors)?;
    if is_valid_email(&email) {
        Some(email)
    } else {
        errors.push(FieldError::new("email", "must be a valid email address"));
        None
    }
}

fn require_password(value: Option<String>, errors: &mut Vec<FieldError>) -> Option<String> {
    let password = require(value, "password", errors)?;
    if password.len() >= PASSWORD_MIN_LEN {
        Some(password)
    } else {
        errors.push(FieldError::new(
            "password",
            format!("must be at least {PASSWORD_MIN_LEN} characters"),
        ));
        None
    }
}

fn check_avatar(value: &Option<String>, errors: &mut Vec<FieldError>) {
    if let Some(avatar) = value {
        if !is_http_url(avatar) {
            errors.push(FieldError::new("avatar", "must be a valid URL"));
        }
    }
}

// ── User creation ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub username: String,
    pub password: String,
    pub avatar: Option<String>,
}

pub fn validate_create_user(req: CreateUserRequest) -> Result<CreateUser, Vec<FieldError>> {
    let mut errors = Vec::new();

    let email = require_email(req.email, &mut errors);
    let username = require(req.username, "username", &mut errors);
    let password = require_password(req.password, &mut errors);
    check_avatar(&req.avatar, &mut errors);

    match (email, username, password) {
        (Some(email), Some(username), Some(password)) if errors.is_empty() => Ok(CreateUser {
            email,
            username,
            password,
            avatar: req.avatar,
        }),
        _ => Err(errors),
    }
}

// ── User update ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug)]
pub struct UpdateUser {
    pub email: String,
    pub password: String,
    pub avatar: Option<String>,
}

pub fn validate_update_user(req: UpdateUserRequest) -> Result<UpdateUser, Vec<FieldError>> {
    let mut errors = Vec::new();

    let email = require_email(req.email, &mut errors);
    let password = require_password(req.password, &mut errors);
    check_avatar(&req.avatar, &mut errors);

    match (email, password) {
        (Some(email), Some(password)) if errors.is_empty() => Ok(UpdateUser {
            email,
            password,
            avatar: req.avatar,
        }),
        _ => Err(errors),
    }
}

// ── Password reset ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
    #[serde(rename = "resetPasswordUrl")]
    pub reset_password_url: Option<String>,
}

#[derive(Debug)]
pub struct ForgotPassword {
    pub email: String,
    /// Landing page the reset link points at. An opaque string; its shape
    /// is the caller's business.
    pub reset_password_url: String,
}

pub fn validate_forgot_password(
    req: ForgotPasswordRequest,
) -> Result<ForgotPassword, Vec<FieldError>> {
    let mut errors = Vec::new();

    let email = require_email(req.email, &mut errors);
    let reset_password_url = require(req.reset_password_url, "resetPasswordUrl", &mut errors);

    match (email, reset_password_url) {
        (Some(email), Some(reset_password_url)) if errors.is_empty() => Ok(ForgotPassword {
            email,
            reset_password_url,
        }),
        _ => Err(errors),
    }
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

#[derive(Debug)]
pub struct ResetPassword {
    pub token: String,
    pub password: String,
}

pub fn validate_reset_password(
    req: ResetPasswordRequest,
) -> Result<ResetPassword, Vec<FieldError>> {
    let mut errors = Vec::new();

    let token = require(req.token, "token", &mut errors);
    let password = require_password(req.password, &mut errors);
    let confirmation = require(req.password_confirmation, "password_confirmation", &mut errors);

    if let (Some(password), Some(confirmation)) = (&password, &confirmation) {
        if password != confirmation {
            errors.push(FieldError::new(
                "password_confirmation",
                "does not match password",
            ));
        }
    }

    match (token, password) {
        (Some(token), Some(password)) if errors.is_empty() => Ok(ResetPassword { token, password }),
        _ => Err(errors),
    }
}

// ── Session login ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct Login {
    pub email: String,
    pub password: String,
}

pub fn validate_login(req: LoginRequest) -> Result<Login, Vec<FieldError>> {
    let mut errors = Vec::new();

    let email = require(req.email, "email", &mut errors);
    let password = require(req.password, "password", &mut errors);

    match (email, password) {
        (Some(email), Some(password)) if errors.is_empty() => Ok(Login { email, password }),
        _ => Err(errors),
    }
}
