use serde::Deserialize;

use super::{rules, FieldErrors, Validate};
use crate::error::ApiError;

/// Body of `POST /auth/token`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors
            .check("username", rules::check_length(&self.username, 1, 30))
            .check("password", rules::check_length(&self.password, 1, 72));
        errors.into_result()
    }
}

/// Body of `POST /auth/register`. Self-registration never grants admin.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ApiError> {
        check_profile(&self.username, &self.password, &self.first_name, &self.last_name, &self.email)
    }
}

/// Body of `POST /users`, admin only; may create other admins.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl Validate for NewUser {
    fn validate(&self) -> Result<(), ApiError> {
        check_profile(&self.username, &self.password, &self.first_name, &self.last_name, &self.email)
    }
}

impl From<RegisterRequest> for NewUser {
    fn from(request: RegisterRequest) -> Self {
        Self {
            username: request.username,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            is_admin: false,
        }
    }
}

fn check_profile(username: &str, password: &str, first_name: &str, last_name: &str, email: &str) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();
    errors
        .check("username", rules::check_length(username, 1, 30))
        .check("password", check_password(password))
        .check("firstName", rules::check_length(first_name, 1, 30))
        .check("lastName", rules::check_length(last_name, 1, 30))
        .check("email", rules::check_email(email));
    errors.into_result()
}

pub fn check_password(password: &str) -> Result<(), String> {
    rules::check_length(password, 5, 20)
}
