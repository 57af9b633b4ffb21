use chrono::{DateTime, Utc};
use thiserror::Error;
use url::Url;

use crate::model::ids::UserId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UserError {
    #[error("first name cannot be empty")]
    EmptyFirstName,

    #[error("last name cannot be empty")]
    EmptyLastName,

    #[error("email address is not valid: {0}")]
    InvalidEmail(String),
}

//
// ─── ROLE ──────────────────────────────────────────────────────────────────────
//

/// Platform role of a user.
///
/// Roles gate which screens a client renders. They are a UI-level check
/// only; nothing in this crate enforces authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Full administrative access, including user management.
    Admin,
    /// Authors courses and assessments.
    Teacher,
    /// Enrolls in courses and takes assessments.
    Student,
}

impl Role {
    /// Returns true when this role is one of `required`.
    ///
    /// Mirrors the front end's permission helper: a screen declares the
    /// roles it accepts and checks membership, nothing more.
    #[must_use]
    pub fn permits(self, required: &[Role]) -> bool {
        required.contains(&self)
    }
}

/// Account status flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Inactive,
}

//
// ─── USER ──────────────────────────────────────────────────────────────────────
//

/// A platform user: administrator, teacher, or student.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    first_name: String,
    last_name: String,
    email: String,
    role: Role,
    status: UserStatus,
    registered_at: DateTime<Utc>,
    avatar: Option<Url>,
}

impl User {
    /// Creates a new user record.
    ///
    /// # Errors
    ///
    /// Returns `UserError` if a name is empty or the email has no `@`.
    pub fn new(
        id: UserId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        registered_at: DateTime<Utc>,
    ) -> Result<Self, UserError> {
        let first_name = first_name.into().trim().to_owned();
        if first_name.is_empty() {
            return Err(UserError::EmptyFirstName);
        }
        let last_name = last_name.into().trim().to_owned();
        if last_name.is_empty() {
            return Err(UserError::EmptyLastName);
        }
        let email = email.into().trim().to_owned();
        if !email.contains('@') {
            return Err(UserError::InvalidEmail(email));
        }

        Ok(Self {
            id,
            first_name,
            last_name,
            email,
            role,
            status: UserStatus::Active,
            registered_at,
            avatar: None,
        })
    }

    /// Attach an avatar image source.
    #[must_use]
    pub fn with_avatar(mut self, avatar: Url) -> Self {
        self.avatar = Some(avatar);
        self
    }

    /// Override the account status.
    #[must_use]
    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// First and last name joined for display.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn status(&self) -> UserStatus {
        self.status
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    #[must_use]
    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    #[must_use]
    pub fn avatar(&self) -> Option<&Url> {
        self.avatar.as_ref()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
