// Domain error taxonomy
// Every fallible store operation returns one of these as a typed result

/// Errors returned by user, group and attempt operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MasteryError {
    /// A required field was missing or malformed.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Signup collided with an existing username or email.
    #[error("Username or email already exists")]
    Duplicate,

    /// No user matched the identifier/password pair.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// A user or group id did not resolve.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The user is already listed in the group's members.
    #[error("Already a member of group {group_id}")]
    AlreadyMember { group_id: String },

    /// The operation needs a signed-in user.
    #[error("You need to sign in first")]
    NotSignedIn,

    /// The password hasher rejected its input.
    #[error("Failed to hash password: {0}")]
    PasswordHash(String),
}

impl MasteryError {
    pub fn missing(field: &str) -> Self {
        MasteryError::Validation(format!("{} is required", field))
    }

    pub fn user_not_found(id: &str) -> Self {
        MasteryError::NotFound {
            kind: "User",
            id: id.to_string(),
        }
    }

    pub fn group_not_found(id: &str) -> Self {
        MasteryError::NotFound {
            kind: "Group",
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MasteryError>;
