//! Unified error system for the guild gateway
//!
//! A single error enum covers every failure the gate, the partial update
//! applier and the adapters can report. Core components only ever return these
//! values; turning them into user-facing text is the adapters' job.

use crate::identifiers::{GuildId, MemberId};

/// Boxed cause carried by [`CascadeError::OperationFailed`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Unified error type for all gateway operations
#[derive(Debug, thiserror::Error)]
pub enum CascadeError {
    /// The guild does not exist (or no longer exists).
    #[error("guild {guild_id} not found")]
    TenantNotFound {
        /// Guild that failed to resolve
        guild_id: GuildId,
    },

    /// The caller has no current standing in the guild.
    #[error("member {member_id} is not authenticated in guild {guild_id}")]
    CallerNotAuthenticated {
        /// Guild the caller tried to act in
        guild_id: GuildId,
        /// The caller
        member_id: MemberId,
    },

    /// The caller lacks the capability an operation requires.
    #[error("missing permission `{permission}`")]
    PermissionDenied {
        /// Key of the missing permission
        permission: String,
    },

    /// The caller is not allowed to edit a resource owned by someone else.
    #[error("`{resource}` can only be edited by its owner ({owner})")]
    OwnershipDenied {
        /// Name of the owned resource
        resource: String,
        /// Current owner
        owner: MemberId,
    },

    /// The resource's owner has left the guild, so the resource was deleted.
    #[error("`{resource}` was owned by a member who left the guild and has been deleted")]
    OwnerGoneResourceDeleted {
        /// Name of the deleted resource
        resource: String,
        /// The owner that could no longer be resolved
        owner: MemberId,
    },

    /// A partial update named a setting that may not be set directly.
    #[error("setting `{field}` is not directly editable")]
    FieldNotEditable {
        /// Name of the setting
        field: String,
    },

    /// A partial update supplied a value of the wrong shape.
    #[error("setting `{field}` expects {expected}, got {actual}")]
    TypeMismatch {
        /// Name of the setting
        field: String,
        /// Declared kind of the setting
        expected: String,
        /// Description of the supplied value
        actual: String,
    },

    /// A command prefix failed character validation.
    #[error("invalid prefix: {reason}")]
    InvalidPrefix {
        /// Which rule was violated
        reason: String,
    },

    /// Malformed arguments to a command or API operation.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Error message describing the argument problem
        message: String,
    },

    /// A named guild resource does not exist.
    #[error("{kind} `{name}` not found")]
    NotFound {
        /// Kind of resource ("todo list", "tag", ...)
        kind: String,
        /// Name that was looked up
        name: String,
    },

    /// No command is registered under the resolved name.
    #[error("unknown command `{name}`")]
    UnknownCommand {
        /// The resolved command name
        name: String,
    },

    /// A bounded wait expired.
    #[error("timed out after {elapsed_ms} ms while {during}")]
    Timeout {
        /// What the gate was waiting for
        during: String,
        /// Configured bound in milliseconds
        elapsed_ms: u64,
    },

    /// Invalid configuration.
    #[error("configuration error: {message}")]
    Config {
        /// Error message describing the configuration problem
        message: String,
    },

    /// An operation with its own internal logic (storage, codec, ...) failed.
    #[error("operation failed: {cause}")]
    OperationFailed {
        /// The underlying failure, untouched
        #[source]
        cause: BoxError,
    },
}

impl CascadeError {
    /// Create a tenant not found error
    pub fn tenant_not_found(guild_id: GuildId) -> Self {
        Self::TenantNotFound { guild_id }
    }

    /// Create a caller not authenticated error
    pub fn caller_not_authenticated(guild_id: GuildId, member_id: MemberId) -> Self {
        Self::CallerNotAuthenticated {
            guild_id,
            member_id,
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(permission: impl Into<String>) -> Self {
        Self::PermissionDenied {
            permission: permission.into(),
        }
    }

    /// Create an ownership denied error
    pub fn ownership_denied(resource: impl Into<String>, owner: MemberId) -> Self {
        Self::OwnershipDenied {
            resource: resource.into(),
            owner,
        }
    }

    /// Create the error reported after an orphaned resource was deleted
    pub fn owner_gone(resource: impl Into<String>, owner: MemberId) -> Self {
        Self::OwnerGoneResourceDeleted {
            resource: resource.into(),
            owner,
        }
    }

    /// Create a field not editable error
    pub fn field_not_editable(field: impl Into<String>) -> Self {
        Self::FieldNotEditable {
            field: field.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an invalid prefix error
    pub fn invalid_prefix(reason: impl Into<String>) -> Self {
        Self::InvalidPrefix {
            reason: reason.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create an unknown command error
    pub fn unknown_command(name: impl Into<String>) -> Self {
        Self::UnknownCommand { name: name.into() }
    }

    /// Create a timeout error
    pub fn timeout(during: impl Into<String>, elapsed_ms: u64) -> Self {
        Self::Timeout {
            during: during.into(),
            elapsed_ms,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Wrap an arbitrary failure without altering it
    pub fn operation_failed(cause: impl Into<BoxError>) -> Self {
        Self::OperationFailed {
            cause: cause.into(),
        }
    }

    /// Whether the error stems from what the caller asked for rather than
    /// from the system failing.
    pub fn is_user_error(&self) -> bool {
        !matches!(
            self,
            Self::OperationFailed { .. } | Self::Timeout { .. } | Self::Config { .. }
        )
    }
}

/// Standard Result type for gateway operations
pub type Result<T> = std::result::Result<T, CascadeError>;
