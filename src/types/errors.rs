use std::fmt;

// === ValidationError ===

/// Input rejected before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Group name is empty or whitespace only.
    EmptyGroupName,
    /// Bookmark title is empty.
    EmptyTitle,
    /// Bookmark URL is empty.
    EmptyUrl,
    /// The referenced group is not in the current listing.
    UnknownGroup(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyGroupName => write!(f, "Group name must not be empty"),
            ValidationError::EmptyTitle => write!(f, "Bookmark title must not be empty"),
            ValidationError::EmptyUrl => write!(f, "Bookmark URL must not be empty"),
            ValidationError::UnknownGroup(id) => write!(f, "Unknown group: {}", id),
        }
    }
}

impl std::error::Error for ValidationError {}

// === ReorderError ===

/// A drag gesture that does not fit the current listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    /// A source or destination group ID is not in the listing.
    UnknownGroup(String),
    /// The source index is past the end of its container.
    SourceOutOfRange { index: usize, len: usize },
}

impl fmt::Display for ReorderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReorderError::UnknownGroup(id) => write!(f, "Reorder references unknown group: {}", id),
            ReorderError::SourceOutOfRange { index, len } => {
                write!(f, "Reorder source index {} out of range (len {})", index, len)
            }
        }
    }
}

impl std::error::Error for ReorderError {}

// === StoreError ===

/// Errors from the listing store and the remote store behind it.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Network or transport failure.
    Fetch(String),
    /// The remote store answered with a non-success status.
    Status { status: u16, body: String },
    /// The response body did not match the expected shape.
    MalformedResponse(String),
    /// Input rejected locally.
    Validation(ValidationError),
    /// The drag gesture could not be applied.
    Reorder(ReorderError),
    /// The store was closed while the operation was pending.
    Cancelled,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Fetch(msg) => write!(f, "Fetch failed: {}", msg),
            StoreError::Status { status, body } => {
                write!(f, "Remote store returned {}: {}", status, body)
            }
            StoreError::MalformedResponse(msg) => write!(f, "Malformed response: {}", msg),
            StoreError::Validation(err) => write!(f, "Validation failed: {}", err),
            StoreError::Reorder(err) => write!(f, "Reorder failed: {}", err),
            StoreError::Cancelled => write!(f, "Operation cancelled"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Validation(err) => Some(err),
            StoreError::Reorder(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Validation(err)
    }
}

impl From<ReorderError> for StoreError {
    fn from(err: ReorderError) -> Self {
        StoreError::Reorder(err)
    }
}

impl StoreError {
    /// True for failures a user can reasonably retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Fetch(_) => true,
            StoreError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
