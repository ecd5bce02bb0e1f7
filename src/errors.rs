/*!
 * Error types for the layerlingo library.
 *
 * The taxonomy follows the three places a translation pass can go wrong:
 * - `UserInputError`: nothing sensible was asked for (no target, no text)
 * - `ProviderError`: the remote translation call failed or answered badly
 * - `MutationError`: the host rejected a font load or a node mutation
 *
 * All of them use the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

use crate::scene::NodeId;

/// Errors that can occur when talking to the translation provider
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Raw error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The provider answered with no translations at all
    #[error("Provider returned no translations")]
    EmptyResponse,

    /// The provider answered with a different number of translations than requested
    #[error("Provider returned {actual} translations for {expected} texts")]
    LengthMismatch {
        /// Number of texts sent
        expected: usize,
        /// Number of translations received
        actual: usize,
    },
}

impl ProviderError {
    /// Whether a bounded retry may help with this error.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError(_) | Self::RateLimitExceeded(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}

/// Errors caused by the request itself rather than the provider or host
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UserInputError {
    /// No target language chosen, or the "auto" sentinel was passed
    #[error("Please choose a valid target language")]
    MissingTargetLanguage,

    /// The selection holds no text nodes
    #[error("No text selected")]
    EmptySelection,
}

/// Errors raised by the host while loading fonts or mutating a node
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    /// The host could not load a font
    #[error("Failed to load font {family} {style}: {reason}")]
    FontLoad {
        /// Font family
        family: String,
        /// Font style
        style: String,
        /// Host supplied reason
        reason: String,
    },

    /// A font was used before it was loaded
    #[error("Font {family} {style} must be loaded before use")]
    FontNotLoaded {
        /// Font family
        family: String,
        /// Font style
        style: String,
    },

    /// The handle does not name a live node
    #[error("Node {0} does not exist")]
    NodeNotFound(NodeId),

    /// A text operation was attempted on a non-text node
    #[error("Node {0} is not a text node")]
    NotATextNode(NodeId),

    /// A character range outside the node's text
    #[error("Invalid character range {start}..{end} for text of length {len}")]
    InvalidRange {
        /// Range start
        start: usize,
        /// Range end
        end: usize,
        /// Length of the node's text
        len: usize,
    },

    /// Any other rejection from the host
    #[error("Host rejected mutation: {0}")]
    Rejected(String),
}

/// Errors that abort a translation pass
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    /// The request could not be served
    #[error("{0}")]
    UserInput(#[from] UserInputError),

    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from a translation pass
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from the host while mutating the scene
    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
