/*!
 * Tests for error types
 */

use layerlingo::errors::{
    AppError, MutationError, ProviderError, TranslationError, UserInputError,
};
use layerlingo::scene::NodeId;

/// Test user-facing messages of user input errors
#[test]
fn test_userInputError_display_shouldMatchNotifications() {
    assert_eq!(
        UserInputError::MissingTargetLanguage.to_string(),
        "Please choose a valid target language"
    );
    assert_eq!(UserInputError::EmptySelection.to_string(), "No text selected");
}

/// Test provider error messages
#[test]
fn test_providerError_display_shouldIncludeDetails() {
    let error = ProviderError::ApiError {
        status_code: 456,
        message: "Quota exceeded".to_string(),
    };
    assert_eq!(error.to_string(), "API responded with error: 456 - Quota exceeded");
    assert_eq!(
        ProviderError::LengthMismatch { expected: 3, actual: 2 }.to_string(),
        "Provider returned 2 translations for 3 texts"
    );
}

/// Test wrapping into the pass level error
#[test]
fn test_translationError_from_shouldWrapSources() {
    let error: TranslationError = UserInputError::EmptySelection.into();
    assert_eq!(error.to_string(), "No text selected");

    let error: TranslationError = ProviderError::EmptyResponse.into();
    assert_eq!(error.to_string(), "Provider error: Provider returned no translations");
}

/// Test mutation error messages
#[test]
fn test_mutationError_display_shouldNameNodeAndFont() {
    assert_eq!(MutationError::NotATextNode(NodeId(3)).to_string(), "Node #3 is not a text node");
    let error = MutationError::FontNotLoaded {
        family: "Inter".to_string(),
        style: "Bold".to_string(),
    };
    assert_eq!(error.to_string(), "Font Inter Bold must be loaded before use");
}

/// Test conversions into the application error
#[test]
fn test_appError_from_shouldConvertSources() {
    let error: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(error, AppError::Unknown(ref message) if message == "boom"));

    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    assert!(matches!(AppError::from(io), AppError::File(_)));

    let error = AppError::from(TranslationError::from(UserInputError::EmptySelection));
    assert_eq!(error.to_string(), "Translation error: No text selected");

    let error = AppError::from(MutationError::Rejected("locked".to_string()));
    assert_eq!(error.to_string(), "Mutation error: Host rejected mutation: locked");
}
