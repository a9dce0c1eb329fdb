//! User-facing messages for identity-provider failures.

use crate::providers::ProviderErrorCode;

/// Shown for [`ProviderErrorCode::InvalidCredentials`]
pub const INVALID_CREDENTIALS: &str = "Invalid email or password.";
/// Shown for [`ProviderErrorCode::EmailNotFound`]
pub const EMAIL_NOT_FOUND: &str = "This email does not exist.";
/// Shown for [`ProviderErrorCode::AccountExists`]
pub const ACCOUNT_EXISTS: &str = "This email exists already.";
/// Shown for [`ProviderErrorCode::WeakSecret`]
pub const WEAK_SECRET: &str = "Password should be at least 6 characters.";
/// Shown for [`ProviderErrorCode::Unreachable`]
pub const UNREACHABLE: &str = "Unable to reach the authentication service.";
/// Shown for anything unrecognised
pub const GENERIC_FAILURE: &str = "Authentication failed.";

/// The message to surface for a provider failure.
#[must_use]
pub const fn message_for(code: &ProviderErrorCode) -> &'static str {
    match code {
        ProviderErrorCode::InvalidCredentials => INVALID_CREDENTIALS,
        ProviderErrorCode::EmailNotFound => EMAIL_NOT_FOUND,
        ProviderErrorCode::AccountExists => ACCOUNT_EXISTS,
        ProviderErrorCode::WeakSecret => WEAK_SECRET,
        ProviderErrorCode::Unreachable => UNREACHABLE,
        ProviderErrorCode::Unknown(_) => GENERIC_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_codes_get_the_generic_message() {
        assert_eq!(
            message_for(&ProviderErrorCode::Unknown("QUOTA_EXCEEDED".into())),
            GENERIC_FAILURE
        );
    }

    #[test]
    fn invalid_credentials_message() {
        assert_eq!(
            message_for(&ProviderErrorCode::InvalidCredentials),
            "Invalid email or password."
        );
    }
}
