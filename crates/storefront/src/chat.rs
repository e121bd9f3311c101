//! Chat deep links.
//!
//! A link opens the messaging app on the vendor's number with the order
//! message pre-filled: `https://wa.me/<digits>?text=<encoded message>`.

use menu_cart_core::order::encode_message;
use thiserror::Error;
use url::Url;

const CHAT_BASE: &str = "https://wa.me/";

/// Errors building a chat deep link.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatLinkError {
    /// The vendor's contact number has no digits to dial.
    #[error("vendor contact number is not dialable: {0:?}")]
    InvalidContact(String),

    /// The assembled link did not parse as a URL.
    #[error("invalid chat link: {0}")]
    InvalidUrl(String),
}

/// Build the deep link for sending `message` to `contact_number`.
///
/// Everything but ASCII digits is stripped from the number, so
/// `+55 (11) 99999-9999` becomes `5511999999999`.
///
/// # Errors
///
/// Returns [`ChatLinkError::InvalidContact`] if the number has no digits.
pub fn chat_link(contact_number: &str, message: &str) -> Result<Url, ChatLinkError> {
    let digits: String = contact_number
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        return Err(ChatLinkError::InvalidContact(contact_number.to_string()));
    }

    let link = format!("{CHAT_BASE}{digits}?text={}", encode_message(message));
    Url::parse(&link).map_err(|e| ChatLinkError::InvalidUrl(e.to_string()))
}
