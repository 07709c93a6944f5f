//! Contact form inquiries.

/// Minimum message length, in characters.
pub const MIN_MESSAGE_CHARS: usize = 10;
/// Maximum message length, in characters.
pub const MAX_MESSAGE_CHARS: usize = 5000;

/// Validation failures for contact inquiries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactValidationError {
    /// Name was blank.
    #[error("Name is required.")]
    BlankName,
    /// Email address is not plausible.
    #[error("A valid email address is required.")]
    InvalidEmail,
    /// Message outside the accepted length.
    #[error("Message must be between {min} and {max} characters.")]
    MessageLength {
        /// Minimum accepted length.
        min: usize,
        /// Maximum accepted length.
        max: usize,
    },
}

/// Validated inquiry from the public contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactInquiry {
    name: String,
    email: String,
    message: String,
}

impl ContactInquiry {
    /// Validate the form fields.
    ///
    /// # Examples
    /// ```
    /// use eventtara::domain::ContactInquiry;
    ///
    /// let inquiry = ContactInquiry::new("Jo", "jo@example.ph", "Do you run night hikes?").unwrap();
    /// assert_eq!(inquiry.email(), "jo@example.ph");
    /// assert!(ContactInquiry::new("Jo", "jo@", "Do you run night hikes?").is_err());
    /// ```
    pub fn new(name: &str, email: &str, message: &str) -> Result<Self, ContactValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ContactValidationError::BlankName);
        }
        let email = email.trim();
        if !is_plausible_email(email) {
            return Err(ContactValidationError::InvalidEmail);
        }
        let message = message.trim();
        let length = message.chars().count();
        if !(MIN_MESSAGE_CHARS..=MAX_MESSAGE_CHARS).contains(&length) {
            return Err(ContactValidationError::MessageLength {
                min: MIN_MESSAGE_CHARS,
                max: MAX_MESSAGE_CHARS,
            });
        }
        Ok(Self {
            name: name.to_owned(),
            email: email.to_owned(),
            message: message.to_owned(),
        })
    }

    /// Sender name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Sender address, used as the reply-to.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Message body.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "jo@example.ph", "long enough message", ContactValidationError::BlankName)]
    #[case("Jo", "example.ph", "long enough message", ContactValidationError::InvalidEmail)]
    #[case("Jo", "@example.ph", "long enough message", ContactValidationError::InvalidEmail)]
    #[case("Jo", "jo@", "long enough message", ContactValidationError::InvalidEmail)]
    #[case("Jo", "jo@a@b", "long enough message", ContactValidationError::InvalidEmail)]
    #[case("Jo", "jo @example.ph", "long enough message", ContactValidationError::InvalidEmail)]
    #[case("Jo", "jo@example.ph", "too short", ContactValidationError::MessageLength { min: 10, max: 5000 })]
    fn rejects_invalid_fields(
        #[case] name: &str,
        #[case] email: &str,
        #[case] message: &str,
        #[case] expected: ContactValidationError,
    ) {
        assert_eq!(ContactInquiry::new(name, email, message), Err(expected));
    }

    #[rstest]
    fn rejects_overlong_messages() {
        let message = "a".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(ContactInquiry::new("Jo", "jo@example.ph", &message).is_err());
    }

    #[rstest]
    fn trims_fields() {
        let inquiry = ContactInquiry::new(" Jo ", " jo@example.ph ", "  Ten chars!  ")
            .expect("valid inquiry");
        assert_eq!(inquiry.name(), "Jo");
        assert_eq!(inquiry.message(), "Ten chars!");
    }
}
