use validator::validate_email;

#[derive(Debug, Clone, serde::Serialize)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    /// Trims surrounding whitespace and lowercases before validating, so the
    /// same mailbox always resolves to the same subscriber row.
    pub fn parse(email: String) -> Result<SubscriberEmail, String> {
        let normalized_email = email.trim().to_lowercase();

        if !validate_email(&normalized_email) {
            return Err(format!("{} email is not valid", email));
        }

        Ok(Self(normalized_email))
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
