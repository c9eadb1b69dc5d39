use rand::RngCore;

const TOKEN_BYTE_LENGTH: usize = 32;
// Shape check only; whether a token actually belongs to a subscriber is
// decided by the store lookup.
const MIN_CHAR_LENGTH: usize = 10;

#[derive(Debug, Clone, serde::Serialize)]
pub struct UnsubscribeToken(String);

impl UnsubscribeToken {
    pub fn parse(token: String) -> Result<UnsubscribeToken, String> {
        if token.len() < MIN_CHAR_LENGTH {
            return Err(format!("{} is not a valid unsubscribe token", token));
        }

        Ok(Self(token))
    }

    /// 32 bytes from the thread-local CSPRNG, hex-encoded. Assigned once per
    /// subscriber and never regenerated, so emailed links stay valid across
    /// unsubscribe/re-subscribe cycles.
    pub fn generate() -> UnsubscribeToken {
        let mut bytes = [0u8; TOKEN_BYTE_LENGTH];

        rand::thread_rng().fill_bytes(&mut bytes);

        Self(hex::encode(bytes))
    }
}

impl AsRef<str> for UnsubscribeToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
