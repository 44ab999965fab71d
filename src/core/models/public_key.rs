use serde::Serialize;

/// A public key as reported by one `gpg --list-keys --with-colons` call.
///
/// Only the key-listing parser builds these. Dates are kept exactly as
/// gpg printed them (usually epoch seconds, empty when unset).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicKey {
    pub key_id: String,
    pub fingerprint: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub creation_date: String,
    pub expiration_date: String,
    pub encrypt: bool,
    pub sign: bool,
}

impl PublicKey {
    /// A record with only the `pub` line fields filled in.
    pub fn new(
        key_id: impl Into<String>,
        creation_date: impl Into<String>,
        expiration_date: impl Into<String>,
        encrypt: bool,
        sign: bool,
    ) -> Self {
        Self {
            key_id: key_id.into(),
            fingerprint: None,
            name: None,
            email: None,
            creation_date: creation_date.into(),
            expiration_date: expiration_date.into(),
            encrypt,
            sign,
        }
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.email {
            Some(email) => write!(f, "<{email}> ({})", self.key_id)?,
            None => write!(f, "({})", self.key_id)?,
        }
        if let Some(name) = &self.name {
            write!(f, " {name}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_uid() {
        let mut key = PublicKey::new("ABCD1234", "1600000000", "", true, true);
        key.name = Some("Jane Doe".into());
        key.email = Some("jane@example.com".into());
        assert_eq!(key.to_string(), "<jane@example.com> (ABCD1234) Jane Doe");
    }

    #[test]
    fn display_without_uid() {
        let key = PublicKey::new("ABCD1234", "", "", false, false);
        assert_eq!(key.to_string(), "(ABCD1234)");
    }
}
