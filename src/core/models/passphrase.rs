use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

/// A saved passphrase for one key owner, read from the config file.
#[derive(Debug, Deserialize)]
pub struct PassphraseEntry {
    pub email: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_secret")]
    pub passphrase: SecretString,
}

impl PassphraseEntry {
    /// Label shown when listing saved entries, e.g. `<jane@example.com> (work)`.
    pub fn label(&self) -> String {
        match &self.description {
            Some(desc) => format!("<{}> ({desc})", self.email),
            None => format!("<{}>", self.email),
        }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(SecretString::from(raw))
}
