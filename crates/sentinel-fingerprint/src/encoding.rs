//! Text encodings for digest output.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use sentinel_core::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Lowercase hexadecimal.
    Hex,
    /// RFC 4648 standard alphabet, padded.
    Base32,
    /// RFC 4648 standard alphabet, padded.
    Base64,
}

impl Encoding {
    pub const ALL: [Encoding; 3] = [Self::Hex, Self::Base32, Self::Base64];

    pub fn name(self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Base32 => "base32",
            Self::Base64 => "base64",
        }
    }

    pub fn encode(self, bytes: &[u8]) -> String {
        match self {
            Self::Hex => hex::encode(bytes),
            Self::Base32 => data_encoding::BASE32.encode(bytes),
            Self::Base64 => base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|enc| enc.name() == name)
            .ok_or(ConfigError::UnknownEncoding(name))
    }
}
