//! Supported digest algorithms and the resettable accumulator they produce.

use std::fmt;
use std::str::FromStr;

use digest::Digest;
use sentinel_core::ConfigError;

/// Digest algorithms a fingerprint can be computed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha512_224,
    Sha512_256,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 12] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Sha512_224,
        Self::Sha512_256,
        Self::Sha3_224,
        Self::Sha3_256,
        Self::Sha3_384,
        Self::Sha3_512,
    ];

    /// Canonical lowercase name, as accepted in configuration.
    pub fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Sha512_224 => "sha512_224",
            Self::Sha512_256 => "sha512_256",
            Self::Sha3_224 => "sha3_224",
            Self::Sha3_256 => "sha3_256",
            Self::Sha3_384 => "sha3_384",
            Self::Sha3_512 => "sha3_512",
        }
    }

    /// Digest length in bytes.
    pub fn output_size(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha224 | Self::Sha512_224 | Self::Sha3_224 => 28,
            Self::Sha256 | Self::Sha512_256 | Self::Sha3_256 => 32,
            Self::Sha384 | Self::Sha3_384 => 48,
            Self::Sha512 | Self::Sha3_512 => 64,
        }
    }

    /// Create a fresh accumulator for this algorithm.
    pub fn accumulator(self) -> Accumulator {
        match self {
            Self::Md5 => Accumulator::Md5(md5::Md5::new()),
            Self::Sha1 => Accumulator::Sha1(sha1::Sha1::new()),
            Self::Sha224 => Accumulator::Sha224(sha2::Sha224::new()),
            Self::Sha256 => Accumulator::Sha256(sha2::Sha256::new()),
            Self::Sha384 => Accumulator::Sha384(sha2::Sha384::new()),
            Self::Sha512 => Accumulator::Sha512(sha2::Sha512::new()),
            Self::Sha512_224 => Accumulator::Sha512_224(sha2::Sha512_224::new()),
            Self::Sha512_256 => Accumulator::Sha512_256(sha2::Sha512_256::new()),
            Self::Sha3_224 => Accumulator::Sha3_224(sha3::Sha3_224::new()),
            Self::Sha3_256 => Accumulator::Sha3_256(sha3::Sha3_256::new()),
            Self::Sha3_384 => Accumulator::Sha3_384(sha3::Sha3_384::new()),
            Self::Sha3_512 => Accumulator::Sha3_512(sha3::Sha3_512::new()),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|alg| alg.name() == name)
            .ok_or(ConfigError::UnknownHash(name))
    }
}

/// In-progress digest state.
///
/// One accumulator is owned by each processor and cycled through
/// `reset` / `update` / `finalize_reset` for every event.
#[derive(Clone)]
pub enum Accumulator {
    Md5(md5::Md5),
    Sha1(sha1::Sha1),
    Sha224(sha2::Sha224),
    Sha256(sha2::Sha256),
    Sha384(sha2::Sha384),
    Sha512(sha2::Sha512),
    Sha512_224(sha2::Sha512_224),
    Sha512_256(sha2::Sha512_256),
    Sha3_224(sha3::Sha3_224),
    Sha3_256(sha3::Sha3_256),
    Sha3_384(sha3::Sha3_384),
    Sha3_512(sha3::Sha3_512),
}

macro_rules! dispatch {
    ($acc:expr, $state:ident => $body:expr) => {
        match $acc {
            Accumulator::Md5($state) => $body,
            Accumulator::Sha1($state) => $body,
            Accumulator::Sha224($state) => $body,
            Accumulator::Sha256($state) => $body,
            Accumulator::Sha384($state) => $body,
            Accumulator::Sha512($state) => $body,
            Accumulator::Sha512_224($state) => $body,
            Accumulator::Sha512_256($state) => $body,
            Accumulator::Sha3_224($state) => $body,
            Accumulator::Sha3_256($state) => $body,
            Accumulator::Sha3_384($state) => $body,
            Accumulator::Sha3_512($state) => $body,
        }
    };
}

impl Accumulator {
    pub fn algorithm(&self) -> HashAlgorithm {
        match self {
            Self::Md5(_) => HashAlgorithm::Md5,
            Self::Sha1(_) => HashAlgorithm::Sha1,
            Self::Sha224(_) => HashAlgorithm::Sha224,
            Self::Sha256(_) => HashAlgorithm::Sha256,
            Self::Sha384(_) => HashAlgorithm::Sha384,
            Self::Sha512(_) => HashAlgorithm::Sha512,
            Self::Sha512_224(_) => HashAlgorithm::Sha512_224,
            Self::Sha512_256(_) => HashAlgorithm::Sha512_256,
            Self::Sha3_224(_) => HashAlgorithm::Sha3_224,
            Self::Sha3_256(_) => HashAlgorithm::Sha3_256,
            Self::Sha3_384(_) => HashAlgorithm::Sha3_384,
            Self::Sha3_512(_) => HashAlgorithm::Sha3_512,
        }
    }

    /// Discard any buffered input.
    pub fn reset(&mut self) {
        dispatch!(self, state => Digest::reset(state))
    }

    pub fn update(&mut self, data: &[u8]) {
        dispatch!(self, state => Digest::update(state, data))
    }

    /// Produce the digest of everything fed since the last reset and
    /// leave the accumulator empty.
    pub fn finalize_reset(&mut self) -> Vec<u8> {
        dispatch!(self, state => Digest::finalize_reset(state).to_vec())
    }
}

impl fmt::Write for Accumulator {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.update(s.as_bytes());
        Ok(())
    }
}

impl fmt::Debug for Accumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Accumulator").field(&self.algorithm()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("SHA256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("Sha3_512".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha3_512);
        assert_eq!("md5".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Md5);
    }

    #[test]
    fn every_name_round_trips() {
        for alg in HashAlgorithm::ALL {
            assert_eq!(alg.name().parse::<HashAlgorithm>().unwrap(), alg);
            assert_eq!(alg.to_string(), alg.name());
        }
    }

    #[test]
    fn unknown_name_rejected() {
        let err = "Whirlpool".parse::<HashAlgorithm>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownHash(ref name) if name == "whirlpool"));
        assert_eq!(err.to_string(), "Invalid hash type 'whirlpool'");

        assert!("sha-256".parse::<HashAlgorithm>().is_err());
        assert!("".parse::<HashAlgorithm>().is_err());
    }

    #[test]
    fn output_sizes_match_digests() {
        for alg in HashAlgorithm::ALL {
            let mut acc = alg.accumulator();
            assert_eq!(acc.algorithm(), alg);
            assert_eq!(acc.finalize_reset().len(), alg.output_size(), "{alg}");
        }
    }

    #[test]
    fn reset_discards_input() {
        let mut acc = HashAlgorithm::Md5.accumulator();
        acc.update(b"leftover");
        acc.reset();
        assert_eq!(hex::encode(acc.finalize_reset()), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn finalize_leaves_clean_state() {
        let mut acc = HashAlgorithm::Sha1.accumulator();
        acc.update(b"ab");
        let first = acc.finalize_reset();
        acc.update(b"ab");
        let second = acc.finalize_reset();
        assert_eq!(first, second);
        assert_eq!(hex::encode(first), "da23614e02469a0d7c7bd1bdab5c9c474b1904dc");
    }

    #[test]
    fn incremental_writes_match_single_update() {
        use std::fmt::Write;

        let mut acc = HashAlgorithm::Sha1.accumulator();
        acc.write_str("a").unwrap();
        acc.write_str("b").unwrap();
        assert_eq!(hex::encode(acc.finalize_reset()), "da23614e02469a0d7c7bd1bdab5c9c474b1904dc");
    }
}
