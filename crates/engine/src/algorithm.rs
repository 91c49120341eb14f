//! Algorithm selector shared by the engine and every session.

use std::fmt;
use std::str::FromStr;

/// Size in bytes of one engine block for every supported algorithm.
pub const BLOCK_SIZE: usize = 64;

/// Widest state vector of any supported algorithm, in 32-bit words.
pub const MAX_STATE_WORDS: usize = 8;

/// Longest digest of any supported algorithm, in bytes.
pub const MAX_DIGEST_LEN: usize = 32;

const MD5_IV: [u32; 4] = [0x6745_2301, 0xefcd_ab89, 0x98ba_dcfe, 0x1032_5476];

const SHA1_IV: [u32; 5] = [
    0x6745_2301,
    0xefcd_ab89,
    0x98ba_dcfe,
    0x1032_5476,
    0xc3d2_e1f0,
];

const SHA224_IV: [u32; 8] = [
    0xc105_9ed8,
    0x367c_d507,
    0x3070_dd17,
    0xf70e_5939,
    0xffc0_0b31,
    0x6858_1511,
    0x64f9_8fa7,
    0xbefa_4fa4,
];

const SHA256_IV: [u32; 8] = [
    0x6a09_e667,
    0xbb67_ae85,
    0x3c6e_f372,
    0xa54f_f53a,
    0x510e_527f,
    0x9b05_688c,
    0x1f83_d9ab,
    0x5be0_cd19,
];

/// Byte order used when serialising state words and the length trailer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordOrder {
    /// MD5 convention.
    Little,
    /// SHA family convention.
    Big,
}

impl WordOrder {
    /// Encodes one state word.
    #[must_use]
    pub const fn word_bytes(self, word: u32) -> [u8; 4] {
        match self {
            Self::Little => word.to_le_bytes(),
            Self::Big => word.to_be_bytes(),
        }
    }

    /// Decodes one message word from a 4-byte chunk.
    #[must_use]
    pub const fn read_word(self, bytes: [u8; 4]) -> u32 {
        match self {
            Self::Little => u32::from_le_bytes(bytes),
            Self::Big => u32::from_be_bytes(bytes),
        }
    }

    /// Encodes the 64-bit message length trailer.
    #[must_use]
    pub const fn length_bytes(self, bits: u64) -> [u8; 8] {
        match self {
            Self::Little => bits.to_le_bytes(),
            Self::Big => bits.to_be_bytes(),
        }
    }
}

/// Closed selector naming the hash variant an engine run uses.
///
/// The selector fixes the block size, state width, digest length and byte
/// order for the whole lifetime of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Algorithm {
    /// MD5 (RFC 1321): 4 state words, 16-byte digest.
    Md5,
    /// SHA-1 (FIPS 180-4): 5 state words, 20-byte digest.
    Sha1,
    /// SHA-224 (FIPS 180-4): 8 state words, 28-byte digest.
    Sha224,
    /// SHA-256 (FIPS 180-4): 8 state words, 32-byte digest.
    Sha256,
}

impl Algorithm {
    /// Every supported algorithm.
    pub const ALL: [Self; 4] = [Self::Md5, Self::Sha1, Self::Sha224, Self::Sha256];

    /// Block size in bytes.
    #[must_use]
    pub const fn block_size(self) -> usize {
        BLOCK_SIZE
    }

    /// Width of the running state vector in 32-bit words.
    #[must_use]
    pub const fn state_words(self) -> usize {
        self.initial_state().len()
    }

    /// Length of the finished digest in bytes.
    #[must_use]
    pub const fn digest_len(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha224 => 28,
            Self::Sha256 => 32,
        }
    }

    /// Byte order of state words and of the length trailer.
    #[must_use]
    pub const fn word_order(self) -> WordOrder {
        match self {
            Self::Md5 => WordOrder::Little,
            Self::Sha1 | Self::Sha224 | Self::Sha256 => WordOrder::Big,
        }
    }

    /// Initial state vector.
    #[must_use]
    pub const fn initial_state(self) -> &'static [u32] {
        match self {
            Self::Md5 => &MD5_IV,
            Self::Sha1 => &SHA1_IV,
            Self::Sha224 => &SHA224_IV,
            Self::Sha256 => &SHA256_IV,
        }
    }

    /// Canonical lower-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA-1",
            Self::Sha224 => "SHA-224",
            Self::Sha256 => "SHA-256",
        })
    }
}

/// Error returned when parsing an unknown algorithm name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown hash algorithm '{name}' (expected md5, sha1, sha224 or sha256)")]
pub struct ParseAlgorithmError {
    name: String,
}

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "");
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == normalized)
            .ok_or_else(|| ParseAlgorithmError { name: s.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_match_digest_lengths() {
        for algorithm in Algorithm::ALL {
            assert!(algorithm.state_words() * 4 >= algorithm.digest_len());
            assert!(algorithm.state_words() <= MAX_STATE_WORDS);
            assert!(algorithm.digest_len() <= MAX_DIGEST_LEN);
            assert_eq!(algorithm.block_size(), BLOCK_SIZE);
        }
        assert_eq!(Algorithm::Md5.state_words(), 4);
        assert_eq!(Algorithm::Sha1.state_words(), 5);
    }

    #[test]
    fn parse_accepts_common_spellings() {
        assert_eq!("md5".parse::<Algorithm>().unwrap(), Algorithm::Md5);
        assert_eq!("SHA-1".parse::<Algorithm>().unwrap(), Algorithm::Sha1);
        assert_eq!(" sha256 ".parse::<Algorithm>().unwrap(), Algorithm::Sha256);
        let err = "crc32".parse::<Algorithm>().unwrap_err();
        assert!(err.to_string().contains("crc32"));
    }

    #[test]
    fn word_order_round_trips() {
        let word = 0x0102_0304;
        assert_eq!(WordOrder::Little.word_bytes(word), [4, 3, 2, 1]);
        assert_eq!(WordOrder::Big.word_bytes(word), [1, 2, 3, 4]);
        assert_eq!(WordOrder::Big.read_word([1, 2, 3, 4]), word);
        assert_eq!(WordOrder::Little.length_bytes(8)[0], 8);
        assert_eq!(WordOrder::Big.length_bytes(8)[7], 8);
    }
}
