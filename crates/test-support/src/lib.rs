//! Shared test utilities for the accel-hash workspace.
//!
//! Holds the known-answer table used by the engine, checksums and CLI
//! suites, plus small hex and temporary-file helpers.

use std::io::Write;

use tempfile::NamedTempFile;

/// Message of a known-answer vector.
#[derive(Clone, Copy, Debug)]
pub enum Message {
    /// Literal bytes.
    Bytes(&'static [u8]),
    /// One byte repeated `n` times.
    Repeat(u8, usize),
}

impl Message {
    /// Materialises the message.
    #[must_use]
    pub fn to_vec(self) -> Vec<u8> {
        match self {
            Self::Bytes(bytes) => bytes.to_vec(),
            Self::Repeat(byte, n) => vec![byte; n],
        }
    }

    /// Message length in bytes.
    #[must_use]
    pub const fn len(self) -> usize {
        match self {
            Self::Bytes(bytes) => bytes.len(),
            Self::Repeat(_, n) => n,
        }
    }

    /// Returns `true` for the empty message.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }
}

/// One message with its MD5, SHA-1, SHA-224 and SHA-256 digests.
///
/// Vectors come from RFC 1321 section A.5 and FIPS 180 examples, plus
/// lengths around the padding boundaries.
#[derive(Clone, Copy, Debug)]
pub struct KnownAnswer {
    /// Short description used in assertion messages.
    pub label: &'static str,
    /// The message.
    pub message: Message,
    /// Lower-case hex MD5 digest.
    pub md5: &'static str,
    /// Lower-case hex SHA-1 digest.
    pub sha1: &'static str,
    /// Lower-case hex SHA-224 digest.
    pub sha224: &'static str,
    /// Lower-case hex SHA-256 digest.
    pub sha256: &'static str,
}

impl KnownAnswer {
    /// Looks up the expected digest by canonical algorithm name
    /// (`md5`, `sha1`, `sha224`, `sha256`).
    #[must_use]
    pub fn expected(&self, algorithm: &str) -> Option<&'static str> {
        match algorithm {
            "md5" => Some(self.md5),
            "sha1" => Some(self.sha1),
            "sha224" => Some(self.sha224),
            "sha256" => Some(self.sha256),
            _ => None,
        }
    }
}

/// Known-answer table, shortest message first.
pub const KNOWN_ANSWERS: &[KnownAnswer] = &[
    KnownAnswer {
        label: "empty",
        message: Message::Bytes(b""),
        md5: "d41d8cd98f00b204e9800998ecf8427e",
        sha1: "da39a3ee5e6b4b0d3255bfef95601890afd80709",
        sha224: "d14a028c2a3a2bc9476102bb288234c415a2b01f828ea62ac5b3e42f",
        sha256: "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
    },
    KnownAnswer {
        label: "a",
        message: Message::Bytes(b"a"),
        md5: "0cc175b9c0f1b6a831c399e269772661",
        sha1: "86f7e437faa5a7fce15d1ddcb9eaeaea377667b8",
        sha224: "abd37534c7d9a2efb9465de931cd7055ffdb8879563ae98078d6d6d5",
        sha256: "ca978112ca1bbdcafac231b39a23dc4da786eff8147c4e72b9807785afee48bb",
    },
    KnownAnswer {
        label: "abc",
        message: Message::Bytes(b"abc"),
        md5: "900150983cd24fb0d6963f7d28e17f72",
        sha1: "a9993e364706816aba3e25717850c26c9cd0d89d",
        sha224: "23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7",
        sha256: "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
    },
    KnownAnswer {
        label: "message digest",
        message: Message::Bytes(b"message digest"),
        md5: "f96b697d7cb7938d525a2f31aaf161d0",
        sha1: "c12252ceda8be8994d5fa0290a47231c1d16aae3",
        sha224: "2cb21c83ae2f004de7e81c3c7019cbcb65b71ab656b22d6d0c39b8eb",
        sha256: "f7846f55cf23e14eebeab5b4e1550cad5b509e3348fbc4efa3a1413d393cb650",
    },
    KnownAnswer {
        label: "alphabet",
        message: Message::Bytes(b"abcdefghijklmnopqrstuvwxyz"),
        md5: "c3fcd3d76192e4007dfb496cca67e13b",
        sha1: "32d10c7b8cf96570ca04ce37f2a19d84240d3a89",
        sha224: "45a5f72c39c5cff2522eb3429799e49e5f44b356ef926bcf390dccc2",
        sha256: "71c480df93d6ae2f1efad1447c66c9525e316218cf51fc8d9ed832f2daf18b73",
    },
    KnownAnswer {
        label: "alphanumeric",
        message: Message::Bytes(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789"),
        md5: "d174ab98d277d9f5a5611c2c9f419d9f",
        sha1: "761c457bf73b14d27e9e9265c46f4b4dda11f940",
        sha224: "bff72b4fcb7d75e5632900ac5f90d219e05e97a7bde72e740db393d9",
        sha256: "db4bfcbd4da0cd85a60c3c37d3fbd8805c77f15fc6b1fdfe614ee0a7c8fdb4c0",
    },
    KnownAnswer {
        label: "digits x8",
        message: Message::Bytes(b"12345678901234567890123456789012345678901234567890123456789012345678901234567890"),
        md5: "57edf4a22be3c955ac49da2e2107b67a",
        sha1: "50abf5706a150990a08b2c5ea40fa0e585554732",
        sha224: "b50aecbe4e9bb0b57bc5f3ae760a8e01db24f203fb3cdcd13148046e",
        sha256: "f371bc4a311f2b009eef952dd83ca80e2b60026c8e935592d0f9c308453c813e",
    },
    KnownAnswer {
        label: "two-block nist",
        message: Message::Bytes(b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq"),
        md5: "8215ef0796a20bcaaae116d3876c664a",
        sha1: "84983e441c3bd26ebaae4aa1f95129e5e54670f1",
        sha224: "75388b16512776cc5dba5da1fd890150b0c6455cb4f58b1952522525",
        sha256: "248d6a61d20638b8e5c026930c3e6039a33ce45964ff2167f6ecedd419db06c1",
    },
    KnownAnswer {
        label: "quick brown fox",
        message: Message::Bytes(b"The quick brown fox jumps over the lazy dog"),
        md5: "9e107d9d372bb6826bd81d3542a419d6",
        sha1: "2fd4e1c67a2d28fced849ee1bb76e7391b93eb12",
        sha224: "730e109bd7a8a32b1cb9d9a09aa2325d2430587ddbc0c38bad911525",
        sha256: "d7a8fbb307d7809469ca9abcb0082e4f8d5651e46d3cdb762d02d0bf37c9e592",
    },
    KnownAnswer {
        label: "55 bytes",
        message: Message::Repeat(b'a', 55),
        md5: "ef1772b6dff9a122358552954ad0df65",
        sha1: "c1c8bbdc22796e28c0e15163d20899b65621d65a",
        sha224: "fb0bd626a70c28541dfa781bb5cc4d7d7f56622a58f01a0b1ddd646f",
        sha256: "9f4390f8d30c2dd92ec9f095b65e2b9ae9b0a925a5258e241c9f1e910f734318",
    },
    KnownAnswer {
        label: "56 bytes",
        message: Message::Repeat(b'a', 56),
        md5: "3b0c8ac703f828b04c6c197006d17218",
        sha1: "c2db330f6083854c99d4b5bfb6e8f29f201be699",
        sha224: "d40854fc9caf172067136f2e29e1380b14626bf6f0dd06779f820dcd",
        sha256: "b35439a4ac6f0948b6d6f9e3c6af0f5f590ce20f1bde7090ef7970686ec6738a",
    },
    KnownAnswer {
        label: "63 bytes",
        message: Message::Repeat(b'a', 63),
        md5: "b06521f39153d618550606be297466d5",
        sha1: "03f09f5b158a7a8cdad920bddc29b81c18a551f5",
        sha224: "1d4e051f4d6fed2a63fd2421e65834cec00d64456553de3496ae8b1d",
        sha256: "7d3e74a05d7db15bce4ad9ec0658ea98e3f06eeecf16b4c6fff2da457ddc2f34",
    },
    KnownAnswer {
        label: "one block",
        message: Message::Repeat(b'a', 64),
        md5: "014842d480b571495a4a0363793f7367",
        sha1: "0098ba824b5c16427bd7a1122a5a442a25ec644d",
        sha224: "a88cd5cde6d6fe9136a4e58b49167461ea95d388ca2bdb7afdc3cbf4",
        sha256: "ffe054fe7ae0cb6dc65c3af9b61d5209f439851db43d0ba5997337df154668eb",
    },
    KnownAnswer {
        label: "65 bytes",
        message: Message::Repeat(b'a', 65),
        md5: "c743a45e0d2e6a95cb859adae0248435",
        sha1: "11655326c708d70319be2610e8a57d9a5b959d3b",
        sha224: "ff8716f600af42959d0efb52e1f21b01bb328733009344d511c299fb",
        sha256: "635361c48bb9eab14198e76ea8ab7f1a41685d6ad62aa9146d301d4f17eb0ae0",
    },
    KnownAnswer {
        label: "two blocks",
        message: Message::Repeat(b'a', 128),
        md5: "e510683b3f5ffe4093d021808bc6ff70",
        sha1: "ad5b3fdbcb526778c2839d2f151ea753995e26a0",
        sha224: "39873a2441c56608137850f4c54dde157710b9a2b83c8bdc756dd643",
        sha256: "6836cf13bac400e9105071cd6af47084dfacad4e5e302c94bfed24e013afb73e",
    },
    KnownAnswer {
        label: "million a",
        message: Message::Repeat(b'a', 1_000_000),
        md5: "7707d6ae4e027c70eea2a935c2296f21",
        sha1: "34aa973cd4c4daa4f61eeb2bdbad27316534016f",
        sha224: "20794655980c91d8bbb4c1ea97618a4bf03f42581948b2ee4ee7ad67",
        sha256: "cdc76e5c9914fb9281a1c7e284d73e67f1809a48a497200e046d39ccc7112cd0",
    },
];

/// Known answers small enough for per-chunk and per-backend loops.
pub fn short_known_answers() -> impl Iterator<Item = &'static KnownAnswer> {
    KNOWN_ANSWERS.iter().filter(|kat| kat.message.len() <= 1024)
}

/// Renders bytes as lower-case hex.
#[must_use]
pub fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write as _;

    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Writes `contents` to a fresh temporary file.
///
/// # Panics
///
/// Panics when the file cannot be created or written.
#[must_use]
pub fn temp_file_with(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}
