typed_hasher!(
    /// MD5 (RFC 1321) over a shared engine, producing 16 bytes.
    Md5,
    engine::Algorithm::Md5,
    16
);
