typed_hasher!(
    /// SHA-224 over a shared engine, producing 28 bytes.
    Sha224,
    engine::Algorithm::Sha224,
    28
);

typed_hasher!(
    /// SHA-256 over a shared engine, producing 32 bytes.
    Sha256,
    engine::Algorithm::Sha256,
    32
);
