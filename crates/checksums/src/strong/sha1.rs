typed_hasher!(
    /// SHA-1 (FIPS 180-4) over a shared engine, producing 20 bytes.
    Sha1,
    engine::Algorithm::Sha1,
    20
);
