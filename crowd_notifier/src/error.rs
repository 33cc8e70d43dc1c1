use ark_serialize::SerializationError;

#[derive(Debug)]
pub enum CrowdNotifierError {
    /// A byte buffer had the wrong length. Contains (expected, found)
    InvalidByteLength(usize, usize),
    /// Bytes decode to a group element that is the identity or outside the prime order subgroup
    InvalidGroupElement,
    /// Arrival is after departure or a token's validity starts after it ends. Contains (start, end)
    InvalidTimeRange(u64, u64),
    UnsupportedVersion(u8),
    /// Token used before its validity starts. Contains the start of validity
    TokenNotYetValid(u64),
    /// Token used after its validity ended. Contains the end of validity
    TokenExpired(u64),
    UnknownCheckIn,
    EncryptionFailed,
    Serialization(SerializationError),
}

impl From<SerializationError> for CrowdNotifierError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}

impl From<aead::Error> for CrowdNotifierError {
    fn from(_: aead::Error) -> Self {
        Self::EncryptionFailed
    }
}
