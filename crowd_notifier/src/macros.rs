/// Concatenates supplied slices into one continuous vector.
#[macro_export]
macro_rules! concat_slices {
    ($($slice: expr),+) => {
        [$(&$slice[..]),+].concat()
    }
}

/// Implements `AsRef<[u8]>` for a newtype over a byte array.
#[macro_export]
macro_rules! impl_as_bytes {
    ($wrapper: ident) => {
        impl AsRef<[u8]> for $wrapper {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }
    };
}
