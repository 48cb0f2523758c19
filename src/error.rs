/// Errors returned by the checked query and removal operations of
/// [`AvlTreeMap`](crate::AvlTreeMap).
///
/// A missing key is never an error: lookups and removals of absent keys
/// return `None` instead.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A rank outside `0..len` was passed to [`select`](crate::AvlTreeMap::select).
    #[error("invalid argument: rank {rank} is out of bounds for a map of length {len}")]
    InvalidArgument {
        /// The rank that was requested.
        rank: usize,
        /// The length of the map at the time of the call.
        len: usize,
    },

    /// The operation needs at least one entry but the map is empty.
    #[error("no such element: the map is empty")]
    NoSuchElement,
}

/// Shorthand for results carrying an [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages() {
        assert_eq!(
            Error::InvalidArgument { rank: 3, len: 2 }.to_string(),
            "invalid argument: rank 3 is out of bounds for a map of length 2"
        );
        assert_eq!(Error::NoSuchElement.to_string(), "no such element: the map is empty");
    }
}
