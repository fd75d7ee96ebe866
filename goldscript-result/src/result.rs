use crate::error::Error;

/// Result type alias used throughout goldscript.
///
/// A shorthand for `std::result::Result<T, Error>`; every fallible goldscript
/// operation returns this type.
pub type Result<T> = std::result::Result<T, Error>;
