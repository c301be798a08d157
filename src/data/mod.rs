//! Data loading
//!
//! Training and test data are dense delimited text files, one example per
//! line, with an optional trailing category column.

pub mod delimited;

pub use self::delimited::*;
