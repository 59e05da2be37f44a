//! Input loading.
//!
//! Turns delimited text exports into a [`RawTable`](crate::models::RawTable).

mod delimited;

pub use delimited::{load_delimited, load_delimited_file, sniff_delimiter};
