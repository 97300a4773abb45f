//! Port traits implemented by outbound adapters.

mod source;

pub use source::RateSource;
