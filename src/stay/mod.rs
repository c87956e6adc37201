//! Stay duration and parking fee rules.
//!
//! Everything here is pure: callers pass the current time in, nothing reads
//! the system clock, and malformed input degrades to sentinel values rather
//! than errors so that one bad row never breaks a listing.

pub mod duration;
pub mod fee;
pub mod format;
pub mod fractions;
pub mod quote;

pub use duration::{Elapsed, StayDuration, compute_closed_stay, compute_elapsed, parse_moment};
pub use fee::compute_fee;
pub use format::{format_clock, format_human};
pub use fractions::resolve_fractions;
pub use quote::{StayQuote, quote_stay};
