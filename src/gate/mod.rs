pub mod client;
pub mod limiter;

pub use client::{client_key, Admitted, ANONYMOUS_KEY};
pub use limiter::{Admission, RateLimiter};
