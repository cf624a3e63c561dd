/// Server services
pub mod rate_limit;

pub use rate_limit::RateLimiter;
