mod clock;
mod factory;
mod moka_cache;
mod ttl_cache;

pub use clock::{Clock, ManualClock, SystemClock};
pub use factory::CacheFactory;
pub use moka_cache::MokaCache;
pub use ttl_cache::TtlCache;
