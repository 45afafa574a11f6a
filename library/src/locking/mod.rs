mod lock;

pub use lock::{NftLock, TimeLock, MAX_LOCK_DURATION};
