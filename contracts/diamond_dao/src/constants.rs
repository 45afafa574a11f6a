use near_sdk::Gas;

pub const TGAS: Gas = Gas(1_000_000_000_000);
pub const GAS_TRANSFER: Gas = Gas(10 * TGAS.0);
pub const GAS_CALLBACK: Gas = Gas(10 * TGAS.0);
pub const GAS_SBT_SUPPLY: Gas = Gas(5 * TGAS.0);

/// Required deposit for NEP-141 and NEP-171 transfers.
pub const ONE_YOCTO: u128 = 1;

pub const EVENT_STANDARD: &str = "diamond_dao";
pub const EVENT_VERSION: &str = "1.0.0";

pub const MASTER_ROLE: &str = "*";

pub const MEMBER_STORAGE_PREFIX: &[u8; 3] = b"mst";
