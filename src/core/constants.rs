// Remote service
pub const DEFAULT_BASE_URL: &str = "https://www.bungie.net/Platform";
pub const PROFILE_COMPONENTS: &str = "102,200,201,205,300";
pub const API_KEY_HEADER: &str = "X-API-Key";
pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

// Platform error codes and statuses
pub const SUCCESS_ERROR_CODE: i32 = 1;
pub const THROTTLE_ERROR_CODE: i32 = 36;
pub const THROTTLE_ERROR_STATUS: &str = "ThrottleLimitExceededMomentarily";

// Retry policy for mutating calls
pub const RETRY_MAX_ATTEMPTS: u32 = 5;
pub const RETRY_BACKOFF_MS: u64 = 1000;

// Inventory bucket hashes
pub const KINETIC_BUCKET: u32 = 1498876634;
pub const ENERGY_BUCKET: u32 = 2465295065;
pub const POWER_BUCKET: u32 = 953998645;
pub const GHOST_BUCKET: u32 = 4023194814;
pub const HELMET_BUCKET: u32 = 3448274439;
pub const GAUNTLETS_BUCKET: u32 = 3551918588;
pub const CHEST_BUCKET: u32 = 14239492;
pub const LEGS_BUCKET: u32 = 20886954;
pub const CLASS_ARMOR_BUCKET: u32 = 1585787867;
pub const ARTIFACT_BUCKET: u32 = 434908299;
pub const ENGRAM_BUCKET: u32 = 375726501;

// Contribution of each equipped slot to the character power level
pub const WEAPON_POWER_WEIGHT: f64 = 0.143;
pub const ARMOR_POWER_WEIGHT: f64 = 0.119;
pub const CLASS_ARMOR_POWER_WEIGHT: f64 = 0.095;

// Character class hashes ('classHash' in character components)
pub const TITAN_CLASS_HASH: u32 = 3655393761;
pub const HUNTER_CLASS_HASH: u32 = 671679327;
pub const WARLOCK_CLASS_HASH: u32 = 2271682572;

// Membership types
pub const MEMBERSHIP_XBOX: u32 = 1;
pub const MEMBERSHIP_PSN: u32 = 2;
pub const MEMBERSHIP_BLIZZARD: u32 = 4;
pub const MEMBERSHIP_DEMON: u32 = 10;

// Item types that must never resolve from a spoken name
pub const UNRESOLVABLE_ITEM_TYPES: [&str; 2] = ["Material Exchange", ""];
