/// Number of entries returned by the "recent" listings (items and reports)
pub const RECENT_LIMIT: i64 = 5;

/// Maximum number of photos attached to one report
pub const MAX_PHOTOS_PER_REPORT: i64 = 4;

/// Maximum size of a single photo in bytes (5MB, photos are compressed client-side)
pub const MAX_PHOTO_SIZE: usize = 5 * 1024 * 1024;

/// GPS accuracy threshold (meters) seeded into the settings store
pub const SETTING_ACCURACY_THRESHOLD: &str = "accuracyThreshold";
pub const DEFAULT_ACCURACY_THRESHOLD: &str = "5";
