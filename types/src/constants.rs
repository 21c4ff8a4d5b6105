use std::time::Duration;

/// Players added to the table size when computing the blind increment
pub const BASE_PLAYERS: i64 = 5;

/// Time unit the blind increment is measured in (one minute)
pub const BLIND_UNIT: Duration = Duration::from_secs(60);

/// Blind amounts, in the order they are raised
pub const BLIND_AMOUNTS: [u64; 11] = [100, 200, 300, 400, 500, 600, 800, 1000, 2000, 4000, 8000];
