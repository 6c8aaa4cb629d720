use std::{
    sync::{
        OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};

// Boot stamp keeps ids distinct across restarts; the counter keeps them distinct within one.
fn boot_stamp() -> u64 {
    static STAMP: OnceLock<u64> = OnceLock::new();
    *STAMP.get_or_init(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    })
}

/// Session id of the form `<boot stamp hex>-<sequence>`.
pub fn next_session_id() -> String {
    static SEQUENCE: AtomicU64 = AtomicU64::new(1);
    let n = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{:x}-{n}", boot_stamp())
}

/// Seed for a session that has no pinned seed.
pub fn random_seed() -> u64 {
    rand::random::<u64>()
}
