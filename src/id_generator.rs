use std::sync::atomic::{AtomicU64, Ordering};

// Separate counters so drawing and frame ids never collide within a session
static NEXT_DRAWING_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_FRAME_ID: AtomicU64 = AtomicU64::new(1);

/// Monotonic id for committed drawings, unique for the lifetime of the process
pub fn next_drawing_id() -> u64 {
    NEXT_DRAWING_ID.fetch_add(1, Ordering::SeqCst)
}

/// Monotonic id for decoded frames, used as a texture cache key
pub fn next_frame_id() -> u64 {
    NEXT_FRAME_ID.fetch_add(1, Ordering::SeqCst)
}
