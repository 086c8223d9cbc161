//! Three-way merge
//!
//! - `split_point`: where two branches diverged (ancestry resolver)
//! - `resolution`: per-file decision from the split point, current and given snapshots
//! - `conflict`: content written for files both sides changed differently

pub mod conflict;
pub mod resolution;
pub mod split_point;
