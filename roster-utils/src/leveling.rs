/// Highest experience value a player may hold.
pub const MAX_EXPERIENCE: i32 = 10_000_000;

/// Total experience needed to reach `level` (`50 * L * (L + 1)`).
pub fn level_threshold(level: i64) -> i64 {
    50 * level * (level + 1)
}

/// Derive the level for an experience count.
///
/// Equivalent to `floor((sqrt(2500 + 200 * xp) - 50) / 100)`, corrected so the
/// result is always the largest `L` with `50 * L * (L + 1) <= xp`, even where
/// the floating point square root lands a hair off an exact square.
pub fn level_for_experience(experience: i32) -> i32 {
    let experience = i64::from(experience.max(0));
    let estimate = (((2_500 + 200 * experience) as f64).sqrt() - 50.0) / 100.0;

    let mut level = estimate.floor().max(0.0) as i64;
    while level > 0 && level_threshold(level) > experience {
        level -= 1;
    }
    while level_threshold(level + 1) <= experience {
        level += 1;
    }

    i32::try_from(level).unwrap_or(i32::MAX)
}

/// Experience still missing before `level + 1` is reached.
pub fn until_next_level(level: i32, experience: i32) -> i32 {
    let remaining = level_threshold(i64::from(level) + 1) - i64::from(experience);
    i32::try_from(remaining).unwrap_or(i32::MAX)
}

/// Convenience pair of both derived values for an experience count.
pub fn derive_progress(experience: i32) -> (i32, i32) {
    let level = level_for_experience(experience);
    (level, until_next_level(level, experience))
}
