//! Scoring module - line clear points, drop bonuses, level and gravity
//!
//! - Line clears use `LINE_SCORES` multiplied by the current level (1-based).
//! - Soft and hard drops award flat points per row, without the level multiplier.
//! - Level is `lifetime_lines / 10 + 1`.
//! - The drop interval shrinks geometrically: `base * factor^(level - 1)`.

use crate::types::{HARD_DROP_POINTS, LINES_PER_LEVEL, LINE_SCORES, SOFT_DROP_POINTS};

/// Calculate line clear score
/// lines: number of lines cleared in one landing
/// level: current level (1-based)
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    if lines == 0 || lines >= LINE_SCORES.len() {
        return 0;
    }
    LINE_SCORES[lines].saturating_mul(level)
}

/// Calculate drop score
/// soft_drop: +1 per cell
/// hard_drop: +2 per cell
pub fn calculate_drop_score(cells: u32, is_hard_drop: bool) -> u32 {
    if is_hard_drop {
        cells.saturating_mul(HARD_DROP_POINTS)
    } else {
        cells.saturating_mul(SOFT_DROP_POINTS)
    }
}

/// Level for a lifetime line count
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Gravity interval for a level, rounded to whole milliseconds (at least 1).
pub fn drop_interval_ms(base_ms: u32, speed_factor: f64, level: u32) -> u32 {
    let steps = level.saturating_sub(1).min(i32::MAX as u32) as i32;
    let ms = (base_ms as f64 * speed_factor.powi(steps)).round();
    if ms < 1.0 {
        1
    } else if ms >= u32::MAX as f64 {
        u32::MAX
    } else {
        ms as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_scores() {
        assert_eq!(calculate_line_score(1, 1), 100);
        assert_eq!(calculate_line_score(2, 1), 300);
        assert_eq!(calculate_line_score(3, 1), 500);
        assert_eq!(calculate_line_score(4, 1), 800);

        assert_eq!(calculate_line_score(1, 3), 300);
        assert_eq!(calculate_line_score(4, 5), 4000);
    }

    #[test]
    fn test_line_scores_outside_table() {
        assert_eq!(calculate_line_score(0, 4), 0);
        assert_eq!(calculate_line_score(5, 4), 0);
        assert_eq!(calculate_line_score(10, 1), 0);
    }

    #[test]
    fn test_drop_scores() {
        assert_eq!(calculate_drop_score(10, false), 10);
        assert_eq!(calculate_drop_score(10, true), 20);
        assert_eq!(calculate_drop_score(0, true), 0);
    }

    #[test]
    fn test_level_calculation() {
        assert_eq!(calculate_level(0), 1);
        assert_eq!(calculate_level(9), 1);
        assert_eq!(calculate_level(10), 2);
        assert_eq!(calculate_level(29), 3);
        assert_eq!(calculate_level(100), 11);
    }

    #[test]
    fn test_drop_intervals() {
        assert_eq!(drop_interval_ms(1000, 0.75, 1), 1000);
        assert_eq!(drop_interval_ms(1000, 0.75, 2), 750);
        // 562.5 rounds half away from zero
        assert_eq!(drop_interval_ms(1000, 0.75, 3), 563);
        assert_eq!(drop_interval_ms(1000, 1.0, 40), 1000);
    }

    #[test]
    fn test_drop_interval_floor() {
        assert_eq!(drop_interval_ms(1000, 0.75, 200), 1);
        assert_eq!(drop_interval_ms(1000, 0.75, 0), 1000);
    }
}
