//! Stage function: score → stage via ascending thresholds
//!
//! thresholds[0] is where stage 1 starts, thresholds[1] stage 2, and so on.
//! A score below every threshold still counts as stage 1.

/// Stage (1-based) reached by `score`
///
/// Monotonic: a higher score never yields a lower stage, provided the
/// thresholds are ascending (checked by config validation).
pub fn stage_of(score: i32, thresholds: &[i32]) -> u8 {
    let reached = thresholds.iter().take_while(|&&t| score >= t).count();
    reached.max(1) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PERCENT_T2, PERCENT_T3, POINTS_T2, POINTS_T3, SCORE_MAX, SCORE_MIN, POINTS_MAX};

    const PERCENT: [i32; 3] = [SCORE_MIN, PERCENT_T2, PERCENT_T3];
    const POINTS: [i32; 3] = [0, POINTS_T2, POINTS_T3];

    #[test]
    fn test_percentage_boundaries() {
        assert_eq!(stage_of(0, &PERCENT), 1);
        assert_eq!(stage_of(29, &PERCENT), 1);
        assert_eq!(stage_of(30, &PERCENT), 2);
        assert_eq!(stage_of(64, &PERCENT), 2);
        assert_eq!(stage_of(65, &PERCENT), 3);
        assert_eq!(stage_of(100, &PERCENT), 3);
    }

    #[test]
    fn test_point_boundaries() {
        assert_eq!(stage_of(1, &POINTS), 1);
        assert_eq!(stage_of(2, &POINTS), 2);
        assert_eq!(stage_of(3, &POINTS), 2);
        assert_eq!(stage_of(4, &POINTS), 3);
        assert_eq!(stage_of(5, &POINTS), 3);
    }

    #[test]
    fn test_below_first_threshold_is_stage_one() {
        assert_eq!(stage_of(-10, &PERCENT), 1);
        assert_eq!(stage_of(3, &[]), 1);
    }

    #[test]
    fn test_monotonic_over_whole_scale() {
        for thresholds in [&PERCENT[..], &POINTS[..]] {
            let max = if thresholds == &POINTS[..] { POINTS_MAX } else { SCORE_MAX };
            let mut prev = stage_of(0, thresholds);
            for score in 1..=max {
                let stage = stage_of(score, thresholds);
                assert!(stage >= prev, "stage dropped at score {}", score);
                prev = stage;
            }
        }
    }
}
