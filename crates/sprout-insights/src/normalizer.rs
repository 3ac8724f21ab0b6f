//! Normalizer: rescales raw sums into 0..=100 and ranks interests.

use crate::accumulator::RawInterest;
use crate::config::ScoringConfig;
use crate::profile::Interest;

/// Fewest interests a profile ever reports.
pub const MIN_INTERESTS: usize = 2;

/// `min(round(score / max_expected * 100), 100)`, never below 0.
///
/// Rounding is half away from zero.
pub fn normalize(score: f64, max_expected: f64) -> u32 {
    if !score.is_finite() || max_expected <= 0.0 {
        return 0;
    }
    (score / max_expected * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Normalize each axis and raise it to its floor.
pub fn normalize_axes<const N: usize>(raw: &[f64; N], max_expected: f64, floors: &[u32; N]) -> [u32; N] {
    let mut out = [0; N];
    for ((slot, score), floor) in out.iter_mut().zip(raw).zip(floors) {
        *slot = normalize(*score, max_expected).max(*floor);
    }
    out
}

/// Normalize interest strengths, drop weak ones, and keep the strongest.
///
/// Sorting is stable, so ties keep first-seen order. When nothing survives
/// the threshold the two default interests are returned; a single survivor is
/// followed by the first default it does not duplicate.
pub fn rank_interests(raw: &[RawInterest], config: &ScoringConfig) -> Vec<Interest> {
    let mut ranked: Vec<Interest> = raw
        .iter()
        .map(|r| Interest {
            category: r.category.to_string(),
            strength: normalize(r.strength, config.interest_max_expected),
            examples: r.examples.iter().take(config.max_examples).cloned().collect(),
        })
        .filter(|i| i.strength > config.interest_threshold)
        .collect();

    ranked.sort_by(|a, b| b.strength.cmp(&a.strength));
    ranked.truncate(config.max_interests);

    if ranked.is_empty() {
        return default_interests();
    }
    for default in default_interests() {
        if ranked.len() >= MIN_INTERESTS {
            break;
        }
        if !ranked.iter().any(|i| i.category == default.category) {
            ranked.push(default);
        }
    }
    ranked
}

/// Interests reported when no category clears the threshold.
pub fn default_interests() -> Vec<Interest> {
    vec![
        Interest {
            category: "exploration".to_string(),
            strength: 60,
            examples: vec![
                "General curiosity".to_string(),
                "Asking questions".to_string(),
            ],
        },
        Interest {
            category: "creativity".to_string(),
            strength: 50,
            examples: vec!["Imaginative play".to_string(), "Storytelling".to_string()],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(category: &'static str, strength: f64) -> RawInterest {
        RawInterest {
            category,
            strength,
            examples: vec![format!("{category} example")],
        }
    }

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize(17.0, 100.0), 17);
        assert_eq!(normalize(0.0, 100.0), 0);
        assert_eq!(normalize(5.0, 20.0), 25);
    }

    #[test]
    fn test_normalize_caps_at_100() {
        assert_eq!(normalize(250.0, 100.0), 100);
        assert_eq!(normalize(21.0, 20.0), 100);
    }

    #[test]
    fn test_normalize_rejects_bad_input() {
        assert_eq!(normalize(-5.0, 100.0), 0);
        assert_eq!(normalize(f64::NAN, 100.0), 0);
        assert_eq!(normalize(10.0, 0.0), 0);
    }

    #[test]
    fn test_normalize_axes_applies_floors() {
        let out = normalize_axes(&[0.0, 60.0, 10.0], 100.0, &[40, 40, 0]);
        assert_eq!(out, [40, 60, 10]);
    }

    #[test]
    fn test_rank_interests_threshold_is_exclusive() {
        let config = ScoringConfig::default();
        // 2.0 / 20 -> 10, which does not clear the threshold
        let ranked = rank_interests(&[raw("music", 2.0), raw("art", 3.0)], &config);
        assert!(ranked.iter().all(|i| i.category != "music"));
        assert_eq!(ranked[0].category, "art");
        assert_eq!(ranked[0].strength, 15);
    }

    #[test]
    fn test_single_survivor_is_padded_with_default() {
        let config = ScoringConfig::default();
        let ranked = rank_interests(&[raw("art", 3.0)], &config);
        let names: Vec<_> = ranked.iter().map(|i| i.category.as_str()).collect();
        assert_eq!(names, vec!["art", "exploration"]);
        assert_eq!(ranked[1].strength, 60);
    }

    #[test]
    fn test_padding_skips_duplicate_default_category() {
        let config = ScoringConfig::default();
        let ranked = rank_interests(&[raw("exploration", 3.0)], &config);
        let names: Vec<_> = ranked.iter().map(|i| i.category.as_str()).collect();
        assert_eq!(names, vec!["exploration", "creativity"]);
        assert_eq!(ranked[0].strength, 15);
    }

    #[test]
    fn test_rank_interests_sorted_and_truncated() {
        let config = ScoringConfig {
            max_interests: 2,
            ..ScoringConfig::default()
        };
        let ranked = rank_interests(
            &[raw("music", 4.0), raw("art", 10.0), raw("games", 6.0)],
            &config,
        );
        let names: Vec<_> = ranked.iter().map(|i| i.category.as_str()).collect();
        assert_eq!(names, vec!["art", "games"]);
    }

    #[test]
    fn test_rank_interests_stable_ties() {
        let config = ScoringConfig::default();
        let ranked = rank_interests(&[raw("nature", 4.0), raw("science", 4.0)], &config);
        assert_eq!(ranked[0].category, "nature");
        assert_eq!(ranked[1].category, "science");
    }

    #[test]
    fn test_rank_interests_defaults_when_empty() {
        let config = ScoringConfig::default();
        let ranked = rank_interests(&[], &config);
        assert_eq!(ranked, default_interests());
        assert_eq!(ranked[0].strength, 60);
        assert_eq!(ranked[1].examples, vec!["Imaginative play", "Storytelling"]);
    }
}
