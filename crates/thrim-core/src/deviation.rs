//! Deviation ranking between an original and a processed track.

use crate::types::{Deviation, Track};

/// Pair original and processed points positionally by index (up to the
/// shorter length) and rank them by Euclidean distance between their
/// projections, descending, truncated to `top_n`.
///
/// Because simplification changes the sequence length, positional
/// pairing stops being geometrically meaningful past the first removed
/// point — original index 5 is compared against whatever now occupies
/// slot 5. Downstream reporting depends on this positional pairing,
/// so it is kept as-is rather than re-matched geometrically.
#[must_use]
pub fn rank_deviations(original: &Track, processed: &Track, top_n: usize) -> Vec<Deviation> {
    let mut deviations: Vec<Deviation> = original
        .points()
        .iter()
        .zip(processed.points())
        .enumerate()
        .map(|(index, (orig, proc))| Deviation {
            index,
            distance: orig.point().distance(proc.point()),
        })
        .collect();

    deviations.sort_by(|a, b| {
        b.distance
            .partial_cmp(&a.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    deviations.truncate(top_n);

    deviations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrackPoint;

    fn track(samples: &[(f64, f64)]) -> Track {
        Track::new(
            samples
                .iter()
                .map(|&(theta, rho)| TrackPoint::from_polar(theta, rho))
                .collect(),
        )
    }

    #[test]
    fn empty_tracks_rank_empty() {
        let result = rank_deviations(&track(&[]), &track(&[]), 10);
        assert!(result.is_empty());
    }

    #[test]
    fn identical_tracks_have_zero_deviations() {
        let t = track(&[(0.0, 1.0), (0.5, 2.0), (1.0, 3.0)]);
        let result = rank_deviations(&t, &t, 10);
        assert_eq!(result.len(), 3);
        for d in &result {
            assert!(d.distance.abs() < f64::EPSILON);
        }
    }

    #[test]
    fn pairs_only_up_to_shorter_length() {
        let original = track(&[(0.0, 1.0), (0.5, 2.0), (1.0, 3.0), (1.5, 4.0)]);
        let processed = track(&[(0.0, 1.0), (1.5, 4.0)]);
        let result = rank_deviations(&original, &processed, 10);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn sorted_descending_and_truncated() {
        // Radial originals paired against the origin: distances are
        // simply the original rho values.
        let original = track(&[(0.0, 1.0), (0.0, 7.0), (0.0, 3.0)]);
        let processed = track(&[(0.0, 0.0), (0.0, 0.0), (0.0, 0.0)]);

        let all = rank_deviations(&original, &processed, 10);
        let distances: Vec<f64> = all.iter().map(|d| d.distance).collect();
        assert!((distances[0] - 7.0).abs() < 1e-12);
        assert!((distances[1] - 3.0).abs() < 1e-12);
        assert!((distances[2] - 1.0).abs() < 1e-12);
        assert_eq!(all[0].index, 1);

        let top = rank_deviations(&original, &processed, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].index, 1);
        assert_eq!(top[1].index, 2);
    }

    #[test]
    fn positional_pairing_is_index_aligned_after_removal() {
        // After a removal, original index 1 is compared against the
        // point that slid into slot 1, not its geometric counterpart.
        let original = track(&[(0.0, 1.0), (0.0, 2.0), (0.0, 3.0)]);
        let processed = track(&[(0.0, 1.0), (0.0, 3.0)]);
        let result = rank_deviations(&original, &processed, 10);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].index, 1);
        assert!((result[0].distance - 1.0).abs() < 1e-12);
    }
}
