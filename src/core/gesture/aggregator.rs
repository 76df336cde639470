use std::collections::BTreeMap;

use log::warn;

use super::features::FEATURE_LEN;

/// Most frequent vector length in `vectors`. Ties resolve to the larger
/// length. `None` for an empty input.
pub fn dominant_length<'a, I>(vectors: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a Vec<f32>>,
{
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for v in vectors {
        *counts.entry(v.len()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by_key(|&(_, count)| count)
        .map(|(len, _)| len)
}

/// Reduce a gesture window to one fixed-length vector by element-wise
/// mean over the dominant-length frames in `[start, end]`.
///
/// Frames whose length differs from the dominant one are detector
/// dropouts inside the window and are discarded before averaging. An
/// empty or out-of-range slice yields an all-zero vector.
pub fn aggregate(history: &[Vec<f32>], start: usize, end: usize) -> Vec<f32> {
    let slice = if start < history.len() && start <= end {
        &history[start..=end.min(history.len() - 1)]
    } else {
        &[]
    };

    let dominant = match dominant_length(slice.iter()) {
        Some(len) => len,
        None => {
            warn!("⚠️ empty gesture window, substituting a zero vector");
            return vec![0.0; FEATURE_LEN];
        }
    };

    let kept: Vec<&Vec<f32>> = slice.iter().filter(|v| v.len() == dominant).collect();
    debug_assert!(!kept.is_empty());
    if kept.len() < slice.len() {
        warn!(
            "⚠️ dropped {} inconsistent frame(s) from a window of {}",
            slice.len() - kept.len(),
            slice.len()
        );
    }

    let mut mean = vec![0.0f32; dominant];
    for v in &kept {
        for (m, x) in mean.iter_mut().zip(v.iter()) {
            *m += x;
        }
    }
    let n = kept.len() as f32;
    for m in &mut mean {
        *m /= n;
    }
    mean
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_over_window() {
        let history = vec![
            vec![0.0, 0.0],
            vec![1.0, 2.0],
            vec![3.0, 4.0],
            vec![9.0, 9.0],
        ];
        let mean = aggregate(&history, 1, 2);
        assert_eq!(mean, vec![2.0, 3.0]);
    }

    #[test]
    fn test_single_frame_window() {
        let history = vec![vec![1.5, 2.5]];
        assert_eq!(aggregate(&history, 0, 0), vec![1.5, 2.5]);
    }

    #[test]
    fn test_inconsistent_lengths_discarded() {
        let history = vec![
            vec![1.0, 1.0],
            vec![5.0, 5.0, 5.0], // dropout frame
            vec![3.0, 3.0],
        ];
        assert_eq!(aggregate(&history, 0, 2), vec![2.0, 2.0]);
    }

    #[test]
    fn test_empty_window_substitutes_zeros() {
        let history: Vec<Vec<f32>> = vec![vec![1.0; 4]];
        let out = aggregate(&history, 3, 5);
        assert_eq!(out.len(), FEATURE_LEN);
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_end_clamped_to_history() {
        let history = vec![vec![2.0], vec![4.0]];
        assert_eq!(aggregate(&history, 0, 99), vec![3.0]);
    }

    #[test]
    fn test_dominant_length() {
        let vectors = vec![vec![0.0; 3], vec![0.0; 2], vec![0.0; 3]];
        assert_eq!(dominant_length(vectors.iter()), Some(3));
        assert_eq!(dominant_length([].iter()), None);
    }

    #[test]
    fn test_dominant_length_tie_prefers_longer() {
        let vectors = vec![vec![0.0; 2], vec![0.0; 5]];
        assert_eq!(dominant_length(vectors.iter()), Some(5));
    }
}
