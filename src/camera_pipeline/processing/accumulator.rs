use ndarray::{Array2, Zip};
use tracing::warn;

/// Session-lifetime running images
///
/// `cumulative` is the incremental mean of every processed frame, so its values
/// stay in frame range however long the session runs. `shot_difference` adds
/// frames on odd shot counts and subtracts them on even ones, cancelling the
/// background between shot-on and shot-off exposures.
#[derive(Debug, Clone)]
pub struct Accumulators {
    cumulative: Array2<f64>,
    shot_difference: Array2<f64>,
    shot_count: u64,
}

impl Accumulators {
    pub fn new(side: usize) -> Self {
        Self {
            cumulative: Array2::zeros((side, side)),
            shot_difference: Array2::zeros((side, side)),
            shot_count: 1,
        }
    }

    /// Folds one processed frame into both images.
    ///
    /// Returns `false` and leaves the state untouched when the frame shape does
    /// not match the accumulators.
    pub fn accumulate(&mut self, frame: &Array2<f64>) -> bool {
        if frame.dim() != self.cumulative.dim() {
            warn!(
                frame = ?frame.dim(),
                accumulators = ?self.cumulative.dim(),
                "Frame shape does not match accumulators, skipping"
            );
            return false;
        }

        if self.shot_count == 1 {
            self.cumulative.assign(frame);
            self.shot_difference.assign(frame);
        } else {
            let n = self.shot_count as f64;
            Zip::from(&mut self.cumulative)
                .and(frame)
                .for_each(|mean, &sample| *mean = *mean * (n - 1.0) / n + sample / n);

            if self.shot_count % 2 == 0 {
                self.shot_difference -= frame;
            } else {
                self.shot_difference += frame;
            }
        }

        self.shot_count += 1;
        true
    }

    /// Zeroes both images and starts counting shots from 1 again.
    pub fn reset(&mut self) {
        self.cumulative.fill(0.0);
        self.shot_difference.fill(0.0);
        self.shot_count = 1;
    }

    pub fn cumulative(&self) -> &Array2<f64> {
        &self.cumulative
    }

    pub fn shot_difference(&self) -> &Array2<f64> {
        &self.shot_difference
    }

    /// Shot number the next processed frame will get.
    pub fn shot_count(&self) -> u64 {
        self.shot_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn filled(value: f64) -> Array2<f64> {
        Array2::from_elem((3, 3), value)
    }

    #[test]
    fn shot_count_tracks_processed_frames() {
        let mut acc = Accumulators::new(3);
        assert_eq!(acc.shot_count(), 1);
        for n in 1..=25 {
            acc.accumulate(&filled(n as f64));
            assert_eq!(acc.shot_count(), n + 1);
        }
    }

    #[test]
    fn cumulative_is_the_arithmetic_mean() {
        let frames = [3.0, 8.0, 1.0, 12.0, 6.5];
        let mut acc = Accumulators::new(3);
        for value in frames {
            acc.accumulate(&filled(value));
        }
        let mean = frames.iter().sum::<f64>() / frames.len() as f64;
        assert!(acc.cumulative().iter().all(|v| (v - mean).abs() < 1e-12));
    }

    #[test]
    fn cumulative_does_not_drift_over_long_sessions() {
        let frame = filled(10.0);
        let mut acc = Accumulators::new(3);
        for _ in 0..10_000 {
            acc.accumulate(&frame);
        }
        assert_eq!(acc.shot_count(), 10_001);
        assert!(acc.cumulative().iter().all(|v| (v - 10.0).abs() < 1e-9));
    }

    #[test]
    fn shot_difference_alternates_sign() {
        let f1 = array![[1.0, 2.0], [3.0, 4.0]];
        let f2 = array![[10.0, 0.0], [1.0, 1.0]];
        let f3 = array![[5.0, 5.0], [5.0, 5.0]];
        let f4 = array![[2.0, 7.0], [0.0, 3.0]];
        let mut acc = Accumulators::new(2);
        for f in [&f1, &f2, &f3, &f4] {
            acc.accumulate(f);
        }
        let expected = &f1 - &f2 + &f3 - &f4;
        assert_eq!(acc.shot_difference(), &expected);
    }

    #[test]
    fn reset_leaves_no_residue() {
        let mut acc = Accumulators::new(3);
        acc.accumulate(&filled(100.0));
        acc.accumulate(&filled(40.0));
        acc.reset();
        assert_eq!(acc.shot_count(), 1);
        assert!(acc.cumulative().iter().all(|v| *v == 0.0));

        let next = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        acc.accumulate(&next);
        assert_eq!(acc.cumulative(), &next);
        assert_eq!(acc.shot_difference(), &next);
    }

    #[test]
    fn mismatched_frame_is_ignored() {
        let mut acc = Accumulators::new(3);
        assert!(!acc.accumulate(&Array2::zeros((2, 2))));
        assert_eq!(acc.shot_count(), 1);
    }
}
