//! Numeric steps applied to every frame before accumulation.
//!
//! Frames are widened to `f64` at the crop so floor removal can never wrap the
//! 16-bit samples.

use ndarray::{s, Array2};

/// Largest sample, or `None` for an empty image.
pub fn max_value(image: &Array2<f64>) -> Option<f64> {
    image.iter().copied().reduce(f64::max)
}

pub fn min_value(image: &Array2<f64>) -> Option<f64> {
    image.iter().copied().reduce(f64::min)
}

/// Top-left aligned `side × side` crop, widened to `f64`.
///
/// `pixels` must be at least `side` in both directions.
pub fn crop_square(pixels: &Array2<i16>, side: usize) -> Array2<f64> {
    pixels.slice(s![..side, ..side]).mapv(f64::from)
}

/// Removes the sensor black level by subtracting the frame minimum.
pub fn subtract_floor(image: &mut Array2<f64>) {
    if let Some(min) = min_value(image) {
        image.mapv_inplace(|v| v - min);
    }
}

/// Hard clip by percentage of the frame maximum.
///
/// Samples above `ceiling_percent` become 255, samples below `floor_percent`
/// become 0. An all-zero frame is left untouched.
pub fn apply_percentile_threshold(image: &mut Array2<f64>, floor_percent: f64, ceiling_percent: f64) {
    let max = match max_value(image) {
        Some(max) if max != 0.0 => max,
        _ => return,
    };

    image.mapv_inplace(|v| {
        let percent = v / max * 100.0;
        if percent > ceiling_percent {
            255.0
        } else if percent < floor_percent {
            0.0
        } else {
            v
        }
    });
}

/// Rotates by `quadrants × 90°` counter-clockwise.
pub fn rotate_quadrants(image: &Array2<f64>, quadrants: u8) -> Array2<f64> {
    let (rows, cols) = image.dim();
    match quadrants % 4 {
        0 => image.clone(),
        1 => Array2::from_shape_fn((cols, rows), |(r, c)| image[[c, cols - 1 - r]]),
        2 => Array2::from_shape_fn((rows, cols), |(r, c)| image[[rows - 1 - r, cols - 1 - c]]),
        _ => Array2::from_shape_fn((cols, rows), |(r, c)| image[[rows - 1 - c, r]]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn crop_keeps_top_left_square() {
        let pixels = array![[1i16, 2, 3], [4, 5, 6]];
        assert_eq!(crop_square(&pixels, 2), array![[1.0, 2.0], [4.0, 5.0]]);
    }

    #[test]
    fn floor_subtraction_does_not_wrap() {
        let mut image = crop_square(&array![[i16::MIN, i16::MAX]], 1);
        subtract_floor(&mut image);
        assert_eq!(image, array![[0.0]]);

        let mut wide = array![[i16::MIN as f64, i16::MAX as f64]];
        subtract_floor(&mut wide);
        assert_eq!(wide, array![[0.0, 65535.0]]);
    }

    #[test]
    fn threshold_clips_both_ends() {
        let mut image = array![[0.0, 10.0, 50.0], [80.0, 95.0, 100.0]];
        apply_percentile_threshold(&mut image, 20.0, 90.0);
        assert_eq!(image, array![[0.0, 0.0, 50.0], [80.0, 255.0, 255.0]]);
    }

    #[test]
    fn threshold_ceiling_wins_when_ranges_cross() {
        let mut image = array![[10.0, 100.0]];
        apply_percentile_threshold(&mut image, 60.0, 5.0);
        assert_eq!(image, array![[255.0, 255.0]]);
    }

    #[test]
    fn threshold_is_idempotent() {
        let settings = [(0.0, 100.0), (25.0, 100.0), (10.0, 60.0), (40.0, 90.0)];
        for (floor, ceiling) in settings {
            let mut once = Array2::from_shape_fn((8, 8), |(r, c)| ((r * 8 + c) * 4) as f64);
            once[[7, 7]] = 255.0;
            apply_percentile_threshold(&mut once, floor, ceiling);
            let mut twice = once.clone();
            apply_percentile_threshold(&mut twice, floor, ceiling);
            assert_eq!(once, twice, "floor={floor} ceiling={ceiling}");
        }
    }

    #[test]
    fn all_zero_frame_survives_every_step() {
        let mut image = Array2::<f64>::zeros((4, 4));
        subtract_floor(&mut image);
        apply_percentile_threshold(&mut image, 10.0, 90.0);
        assert!(image.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn rotation_matches_counter_clockwise_quarter_turns() {
        let image = array![[1.0, 2.0], [3.0, 4.0]];
        assert_eq!(rotate_quadrants(&image, 0), image);
        assert_eq!(rotate_quadrants(&image, 1), array![[2.0, 4.0], [1.0, 3.0]]);
        assert_eq!(rotate_quadrants(&image, 2), array![[4.0, 3.0], [2.0, 1.0]]);
        assert_eq!(rotate_quadrants(&image, 3), array![[3.0, 1.0], [4.0, 2.0]]);
        assert_eq!(rotate_quadrants(&image, 5), rotate_quadrants(&image, 1));
    }

    #[test]
    fn rotation_handles_rectangles() {
        let image = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        assert_eq!(rotate_quadrants(&image, 1), array![[3.0, 6.0], [2.0, 5.0], [1.0, 4.0]]);
        assert_eq!(rotate_quadrants(&image, 3), array![[4.0, 1.0], [5.0, 2.0], [6.0, 3.0]]);
    }
}
