//! View selection, color mapping and fitting to the display surface.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use ndarray::Array2;

use crate::camera_pipeline::processing::accumulator::Accumulators;
use crate::camera_pipeline::processing::colormap::Colormap;
use crate::camera_pipeline::processing::params::ViewMode;
use crate::camera_pipeline::processing::transform::max_value;

/// Bitmap handed to the display once per processed frame
#[derive(Debug, Clone)]
pub struct DisplayFrame {
    pub image: RgbImage,
    /// Frames processed during the last completed one-second window
    pub fps: u32,
    pub view: ViewMode,
    pub shot_count: u64,
}

/// Picks the image for `view` on a 0–255 scale.
///
/// Both accumulator views divide by the maximum of `cumulative`, so the
/// difference image shares the mean's dynamic range. A zero maximum leaves the
/// image unscaled.
pub fn select_view(view: ViewMode, frame: &Array2<f64>, accumulators: &Accumulators) -> Array2<f64> {
    let source = match view {
        ViewMode::Raw => return frame.clone(),
        ViewMode::Cumulative => accumulators.cumulative(),
        ViewMode::Difference => accumulators.shot_difference(),
    };

    match max_value(accumulators.cumulative()) {
        Some(max) if max != 0.0 => source.mapv(|v| v * (255.0 / max)),
        _ => source.clone(),
    }
}

/// Maps each sample (clamped to 0–255, truncated) through the color map.
pub fn colorize(image: &Array2<f64>, colormap: Colormap) -> RgbImage {
    let lut = colormap.lut();
    let (rows, cols) = image.dim();
    RgbImage::from_fn(cols as u32, rows as u32, |x, y| {
        let level = image[[y as usize, x as usize]].clamp(0.0, 255.0) as usize;
        Rgb(lut[level])
    })
}

/// Scales `image` to the largest size that fits `surface` with the same aspect
/// ratio, using nearest-neighbour sampling.
pub fn fit_to_surface(image: RgbImage, surface: (u32, u32)) -> RgbImage {
    let (width, height) = image.dimensions();
    let (surface_w, surface_h) = surface;
    if width == 0 || height == 0 || surface_w == 0 || surface_h == 0 {
        return image;
    }

    let scale = (surface_w as f64 / width as f64).min(surface_h as f64 / height as f64);
    let target_w = ((width as f64 * scale).round() as u32).clamp(1, surface_w);
    let target_h = ((height as f64 * scale).round() as u32).clamp(1, surface_h);
    if (target_w, target_h) == (width, height) {
        return image;
    }
    imageops::resize(&image, target_w, target_h, FilterType::Nearest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn accumulated(frames: &[Array2<f64>]) -> Accumulators {
        let mut acc = Accumulators::new(frames[0].nrows());
        for f in frames {
            acc.accumulate(f);
        }
        acc
    }

    #[test]
    fn raw_view_is_the_frame() {
        let frame = array![[1.0, 300.0], [0.0, 7.0]];
        let acc = Accumulators::new(2);
        assert_eq!(select_view(ViewMode::Raw, &frame, &acc), frame);
    }

    #[test]
    fn cumulative_view_rescales_to_255() {
        let frame = array![[10.0, 20.0], [0.0, 40.0]];
        let acc = accumulated(&[frame.clone()]);
        let view = select_view(ViewMode::Cumulative, &frame, &acc);
        assert_eq!(view, array![[63.75, 127.5], [0.0, 255.0]]);
    }

    #[test]
    fn difference_view_uses_cumulative_maximum() {
        let f1 = array![[40.0, 0.0], [0.0, 0.0]];
        let f2 = array![[0.0, 0.0], [0.0, 20.0]];
        let acc = accumulated(&[f1, f2.clone()]);
        let view = select_view(ViewMode::Difference, &f2, &acc);
        // cumulative max is 20, difference is f1 - f2
        assert_eq!(view, array![[510.0, 0.0], [0.0, -255.0]]);
    }

    #[test]
    fn zero_accumulators_skip_rescale() {
        let frame = Array2::zeros((3, 3));
        let acc = accumulated(&[frame.clone()]);
        for view in [ViewMode::Cumulative, ViewMode::Difference] {
            let out = select_view(view, &frame, &acc);
            assert!(out.iter().all(|v| *v == 0.0));
        }
    }

    #[test]
    fn colorize_clamps_out_of_range_levels() {
        let image = array![[-20.0, 0.0, 127.9, 600.0]];
        let rgb = colorize(&image, Colormap::Gray);
        assert_eq!(rgb.dimensions(), (4, 1));
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(rgb.get_pixel(2, 0), &Rgb([127, 127, 127]));
        assert_eq!(rgb.get_pixel(3, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn fit_preserves_aspect_ratio() {
        let image = RgbImage::new(100, 50);
        assert_eq!(fit_to_surface(image.clone(), (400, 400)).dimensions(), (400, 200));
        assert_eq!(fit_to_surface(image.clone(), (50, 400)).dimensions(), (50, 25));
        assert_eq!(fit_to_surface(image, (0, 10)).dimensions(), (100, 50));
    }

    #[test]
    fn nearest_neighbour_keeps_pixel_values() {
        let mut image = RgbImage::new(2, 2);
        image.put_pixel(0, 0, Rgb([9, 8, 7]));
        let scaled = fit_to_surface(image, (8, 8));
        assert_eq!(scaled.dimensions(), (8, 8));
        assert_eq!(scaled.get_pixel(1, 1), &Rgb([9, 8, 7]));
        assert_eq!(scaled.get_pixel(7, 7), &Rgb([0, 0, 0]));
    }
}
