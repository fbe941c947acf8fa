//! Contains the Viewport struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0 in
//! the upper-left corner, and a region of the complex plane that may
//! be centered anywhere, at any scale, under any rotation.
use num::Complex;

/// Describes the x, y of a pixel in the image.  Row 0 is the top of
/// the image.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pixel(pub i64, pub i64);

/// The mapping between the integral (image) plane and the complex
/// plane.  A viewport is fixed for the lifetime of one render.  The
/// fields are private so that every viewport has passed through `new`:
/// the scale is positive and the image is at least 1x1.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    center: Complex<f64>,
    scale: f64,
    rotation: f64,
    width: u32,
    height: u32,
}

impl Viewport {
    /// Constructor.  Rejects a non-positive (or non-finite) scale and
    /// an empty image.
    pub fn new(
        center: Complex<f64>,
        scale: f64,
        rotation: f64,
        width: u32,
        height: u32,
    ) -> Result<Viewport, String> {
        if !(scale > 0.0) || !scale.is_finite() {
            return Err(format!("The scale must be positive, got {}", scale));
        }
        if width == 0 || height == 0 {
            return Err(format!(
                "The image must be at least 1x1, got {}x{}",
                width, height
            ));
        }
        Ok(Viewport {
            center,
            scale,
            rotation,
            width,
            height,
        })
    }

    /// The same image at a different zoom level and rotation.  The
    /// scale must be positive, as for `new`.
    pub fn with_scale_rotation(&self, scale: f64, rotation: f64) -> Viewport {
        debug_assert!(scale > 0.0, "non-positive scale {}", scale);
        Viewport {
            scale,
            rotation,
            ..*self
        }
    }

    /// The point of the complex plane at the middle of the image.
    pub fn center(&self) -> Complex<f64> {
        self.center
    }

    /// Plane units per pixel.  Always positive.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Counter-clockwise rotation of the image about its center, in
    /// radians.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Width of the image in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the image in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The total number of pixels in the image.
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Never true for a viewport built with `new`.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The first half of the mapping: center the pixel on the middle
    /// of the image, flip the y axis so that rows grow downward while
    /// the imaginary axis grows upward, and scale.  The result is
    /// neither rotated nor translated.
    pub fn pixel_offset(&self, x: i64, y: i64) -> (f64, f64) {
        let a = (x as f64 - f64::from(self.width.saturating_sub(1)) / 2.0) * self.scale;
        let b = (f64::from(self.height.saturating_sub(1)) / 2.0 - y as f64) * self.scale;
        (a, b)
    }

    /// The second half of the mapping: rotate an offset about the
    /// origin and translate it to the center.
    pub fn resolve(&self, a: f64, b: f64) -> Complex<f64> {
        let (sin, cos) = self.rotation.sin_cos();
        Complex::new(
            self.center.re + cos * a - sin * b,
            self.center.im + sin * a + cos * b,
        )
    }

    /// Given a pixel on the integral plane, return the complex number
    /// that lies under it.
    pub fn pixel_to_point(&self, pixel: Pixel) -> Complex<f64> {
        let (a, b) = self.pixel_offset(pixel.0, pixel.1);
        self.resolve(a, b)
    }

    /// Given a complex number, map it as closely as possible to a
    /// pixel.  Points outside the image map to pixels outside the
    /// image bounds, which is why the coordinates are signed.
    pub fn point_to_pixel(&self, point: Complex<f64>) -> Pixel {
        let rot_a = point.re - self.center.re;
        let rot_b = point.im - self.center.im;
        let (sin, cos) = self.rotation.sin_cos();
        let a = cos * rot_a + sin * rot_b;
        let b = -sin * rot_a + cos * rot_b;
        let x = a / self.scale + f64::from(self.width.saturating_sub(1)) / 2.0;
        let y = -b / self.scale + f64::from(self.height.saturating_sub(1)) / 2.0;
        Pixel(x.round() as i64, y.round() as i64)
    }

    /// The four corners of the image, as pixels, in the order
    /// upper-left, lower-left, upper-right, lower-right.
    pub fn corners(&self) -> [Pixel; 4] {
        let right = i64::from(self.width) - 1;
        let bottom = i64::from(self.height) - 1;
        [
            Pixel(0, 0),
            Pixel(0, bottom),
            Pixel(right, 0),
            Pixel(right, bottom),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::distributions::{Distribution, Uniform};
    use std::f64::consts::PI;

    fn viewport(scale: f64, rotation: f64, width: u32, height: u32) -> Viewport {
        Viewport::new(Complex::new(-0.5, 0.25), scale, rotation, width, height).unwrap()
    }

    #[test]
    fn viewport_fails_on_bad_scale() {
        assert!(Viewport::new(Complex::new(0.0, 0.0), 0.0, 0.0, 4, 4).is_err());
        assert!(Viewport::new(Complex::new(0.0, 0.0), -1.0, 0.0, 4, 4).is_err());
        assert!(Viewport::new(Complex::new(0.0, 0.0), std::f64::NAN, 0.0, 4, 4).is_err());
    }

    #[test]
    fn viewport_fails_on_empty_image() {
        assert!(Viewport::new(Complex::new(0.0, 0.0), 1.0, 0.0, 0, 4).is_err());
        assert!(Viewport::new(Complex::new(0.0, 0.0), 1.0, 0.0, 4, 0).is_err());
    }

    #[test]
    fn accessors_report_the_constructed_view() {
        let vp = Viewport::new(Complex::new(-0.5, 0.25), 0.01, 1.5, 40, 30).unwrap();
        assert_eq!(vp.center(), Complex::new(-0.5, 0.25));
        assert_eq!(vp.scale(), 0.01);
        assert_eq!(vp.rotation(), 1.5);
        assert_eq!((vp.width(), vp.height()), (40, 30));
    }

    #[test]
    fn rescaling_keeps_the_center_and_size() {
        let vp = viewport(0.01, 0.0, 8, 6);
        let zoomed = vp.with_scale_rotation(0.001, 0.5);
        assert_eq!(zoomed.scale(), 0.001);
        assert_eq!(zoomed.rotation(), 0.5);
        assert_eq!(zoomed.center(), vp.center());
        assert_eq!((zoomed.width(), zoomed.height()), (8, 6));
    }

    #[test]
    fn single_pixel_images_map_to_their_center() {
        let vp = Viewport::new(Complex::new(0.3, -0.2), 0.5, 0.9, 1, 1).unwrap();
        assert_eq!(vp.pixel_to_point(Pixel(0, 0)), Complex::new(0.3, -0.2));
        assert_eq!(vp.point_to_pixel(Complex::new(0.3, -0.2)), Pixel(0, 0));
    }

    #[test]
    fn center_pixel_maps_to_center_point() {
        let vp = Viewport::new(Complex::new(0.0, 0.0), 1.0, 0.0, 5, 5).unwrap();
        assert_eq!(vp.pixel_to_point(Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(vp.pixel_to_point(Pixel(0, 0)), Complex::new(-2.0, 2.0));
        assert_eq!(vp.pixel_to_point(Pixel(4, 4)), Complex::new(2.0, -2.0));
    }

    #[test]
    fn even_sized_images_center_between_pixels() {
        let vp = Viewport::new(Complex::new(0.0, 0.0), 1.0, 0.0, 4, 2).unwrap();
        assert_eq!(vp.pixel_to_point(Pixel(0, 0)), Complex::new(-1.5, 0.5));
        assert_eq!(vp.pixel_to_point(Pixel(3, 1)), Complex::new(1.5, -0.5));
    }

    #[test]
    fn rotation_turns_counter_clockwise() {
        let vp = Viewport::new(Complex::new(1.0, 1.0), 1.0, PI / 2.0, 3, 3).unwrap();
        // The pixel right of center ends up above center.
        let point = vp.pixel_to_point(Pixel(2, 1));
        assert!((point.re - 1.0).abs() < 1e-12);
        assert!((point.im - 2.0).abs() < 1e-12);
    }

    #[test]
    fn point_to_pixel_inverts_pixel_to_point() {
        let vp = viewport(0.003, 0.7, 64, 48);
        for x in 0..64 {
            for y in 0..48 {
                let pixel = Pixel(x, y);
                assert_eq!(vp.point_to_pixel(vp.pixel_to_point(pixel)), pixel);
            }
        }
    }

    #[test]
    fn round_trip_holds_for_random_viewports() {
        let mut rng = rand::thread_rng();
        let scales = Uniform::new(1e-12_f64, 1.0);
        let angles = Uniform::new(-4.0 * PI, 4.0 * PI);
        let sizes = Uniform::new_inclusive(1_u32, 300);
        for _ in 0..200 {
            let width = sizes.sample(&mut rng);
            let height = sizes.sample(&mut rng);
            let vp = viewport(scales.sample(&mut rng), angles.sample(&mut rng), width, height);
            let x = Uniform::new(0, i64::from(width)).sample(&mut rng);
            let y = Uniform::new(0, i64::from(height)).sample(&mut rng);
            let back = vp.point_to_pixel(vp.pixel_to_point(Pixel(x, y)));
            assert!((back.0 - x).abs() <= 1, "{:?} -> {:?}", (x, y), back);
            assert!((back.1 - y).abs() <= 1, "{:?} -> {:?}", (x, y), back);
        }
    }

    #[test]
    fn resolve_of_offset_is_pixel_to_point() {
        let vp = viewport(0.01, 1.3, 10, 10);
        let (a, b) = vp.pixel_offset(3, 7);
        assert_eq!(vp.resolve(a, b), vp.pixel_to_point(Pixel(3, 7)));
    }

    #[test]
    fn corners_are_inside_the_image() {
        let vp = viewport(1.0, 0.0, 4, 3);
        assert_eq!(
            vp.corners(),
            [Pixel(0, 0), Pixel(0, 2), Pixel(3, 0), Pixel(3, 2)]
        );
    }
}
