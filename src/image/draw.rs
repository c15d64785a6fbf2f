//! Drawing primitives for visualizing landmarks.

use std::convert::Infallible;

use embedded_graphics::{
    draw_target::DrawTarget,
    pixelcolor::{raw::RawU24, PixelColor},
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
};

use crate::image::Image;

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub(crate) [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);
    pub const WHITE: Color = Color([255, 255, 255]);
    pub const RED: Color = Color([255, 0, 0]);
    pub const GREEN: Color = Color([0, 255, 0]);
    pub const BLUE: Color = Color([0, 0, 255]);

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }
}

impl PixelColor for Color {
    type Raw = RawU24;
}

/// Adapter to draw into an [`Image`] with `embedded-graphics`.
///
/// Out-of-bounds pixels are discarded.
struct Target<'a>(&'a mut Image);

impl Dimensions for Target<'_> {
    fn bounding_box(&self) -> Rectangle {
        Rectangle::new(
            Point::zero(),
            Size::new(self.0.width(), self.0.height()),
        )
    }
}

impl DrawTarget for Target<'_> {
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let width = self.0.width() as i32;
        let height = self.0.height() as i32;
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 || point.x >= width || point.y >= height {
                continue;
            }
            self.0
                .buf
                .put_pixel(point.x as u32, point.y as u32, image::Rgb(color.0));
        }
        Ok(())
    }
}

/// Guard returned by [`line`][line()]; draws the line when dropped and allows customization.
pub struct DrawLine<'a> {
    image: &'a mut Image,
    start: (f32, f32),
    end: (f32, f32),
    color: Color,
    stroke_width: u32,
}

impl DrawLine<'_> {
    /// Sets the line's color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Sets the line's stroke width.
    ///
    /// By default, a stroke width of 1 is used.
    pub fn stroke_width(&mut self, width: u32) -> &mut Self {
        self.stroke_width = width;
        self
    }
}

impl Drop for DrawLine<'_> {
    fn drop(&mut self) {
        let start = Point::new(self.start.0.round() as i32, self.start.1.round() as i32);
        let end = Point::new(self.end.0.round() as i32, self.end.1.round() as i32);
        match Line::new(start, end)
            .into_styled(PrimitiveStyle::with_stroke(self.color, self.stroke_width))
            .draw(&mut Target(&mut *self.image))
        {
            Ok(_) => {}
            Err(infallible) => match infallible {},
        }
    }
}

/// Guard returned by [`marker`]; draws the marker when dropped and allows customization.
pub struct DrawMarker<'a> {
    image: &'a mut Image,
    x: i32,
    y: i32,
    color: Color,
    size: u32,
}

impl DrawMarker<'_> {
    /// Sets the marker's color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Sets the width and height of the marker.
    ///
    /// The default size is 5. The size must be *uneven* and *non-zero*. A size of 1 will result
    /// in a single pixel getting drawn.
    pub fn size(&mut self, size: u32) -> &mut Self {
        assert!(size != 0, "marker size must be greater than zero");
        assert!(size % 2 == 1, "marker size must be an uneven number");
        self.size = size;
        self
    }
}

impl Drop for DrawMarker<'_> {
    fn drop(&mut self) {
        let offset = ((self.size - 1) / 2) as i32;
        let pixels = (-offset..=offset)
            .zip(-offset..=offset)
            .chain((-offset..=offset).rev().zip(-offset..=offset))
            .map(|(xoff, yoff)| {
                Pixel(
                    Point {
                        x: self.x + xoff,
                        y: self.y + yoff,
                    },
                    self.color,
                )
            });
        match Target(&mut *self.image).draw_iter(pixels) {
            Ok(_) => {}
            Err(infallible) => match infallible {},
        }
    }
}

/// Draws a line between two points.
pub fn line(image: &mut Image, start: (f32, f32), end: (f32, f32)) -> DrawLine<'_> {
    DrawLine {
        image,
        start,
        end,
        color: Color::WHITE,
        stroke_width: 1,
    }
}

/// Draws an X-shaped marker centered on a point.
pub fn marker(image: &mut Image, pos: (f32, f32)) -> DrawMarker<'_> {
    DrawMarker {
        image,
        x: pos.0.round() as i32,
        y: pos.1.round() as i32,
        color: Color::RED,
        size: 5,
    }
}
