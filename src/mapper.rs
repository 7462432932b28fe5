//! Per-pixel palette substitution.
//!
//! Every pixel color is looked up in the source palette to find its role,
//! and replaced by the target palette's color for that role. Colors that are
//! not in the source palette abort the whole operation.

use std::collections::HashMap;

use image::{DynamicImage, ImageBuffer, RgbImage};
use rayon::prelude::*;
use tracing::debug;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::role::ColorRole;
use crate::store::Palette;

/// An addressable 2D image the mapper can read from and write to.
pub trait Canvas {
    /// `(width, height)` in pixels.
    fn dimensions(&self) -> (u32, u32);
    fn color_at(&self, x: u32, y: u32) -> Color;
    fn set_color(&mut self, x: u32, y: u32, color: Color);
    /// A new canvas of the given size; initial contents are unspecified.
    fn blank(width: u32, height: u32) -> Self
    where
        Self: Sized;
}

impl Canvas for RgbImage {
    fn dimensions(&self) -> (u32, u32) {
        ImageBuffer::dimensions(self)
    }

    fn color_at(&self, x: u32, y: u32) -> Color {
        Color::from(*self.get_pixel(x, y))
    }

    fn set_color(&mut self, x: u32, y: u32, color: Color) {
        self.put_pixel(x, y, color.into());
    }

    fn blank(width: u32, height: u32) -> Self {
        RgbImage::new(width, height)
    }
}

/// A color at an image-local position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub x: u32,
    pub y: u32,
    pub color: Color,
}

/// Every coordinate of a `width` x `height` grid, row-major.
pub fn pixels(width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
}

/// Every pixel of `canvas`, row-major.
pub fn read_pixels<C: Canvas>(canvas: &C) -> impl Iterator<Item = Pixel> + '_ {
    let (width, height) = canvas.dimensions();
    pixels(width, height).map(move |(x, y)| Pixel {
        x,
        y,
        color: canvas.color_at(x, y),
    })
}

/// Find the role `color` occupies in `palette`.
///
/// Ties go to the first role in canonical order.
pub fn resolve_role(color: Color, palette: &Palette) -> Result<ColorRole> {
    palette.role_of(color).ok_or(Error::UnmappableColor {
        color,
        position: None,
    })
}

/// Translate `color` from `source` to `target` through its role.
pub fn map_color(color: Color, source: &Palette, target: &Palette) -> Result<Color> {
    resolve_role(color, source).map(|role| target[role])
}

/// Recolors images drawn with a fixed source palette.
///
/// Holds the source palette for its whole lifetime together with a reverse
/// lookup table built once at construction.
#[derive(Debug, Clone)]
pub struct Recolorer {
    source: Palette,
    roles: HashMap<Color, ColorRole>,
}

impl Recolorer {
    pub fn new(source: Palette) -> Self {
        let mut roles = HashMap::with_capacity(ColorRole::COUNT);
        for (role, color) in source.iter() {
            roles.entry(color).or_insert(role);
        }
        Self { source, roles }
    }

    pub fn source(&self) -> &Palette {
        &self.source
    }

    /// Same result as [`resolve_role`] against the source palette.
    pub fn resolve_role(&self, color: Color) -> Result<ColorRole> {
        self.roles
            .get(&color)
            .copied()
            .ok_or(Error::UnmappableColor {
                color,
                position: None,
            })
    }

    pub fn map_color(&self, color: Color, target: &Palette) -> Result<Color> {
        self.resolve_role(color).map(|role| target[role])
    }

    /// Recolor `image` into a new canvas of the same size.
    pub fn colorize<C: Canvas>(&self, image: &C, target: &Palette) -> Result<C> {
        let (width, height) = image.dimensions();
        debug!(width, height, "colorizing canvas");
        let mut out = C::blank(width, height);
        for pixel in read_pixels(image) {
            let color = self
                .map_color(pixel.color, target)
                .map_err(|e| e.at(pixel.x, pixel.y))?;
            out.set_color(pixel.x, pixel.y, color);
        }
        Ok(out)
    }

    /// Recolor `image` in place. On error the image is left untouched.
    pub fn colorize_in_place<C: Canvas>(&self, image: &mut C, target: &Palette) -> Result<()> {
        let mapped = read_pixels(&*image)
            .map(|pixel| {
                self.map_color(pixel.color, target)
                    .map(|color| Pixel { color, ..pixel })
                    .map_err(|e| e.at(pixel.x, pixel.y))
            })
            .collect::<Result<Vec<_>>>()?;
        for pixel in mapped {
            image.set_color(pixel.x, pixel.y, pixel.color);
        }
        Ok(())
    }

    /// Recolor an RGB image, one row per rayon task.
    ///
    /// The first unmappable pixel found stops the remaining rows.
    pub fn colorize_rgb(&self, image: &RgbImage, target: &Palette) -> Result<RgbImage> {
        let (width, height) = image.dimensions();
        debug!(width, height, "colorizing rgb image");
        let mut out = RgbImage::new(width, height);
        let row_len = width as usize * 3;
        if row_len == 0 {
            return Ok(out);
        }

        out.par_chunks_mut(row_len)
            .zip(image.par_chunks(row_len))
            .enumerate()
            .try_for_each(|(y, (dst, src))| -> Result<()> {
                for (x, (d, s)) in dst.chunks_exact_mut(3).zip(src.chunks_exact(3)).enumerate() {
                    let color = self
                        .map_color(Color::new(s[0], s[1], s[2]), target)
                        .map_err(|e| e.at(x as u32, y as u32))?;
                    d.copy_from_slice(&[color.r, color.g, color.b]);
                }
                Ok(())
            })?;
        Ok(out)
    }

    /// Recolor any decoded image. Channels are normalized to RGB8 first, so
    /// alpha is dropped before matching.
    pub fn colorize_image(&self, image: &DynamicImage, target: &Palette) -> Result<RgbImage> {
        self.colorize_rgb(&image.to_rgb8(), target)
    }
}
