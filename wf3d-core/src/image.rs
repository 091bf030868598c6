/// Fixed-size RGB image buffer
use std::str::FromStr;

use crate::error::{Error, Result};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Parses `r,g,b` decimal triples
impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let channels: Vec<u8> = s
            .split(',')
            .map(|c| c.trim().parse::<u8>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::InvalidImage(format!("bad color '{s}': {e}")))?;
        match channels[..] {
            [r, g, b] => Ok(Color::new(r, g, b)),
            _ => Err(Error::InvalidImage(format!(
                "bad color '{s}': expected r,g,b"
            ))),
        }
    }
}

/// Where drawing coordinate `(0, 0)` lands on the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    /// y grows upward from the bottom row
    #[default]
    BottomLeft,
    /// y grows downward from the top row
    TopLeft,
}

/// A width x height grid of colors.
///
/// Pixels are addressed in drawing coordinates, interpreted through the
/// `Origin` chosen at creation, and stored top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    background: Color,
    origin: Origin,
    pixels: Vec<Color>,
}

impl Image {
    /// Black background, bottom-left origin
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_background(width, height, Color::BLACK)
    }

    pub fn with_background(width: usize, height: usize, background: Color) -> Self {
        Self {
            width,
            height,
            background,
            origin: Origin::default(),
            pixels: vec![background; width * height],
        }
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Build from stored rows, top row first
    pub(crate) fn from_rows(width: usize, height: usize, pixels: Vec<Color>) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        Self {
            width,
            height,
            background: Color::BLACK,
            origin: Origin::default(),
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Stored pixels, top row first
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Rows as serialized, top row first
    pub fn rows(&self) -> impl Iterator<Item = &[Color]> + '_ {
        self.pixels.chunks(self.width.max(1)).take(self.height)
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        let row = match self.origin {
            Origin::BottomLeft => self.height as i64 - 1 - y,
            Origin::TopLeft => y,
        };
        Some(row as usize * self.width + x as usize)
    }

    /// Color at drawing coordinates, `None` outside the image
    pub fn get(&self, x: i64, y: i64) -> Option<Color> {
        self.offset(x, y).map(|i| self.pixels[i])
    }

    /// Set a pixel; coordinates outside the image are ignored
    pub fn set(&mut self, x: i64, y: i64, color: Color) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Reset every pixel to the background color
    pub fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    /// Number of pixels that differ from the background
    pub fn painted(&self) -> usize {
        self.pixels.iter().filter(|&&p| p != self.background).count()
    }
}
