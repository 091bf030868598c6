/// Terminal output for rendered images
use crossterm::{
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal, QueueableCommand,
};
use std::io::{self, Write};
use wf3d_core::{Color, Image};

/// Upper half block: foreground paints the top pixel, background the bottom
const HALF_BLOCK: char = '\u{2580}';

/// Fallback when the terminal size cannot be queried
const DEFAULT_TERMINAL_SIZE: (u16, u16) = (80, 24);

/// Draws an image as 24-bit colored half-block cells, two pixel rows per
/// text row, scaled down to fit the given cell grid
pub struct TerminalRenderer {
    columns: usize,
    rows: usize,
}

impl TerminalRenderer {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
        }
    }

    /// Size to the current terminal, leaving one row for the prompt
    pub fn for_terminal() -> Self {
        let (columns, rows) = terminal::size().unwrap_or(DEFAULT_TERMINAL_SIZE);
        Self::new(columns as usize, (rows as usize).saturating_sub(1))
    }

    /// Cell grid used for an image, keeping its aspect ratio and never
    /// scaling up
    pub fn layout(&self, image: &Image) -> (usize, usize) {
        let (w, h) = (image.width(), image.height());
        if w == 0 || h == 0 {
            return (0, 0);
        }

        let columns = w.min(self.columns);
        let rows = (h * columns).div_ceil(2 * w);
        if rows <= self.rows {
            return (columns, rows.max(1));
        }
        let rows = self.rows.min(h.div_ceil(2));
        ((w * 2 * rows / h).max(1), rows)
    }

    pub fn draw<W: Write>(&self, image: &Image, writer: &mut W) -> io::Result<()> {
        let (columns, rows) = self.layout(image);
        let pixel_rows = 2 * rows;
        let stored: Vec<&[Color]> = image.rows().collect();

        // nearest stored pixel for a cell position
        let sample = |column: usize, pixel_row: usize| -> Option<Color> {
            let x = column * image.width() / columns;
            let y = pixel_row * image.height() / pixel_rows;
            stored.get(y).map(|row| row[x])
        };

        for row in 0..rows {
            for column in 0..columns {
                let top = sample(column, 2 * row).unwrap_or(image.background());
                let bottom = sample(column, 2 * row + 1).unwrap_or(image.background());
                writer.queue(SetForegroundColor(term_color(top)))?;
                writer.queue(SetBackgroundColor(term_color(bottom)))?;
                writer.queue(Print(HALF_BLOCK))?;
            }
            writer.queue(ResetColor)?;
            writer.queue(Print('\n'))?;
        }
        writer.flush()
    }
}

fn term_color(c: Color) -> TermColor {
    TermColor::Rgb { r: c.r, g: c.g, b: c.b }
}
