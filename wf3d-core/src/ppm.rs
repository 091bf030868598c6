/// PPM image encoding and decoding
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use nom::{
    branch::alt,
    bytes::complete::{tag, take, take_till, take_while_m_n},
    character::complete::{char, multispace1, u32 as decimal},
    combinator::{value, verify},
    error::ErrorKind,
    multi::{count, many0},
    sequence::{pair, preceded},
    IResult,
};

use crate::error::{Error, Result};
use crate::image::{Color, Image};

/// Largest image the decoder will allocate for
const MAX_DECODED_PIXELS: usize = 1 << 26;

/// PPM flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PpmFormat {
    /// `P3`: ASCII samples
    #[default]
    Plain,
    /// `P6`: one raw byte per sample
    Raw,
}

impl Image {
    /// Serialize with header `P3`/`P6`, width, height and max value 255,
    /// followed by row-major RGB samples from the top row down
    pub fn write_ppm<W: Write>(&self, writer: &mut W, format: PpmFormat) -> Result<()> {
        let magic = match format {
            PpmFormat::Plain => "P3",
            PpmFormat::Raw => "P6",
        };
        write!(writer, "{}\n{} {}\n255\n", magic, self.width(), self.height())?;

        match format {
            PpmFormat::Plain => {
                for row in self.rows() {
                    let line: Vec<String> = row
                        .iter()
                        .map(|c| format!("{} {} {}", c.r, c.g, c.b))
                        .collect();
                    writeln!(writer, "{}", line.join(" "))?;
                }
            }
            PpmFormat::Raw => {
                let bytes: Vec<u8> = self.pixels().iter().flat_map(|c| [c.r, c.g, c.b]).collect();
                writer.write_all(&bytes)?;
            }
        }
        Ok(())
    }

    /// Write a plain `P3` file
    pub fn save_ppm(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save_ppm_as(path, PpmFormat::Plain)
    }

    pub fn save_ppm_as(&self, path: impl AsRef<Path>, format: PpmFormat) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_ppm(&mut writer, format)?;
        writer.flush()?;
        info!("Saved {}x{} image to {}", self.width(), self.height(), path.display());
        Ok(())
    }

    /// Decode `P3` or `P6` data. Samples are rescaled to 0-255 when the
    /// file's max value is smaller.
    pub fn from_ppm(data: &[u8]) -> Result<Image> {
        match parse_ppm(data) {
            Ok((_, image)) => Ok(image),
            Err(e) => Err(Error::InvalidImage(format!(
                "failed to parse PPM: {:?}",
                e.map(|inner| inner.code)
            ))),
        }
    }

    pub fn load_ppm(path: impl AsRef<Path>) -> Result<Image> {
        let data = fs::read(path)?;
        Self::from_ppm(&data)
    }
}

/// Whitespace and `#` comments between header fields and plain samples
fn separator(input: &[u8]) -> IResult<&[u8], ()> {
    let comment = pair(char('#'), take_till(|c| c == b'\n'));
    value((), many0(alt((value((), multispace1), value((), comment)))))(input)
}

fn field(input: &[u8]) -> IResult<&[u8], u32> {
    preceded(separator, decimal)(input)
}

fn parse_ppm(input: &[u8]) -> IResult<&[u8], Image> {
    let (input, format) = alt((
        value(PpmFormat::Plain, tag("P3")),
        value(PpmFormat::Raw, tag("P6")),
    ))(input)?;
    let (input, width) = field(input)?;
    let (input, height) = field(input)?;
    let (input, max) = verify(field, |m: &u32| (1..=255).contains(m))(input)?;

    let pixels = width as usize * height as usize;
    if pixels > MAX_DECODED_PIXELS {
        return Err(nom::Err::Failure(nom::error::Error::new(input, ErrorKind::TooLarge)));
    }

    let (input, samples): (_, Vec<u32>) = match format {
        PpmFormat::Plain => count(verify(field, |v: &u32| *v <= max), pixels * 3)(input)?,
        PpmFormat::Raw => {
            let (input, _) = take_while_m_n(1, 1, |c: u8| c.is_ascii_whitespace())(input)?;
            let in_range = |raw: &[u8]| raw.iter().all(|&v| u32::from(v) <= max);
            let (input, raw) = verify(take(pixels * 3), in_range)(input)?;
            (input, raw.iter().map(|&v| u32::from(v)).collect())
        }
    };

    let scale = |v: u32| ((v * 255 + max / 2) / max) as u8;
    let colors = samples
        .chunks_exact(3)
        .map(|rgb| Color::new(scale(rgb[0]), scale(rgb[1]), scale(rgb[2])))
        .collect();

    Ok((input, Image::from_rows(width as usize, height as usize, colors)))
}
