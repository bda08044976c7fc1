//! Turns a card line such as `-AS-KD-` into one picture of the cards laid
//! side by side.
//!
//! A card line starts and ends with [`DELIMITER`]; every delimiter position
//! in it is a boundary and the text between two neighbouring boundaries is
//! a card token. Only the first card line of a reply is rendered. It is
//! removed from the text and replaced by the image.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::PathBuf;

use image::{imageops, DynamicImage, ImageFormat, RgbaImage};
use thiserror::Error;

pub const DELIMITER: char = '-';

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no card image for '{0}'")]
    MissingAsset(String),
    #[error("cannot decode card image '{id}': {source}")]
    Decode {
        id: String,
        source: image::ImageError,
    },
    #[error("cannot encode hand image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Where card pictures come from, by asset id (`AS.png`).
pub trait AssetSource {
    fn load(&self, id: &str) -> Result<RgbaImage, RenderError>;
}

impl<A: AssetSource + ?Sized> AssetSource for Box<A> {
    fn load(&self, id: &str) -> Result<RgbaImage, RenderError> {
        (**self).load(id)
    }
}

/// Card pictures stored as files in one directory.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirAssets {
    fn load(&self, id: &str) -> Result<RgbaImage, RenderError> {
        let path = self.root.join(id);
        if !path.is_file() {
            return Err(RenderError::MissingAsset(id.to_string()));
        }
        let img = image::open(&path).map_err(|source| RenderError::Decode {
            id: id.to_string(),
            source,
        })?;
        Ok(img.to_rgba8())
    }
}

impl AssetSource for HashMap<String, RgbaImage> {
    fn load(&self, id: &str) -> Result<RgbaImage, RenderError> {
        self.get(id)
            .cloned()
            .ok_or_else(|| RenderError::MissingAsset(id.to_string()))
    }
}

pub fn asset_id(token: &str) -> String {
    format!("{token}.png")
}

fn is_card_line(line: &str) -> bool {
    line.len() > 1 && line.starts_with(DELIMITER) && line.ends_with(DELIMITER)
}

/// Index and tokens of the first card line in `lines`.
pub fn find_card_line(lines: &[String]) -> Option<(usize, Vec<String>)> {
    let index = lines.iter().position(|l| is_card_line(l))?;
    let line = &lines[index];
    let bounds: Vec<usize> = line.match_indices(DELIMITER).map(|(i, _)| i).collect();
    let tokens = bounds
        .windows(2)
        .map(|w| line[w[0] + DELIMITER.len_utf8()..w[1]].to_string())
        .collect();
    Some((index, tokens))
}

/// Lays `images` out left to right, top-aligned. The canvas is as wide as
/// all images together and as tall as the tallest one.
pub fn compose(images: &[RgbaImage]) -> RgbaImage {
    let width = images.iter().map(RgbaImage::width).sum();
    let height = images.iter().map(RgbaImage::height).max().unwrap_or(0);
    let mut canvas = RgbaImage::new(width, height);
    let mut x = 0i64;
    for img in images {
        imageops::replace(&mut canvas, img, x, 0);
        x += i64::from(img.width());
    }
    canvas
}

/// Reply text with its card line, if any, turned into a PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub lines: Vec<String>,
    pub image: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub struct HandRenderer<A> {
    assets: A,
}

impl<A: AssetSource> HandRenderer<A> {
    pub fn new(assets: A) -> Self {
        Self { assets }
    }

    pub fn render(&self, mut lines: Vec<String>) -> Result<Rendered, RenderError> {
        let Some((index, tokens)) = find_card_line(&lines) else {
            return Ok(Rendered { lines, image: None });
        };
        let images = tokens
            .iter()
            .map(|token| self.assets.load(&asset_id(token)))
            .collect::<Result<Vec<_>, _>>()?;
        let canvas = compose(&images);
        let mut png = Vec::new();
        DynamicImage::ImageRgba8(canvas)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(RenderError::Encode)?;
        tracing::debug!(cards = tokens.len(), bytes = png.len(), "hand rendered");
        lines.remove(index);
        Ok(Rendered {
            lines,
            image: Some(png),
        })
    }
}
