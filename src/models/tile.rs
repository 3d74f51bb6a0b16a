//! LDtk grid-tile records.

use crate::codec::PixelPos;
use serde_json::Value;

/// One tile instance of a tile layer (`gridTiles[]` entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridTile {
    /// Top-left pixel in the level (`px`)
    pub pixel_position: PixelPos,
    /// Top-left pixel in the tileset image (`src`)
    pub source_pixel: PixelPos,
    /// Flip bits (`f`): bit 0 = X flip, bit 1 = Y flip
    pub flip_mask: i64,
}

/// Why a grid-tile record could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedTile {
    NotAnObject,
    MissingField(&'static str),
    InvalidField(&'static str),
}

impl std::fmt::Display for MalformedTile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedTile::NotAnObject => write!(f, "tile record is not an object"),
            MalformedTile::MissingField(field) => write!(f, "missing field '{}'", field),
            MalformedTile::InvalidField(field) => {
                write!(f, "field '{}' has an invalid value", field)
            }
        }
    }
}

impl GridTile {
    pub fn new(pixel_position: PixelPos, source_pixel: PixelPos, flip_mask: i64) -> Self {
        Self { pixel_position, source_pixel, flip_mask }
    }

    /// Read a tile from its raw JSON record.
    ///
    /// Layers keep their tiles as raw values so that one bad record only
    /// costs that tile, not the whole document.
    pub fn from_value(value: &Value) -> Result<GridTile, MalformedTile> {
        let obj = value.as_object().ok_or(MalformedTile::NotAnObject)?;
        let pixel_position = read_pair(obj.get("px"), "px")?;
        let source_pixel = read_pair(obj.get("src"), "src")?;
        let flip_mask = obj
            .get("f")
            .ok_or(MalformedTile::MissingField("f"))?
            .as_i64()
            .ok_or(MalformedTile::InvalidField("f"))?;
        Ok(GridTile { pixel_position, source_pixel, flip_mask })
    }
}

fn read_pair(value: Option<&Value>, field: &'static str) -> Result<PixelPos, MalformedTile> {
    let arr = value
        .ok_or(MalformedTile::MissingField(field))?
        .as_array()
        .ok_or(MalformedTile::InvalidField(field))?;
    if arr.len() != 2 {
        return Err(MalformedTile::InvalidField(field));
    }
    let coord = |v: &Value| -> Result<i32, MalformedTile> {
        v.as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or(MalformedTile::InvalidField(field))
    };
    Ok(PixelPos::new(coord(&arr[0])?, coord(&arr[1])?))
}
