//! Coordinate and bit codec for Godot tile data.
//!
//! Pure conversions between LDtk pixel coordinates and the integers that
//! make up one entry of a Godot `PackedInt32Array` tile-data array:
//!
//! - pixel position -> grid cell (floor division by the grid size)
//! - grid cell -> packed position (`gy * 65536 + gx`)
//! - LDtk flip mask -> flip flags -> high bits of the alternative value

use serde::Serialize;

/// Multiplier applied to the row (or column) half of a packed integer.
pub const PACK_STRIDE: i32 = 65536;

/// Mask of the low 16 bits that hold the alternative-tile index.
pub const ALTERNATIVE_INDEX_MASK: i32 = 0xFFFF;

/// Alternative-value bit for a horizontal flip.
pub const TRANSFORM_FLIP_H: i32 = 1 << 28;
/// Alternative-value bit for a vertical flip.
pub const TRANSFORM_FLIP_V: i32 = 1 << 29;
/// Alternative-value bit for a transpose. LDtk never sets it.
pub const TRANSFORM_TRANSPOSE: i32 = 1 << 30;

/// LDtk flip-mask bit for a horizontal flip.
pub const LDTK_FLIP_X: i64 = 0b01;
/// LDtk flip-mask bit for a vertical flip.
pub const LDTK_FLIP_Y: i64 = 0b10;

/// A pixel coordinate, either in a level or inside a tileset image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PixelPos {
    pub x: i32,
    pub y: i32,
}

impl PixelPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A tile-sized cell addressed by column and row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Sort key for Y-major ordering.
    pub fn row_major_key(&self) -> (i32, i32) {
        (self.y, self.x)
    }

    /// Whether `encode_position` can represent this cell without aliasing
    /// another cell or leaving the i32 range.
    pub fn is_encodable(&self) -> bool {
        if self.x < 0 || self.x >= PACK_STRIDE {
            return false;
        }
        let packed = (self.y as i64) * (PACK_STRIDE as i64) + (self.x as i64);
        i32::try_from(packed).is_ok()
    }
}

/// Flip flags carried by a placed tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FlipFlags {
    pub horizontal: bool,
    pub vertical: bool,
}

impl FlipFlags {
    pub const NONE: FlipFlags = FlipFlags { horizontal: false, vertical: false };

    pub fn is_flipped(&self) -> bool {
        self.horizontal || self.vertical
    }
}

/// Convert a pixel coordinate to the grid cell containing it.
///
/// Uses floor division, so negative pixels land in negative cells.
/// `grid_size` must be positive.
#[inline]
pub fn pixel_to_grid(px: PixelPos, grid_size: i32) -> GridCell {
    GridCell { x: px.x.div_euclid(grid_size), y: px.y.div_euclid(grid_size) }
}

/// Pack a grid cell into Godot's single-integer position encoding.
///
/// No overflow check is made; see [`GridCell::is_encodable`].
#[inline]
pub fn encode_position(cell: GridCell) -> i32 {
    cell.y.wrapping_mul(PACK_STRIDE).wrapping_add(cell.x)
}

/// Inverse of [`encode_position`] for cells with `0 <= x < 65536`.
#[inline]
pub fn decode_position(position: i32) -> GridCell {
    GridCell { x: position.rem_euclid(PACK_STRIDE), y: position.div_euclid(PACK_STRIDE) }
}

/// Read the flip flags out of an LDtk `f` value.
///
/// Bits other than 0 and 1 are ignored here; callers that care can check
/// [`unknown_flip_bits`].
#[inline]
pub fn extract_flip_flags(mask: i64) -> FlipFlags {
    FlipFlags { horizontal: mask & LDTK_FLIP_X != 0, vertical: mask & LDTK_FLIP_Y != 0 }
}

/// Bits of an LDtk flip mask that carry no known meaning.
#[inline]
pub fn unknown_flip_bits(mask: i64) -> i64 {
    mask & !(LDTK_FLIP_X | LDTK_FLIP_Y)
}

/// Build the alternative value: atlas row in the low 16 bits, flip flags
/// in bits 28 and 29. Negative rows are clamped to zero.
#[inline]
pub fn encode_alternative(atlas_row: i32, flip: FlipFlags) -> i32 {
    let mut value = atlas_row.max(0) & ALTERNATIVE_INDEX_MASK;
    if flip.horizontal {
        value |= TRANSFORM_FLIP_H;
    }
    if flip.vertical {
        value |= TRANSFORM_FLIP_V;
    }
    value
}
