//! Flattened gradient format
//!
//! # Layout (little-endian)
//!
//! ```text
//! u32       flags
//! u32       color count N
//! f32 x 4N  colors (r, g, b, a)
//! [space]   source color space          if HAS_COLOR_SPACE
//! [space]   interpolation color space   if HAS_INTERPOLATION_SPACE
//! f32 x N   positions                   if HAS_POSITIONS
//! ```
//!
//! A color space is 8 f32 chromaticities, a u32 transfer tag and an f32
//! transfer parameter.
//!
//! # Flags
//!
//! | Bits  | Meaning                                 |
//! |-------|-----------------------------------------|
//! | 31    | positions present                       |
//! | 29    | source color space present              |
//! | 28    | interpolation color space present       |
//! | 8..12 | tile mode                               |
//! | 0..8  | gradient flags, bit 0 = premul interp   |

use crate::color::{Color4f, ColorSpace, Primaries};
use crate::gradient::{normalize_stops, GradientSpec, Interpolation, TileMode};
use crate::math::TransferFn;
use crate::{Error, Result};

const HAS_POSITIONS: u32 = 1 << 31;
const HAS_COLOR_SPACE: u32 = 1 << 29;
const HAS_INTERPOLATION_SPACE: u32 = 1 << 28;
const TILE_MODE_SHIFT: u32 = 8;
const TILE_MODE_MASK: u32 = 0xF;
const GRAD_FLAGS_MASK: u32 = 0xFF;
const INTERPOLATE_IN_PREMUL: u32 = 1 << 0;

impl GradientSpec {
    /// Serialize to the flattened byte format
    pub fn flatten(&self) -> Vec<u8> {
        let mut w = Writer::default();

        let mut flags = self.tile_mode().to_u32() << TILE_MODE_SHIFT;
        if self.interpolate_in_premul() {
            flags |= INTERPOLATE_IN_PREMUL;
        }
        if self.positions().is_some() {
            flags |= HAS_POSITIONS;
        }
        if *self.color_space() != ColorSpace::srgb() {
            flags |= HAS_COLOR_SPACE;
        }
        if self.interpolation().color_space.is_some() {
            flags |= HAS_INTERPOLATION_SPACE;
        }
        w.u32(flags);

        w.u32(self.color_count() as u32);
        for c in self.colors() {
            for v in c.to_array() {
                w.f32(v);
            }
        }
        if flags & HAS_COLOR_SPACE != 0 {
            w.color_space(self.color_space());
        }
        if let Some(cs) = &self.interpolation().color_space {
            w.color_space(cs);
        }
        if let Some(positions) = self.positions() {
            for &p in positions {
                w.f32(p);
            }
        }
        w.buf
    }

    /// Rebuild a spec from [`flatten`](Self::flatten) output
    ///
    /// The stops go through normalization again, so hand-crafted input obeys
    /// the same invariants as a freshly made gradient.
    pub fn unflatten(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);

        let flags = r.u32()?;
        let tile_mode = TileMode::try_from((flags >> TILE_MODE_SHIFT) & TILE_MODE_MASK)?;
        let grad_flags = flags & GRAD_FLAGS_MASK;

        let count = r.u32()? as usize;
        if count == 0 {
            return Err(Error::Deserialize("gradient has no colors".to_string()));
        }
        // Each color takes 16 bytes; reject counts the buffer cannot hold
        // before allocating.
        if count > r.remaining() / 16 {
            return Err(Error::Deserialize(format!(
                "color count {count} exceeds data length"
            )));
        }
        let mut colors = Vec::with_capacity(count);
        for _ in 0..count {
            colors.push(Color4f::new(r.f32()?, r.f32()?, r.f32()?, r.f32()?));
        }

        let color_space = if flags & HAS_COLOR_SPACE != 0 {
            r.color_space()?
        } else {
            ColorSpace::srgb()
        };
        let interpolation = Interpolation {
            in_premul: grad_flags & INTERPOLATE_IN_PREMUL != 0,
            color_space: if flags & HAS_INTERPOLATION_SPACE != 0 {
                Some(r.color_space()?)
            } else {
                None
            },
        };

        let positions = if flags & HAS_POSITIONS != 0 {
            let mut p = Vec::with_capacity(count);
            for _ in 0..count {
                p.push(r.f32()?);
            }
            Some(p)
        } else {
            None
        };

        if r.remaining() != 0 {
            return Err(Error::Deserialize(format!(
                "{} trailing bytes",
                r.remaining()
            )));
        }

        let stops = normalize_stops(&colors, positions.as_deref(), tile_mode)?;
        Ok(GradientSpec::from_normalized(
            stops.colors,
            stops.positions,
            tile_mode,
            interpolation,
            color_space,
        ))
    }
}

#[derive(Default)]
struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn f32(&mut self, v: f32) {
        self.u32(v.to_bits());
    }

    fn color_space(&mut self, cs: &ColorSpace) {
        for v in cs.primaries.to_array() {
            self.f32(v);
        }
        self.u32(cs.transfer.tag());
        self.f32(cs.transfer.param());
    }
}

struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn u32(&mut self) -> Result<u32> {
        let end = self.offset + 4;
        if end > self.data.len() {
            return Err(Error::Deserialize(format!(
                "truncated at byte {} of {}",
                self.offset,
                self.data.len()
            )));
        }
        let d = &self.data[self.offset..end];
        self.offset = end;
        Ok(u32::from_le_bytes([d[0], d[1], d[2], d[3]]))
    }

    fn f32(&mut self) -> Result<f32> {
        self.u32().map(f32::from_bits)
    }

    fn color_space(&mut self) -> Result<ColorSpace> {
        let mut p = [0.0f32; 8];
        for v in &mut p {
            *v = self.f32()?;
        }
        let tag = self.u32()?;
        let param = self.f32()?;
        let transfer = TransferFn::from_tag(tag, param)
            .ok_or_else(|| Error::Deserialize(format!("unknown transfer function tag {tag}")))?;
        Ok(ColorSpace::new(Primaries::from_array(p), transfer))
    }
}
