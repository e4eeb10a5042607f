//! Single-line text shaping and glyph rasterization over cosmic-text.
//!
//! The font system, raster cache, and key mapping live in one
//! process-global engine; folio builds UI from exactly one thread, but the
//! renderer may sit on another, so the engine is behind a mutex. Downstream
//! crates only ever see [`GlyphKey`] and owned bitmaps, keeping cosmic-text
//! an implementation detail of this crate.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use ahash::AHasher;
use cosmic_text::{Attrs, Buffer, CacheKey, FontSystem, Metrics, Shaping, SwashCache, SwashContent};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;

/// Compact, stable atlas key for a shaped glyph at a given position/size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GlyphKey(pub u64);

/// One positioned glyph of a shaped line, relative to baseline y = 0.
pub struct ShapedGlyph {
    pub key: GlyphKey,
    pub x: f32,
    /// Baseline y of the glyph's line.
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub bearing_x: f32,
    pub bearing_y: f32,
    pub advance: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitmapFormat {
    /// 8-bit alpha coverage.
    Mask,
    /// RGBA8 (color emoji and friends).
    Color,
}

pub struct GlyphBitmap {
    pub key: GlyphKey,
    pub w: u32,
    pub h: u32,
    pub format: BitmapFormat,
    /// Mask: one byte per pixel. Color: four bytes per pixel.
    pub data: Vec<u8>,
}

struct Engine {
    fs: FontSystem,
    cache: SwashCache,
    // Compact atlas key -> full cosmic-text cache key.
    key_map: HashMap<GlyphKey, CacheKey>,
}

impl Engine {
    fn get_image(&mut self, key: CacheKey) -> Option<cosmic_text::SwashImage> {
        self.cache.get_image(&mut self.fs, key).clone()
    }
}

static ENGINE: OnceCell<Mutex<Engine>> = OnceCell::new();

fn engine() -> &'static Mutex<Engine> {
    ENGINE.get_or_init(|| {
        Mutex::new(Engine {
            fs: FontSystem::new(),
            cache: SwashCache::new(),
            key_map: HashMap::new(),
        })
    })
}

fn key_from_cachekey(k: &CacheKey) -> GlyphKey {
    let mut h = AHasher::default();
    k.hash(&mut h);
    GlyphKey(h.finish())
}

fn shaped_buffer(fs: &mut FontSystem, text: &str, px: f32) -> Buffer {
    let mut buf = Buffer::new(fs, Metrics::new(px, px * 1.3));
    {
        let mut b = buf.borrow_with(fs);
        b.set_size(None, None);
        b.set_text(text, &Attrs::new(), Shaping::Advanced, None);
        b.shape_until_scroll(true);
    }
    buf
}

/// Shape a single line (no wrapping). Registers every glyph in the key map
/// so [`rasterize`] can resolve it later.
pub fn shape_line(text: &str, px: f32) -> Vec<ShapedGlyph> {
    let mut eng = engine().lock();
    let buf = shaped_buffer(&mut eng.fs, text, px);

    let mut out = Vec::new();
    for run in buf.layout_runs() {
        for g in run.glyphs {
            let phys = g.physical((0.0, run.line_y), 1.0);
            let key = key_from_cachekey(&phys.cache_key);
            eng.key_map.insert(key, phys.cache_key);

            let img = eng.get_image(phys.cache_key);
            let (w, h, left, top) = match img.as_ref() {
                Some(img) => (
                    img.placement.width as f32,
                    img.placement.height as f32,
                    img.placement.left as f32,
                    img.placement.top as f32,
                ),
                None => (0.0, 0.0, 0.0, 0.0),
            };

            out.push(ShapedGlyph {
                key,
                x: g.x + g.x_offset,
                y: run.line_y,
                w,
                h,
                bearing_x: left,
                bearing_y: top,
                advance: g.w,
            });
        }
    }
    out
}

/// Advance width of a single shaped line, for alignment and centering.
pub fn measure_line(text: &str, px: f32) -> f32 {
    if text.is_empty() {
        return 0.0;
    }
    let mut eng = engine().lock();
    let buf = shaped_buffer(&mut eng.fs, text, px);
    let mut width = 0.0f32;
    for run in buf.layout_runs() {
        for g in run.glyphs {
            width = width.max(g.x + g.w);
        }
    }
    width
}

/// Rasterize a previously shaped glyph to an owned bitmap. Returns None for
/// keys never seen by [`shape_line`] or glyphs with no image (spaces).
pub fn rasterize(key: GlyphKey) -> Option<GlyphBitmap> {
    let mut eng = engine().lock();
    let &ck = eng.key_map.get(&key)?;
    let img = eng.get_image(ck)?;
    let format = match img.content {
        SwashContent::Mask => BitmapFormat::Mask,
        SwashContent::Color | SwashContent::SubpixelMask => BitmapFormat::Color,
    };
    Some(GlyphBitmap {
        key,
        w: img.placement.width,
        h: img.placement.height,
        format,
        data: img.data,
    })
}
