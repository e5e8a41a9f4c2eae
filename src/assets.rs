//! Named images, sprite sheets, remote images and font atlases.
//!
//! [`SpriteStore`] is the CPU-side registry scenes talk to. It hands out [`SpriteId`]s
//! for manifest aliases, sheet frames and remote URLs; decoded pixels wait in the
//! store until the renderer uploads them (see [`SpriteStore::take_uploads`]).

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use fontdue::{Font, FontSettings};
use glam::Vec2;
use image::RgbaImage;
use serde::Deserialize;

use crate::error::{Result, TableauError};
use crate::net::{Fetch, Job, Poll};

/// Opaque identifier for a decoded image (one GPU texture).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(pub(crate) usize);

/// Opaque identifier for a drawable region of an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpriteId(pub(crate) usize);

enum ImageSlot {
    Loading(Job<Result<RgbaImage>>),
    Ready {
        width: u32,
        height: u32,
        pixels: Option<RgbaImage>,
    },
    Failed,
}

struct SpriteEntry {
    image: ImageId,
    /// Pixel region inside the image; `None` covers the whole image.
    region: Option<[u32; 4]>,
}

/// A sprite whose image is decoded and ready to draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteFrame {
    pub image: ImageId,
    /// Normalized UV rectangle (u, v, width, height).
    pub uv: [f32; 4],
    /// Natural size in pixels.
    pub size: Vec2,
}

/// Registry of every image the application can draw.
pub struct SpriteStore {
    images: Vec<ImageSlot>,
    sprites: Vec<SpriteEntry>,
    aliases: HashMap<String, SpriteId>,
    sheets: HashMap<String, Vec<SpriteId>>,
    remote: HashMap<String, SpriteId>,
    fetch: Arc<dyn Fetch>,
}

impl SpriteStore {
    pub fn new(fetch: Arc<dyn Fetch>) -> Self {
        Self {
            images: Vec::new(),
            sprites: Vec::new(),
            aliases: HashMap::new(),
            sheets: HashMap::new(),
            remote: HashMap::new(),
            fetch,
        }
    }

    fn push_ready(&mut self, pixels: RgbaImage) -> ImageId {
        let (width, height) = pixels.dimensions();
        let id = ImageId(self.images.len());
        self.images.push(ImageSlot::Ready {
            width,
            height,
            pixels: Some(pixels),
        });
        id
    }

    fn push_sprite(&mut self, image: ImageId, region: Option<[u32; 4]>) -> SpriteId {
        let id = SpriteId(self.sprites.len());
        self.sprites.push(SpriteEntry { image, region });
        id
    }

    /// Register a whole image under `alias`.
    pub fn insert_image(&mut self, alias: &str, pixels: RgbaImage) -> SpriteId {
        let image = self.push_ready(pixels);
        let sprite = self.push_sprite(image, None);
        self.aliases.insert(alias.to_string(), sprite);
        sprite
    }

    /// Register a sprite sheet under `alias`. Frames keep the order given.
    pub fn insert_sheet(
        &mut self,
        alias: &str,
        pixels: RgbaImage,
        frames: impl IntoIterator<Item = [u32; 4]>,
    ) -> &[SpriteId] {
        let image = self.push_ready(pixels);
        let ids: Vec<SpriteId> = frames
            .into_iter()
            .map(|region| self.push_sprite(image, Some(region)))
            .collect();
        self.sheets.insert(alias.to_string(), ids);
        &self.sheets[alias]
    }

    /// Sprite registered under `alias`, if any.
    pub fn get(&self, alias: &str) -> Option<SpriteId> {
        self.aliases.get(alias).copied()
    }

    /// Frames of the sheet registered under `alias`.
    pub fn sheet(&self, alias: &str) -> Result<&[SpriteId]> {
        self.sheets
            .get(alias)
            .map(Vec::as_slice)
            .ok_or_else(|| TableauError::missing_asset(alias))
    }

    /// Sprite for a remote image, fetched and decoded in the background.
    ///
    /// Repeated requests for the same URL share one sprite.
    pub fn request_url(&mut self, url: &str) -> SpriteId {
        if let Some(id) = self.remote.get(url) {
            return *id;
        }

        let fetch = Arc::clone(&self.fetch);
        let owned = url.to_string();
        let job = Job::spawn(move || {
            let bytes = fetch.get(&owned)?;
            Ok(image::load_from_memory(&bytes)?.to_rgba8())
        });

        let image = ImageId(self.images.len());
        self.images.push(ImageSlot::Loading(job));
        let sprite = self.push_sprite(image, None);
        self.remote.insert(url.to_string(), sprite);
        tracing::debug!(url, "requested remote image");
        sprite
    }

    /// Collect finished background loads.
    pub fn pump(&mut self) {
        for (index, slot) in self.images.iter_mut().enumerate() {
            let ImageSlot::Loading(job) = slot else {
                continue;
            };
            match job.poll() {
                Poll::Pending => {}
                Poll::Ready(Ok(pixels)) => {
                    let (width, height) = pixels.dimensions();
                    tracing::debug!(image = index, width, height, "remote image decoded");
                    *slot = ImageSlot::Ready {
                        width,
                        height,
                        pixels: Some(pixels),
                    };
                }
                Poll::Ready(Err(err)) => {
                    tracing::error!(image = index, error = %err, "remote image failed");
                    *slot = ImageSlot::Failed;
                }
                Poll::Abandoned => {
                    tracing::error!(image = index, "remote image worker vanished");
                    *slot = ImageSlot::Failed;
                }
            }
        }
    }

    /// Decoded pixels not yet handed to the renderer.
    pub fn take_uploads(&mut self) -> Vec<(ImageId, RgbaImage)> {
        let mut uploads = Vec::new();
        for (index, slot) in self.images.iter_mut().enumerate() {
            if let ImageSlot::Ready { pixels, .. } = slot {
                if let Some(pixels) = pixels.take() {
                    uploads.push((ImageId(index), pixels));
                }
            }
        }
        uploads
    }

    pub fn is_ready(&self, sprite: SpriteId) -> bool {
        self.frame(sprite).is_some()
    }

    pub fn is_failed(&self, sprite: SpriteId) -> bool {
        self.sprites
            .get(sprite.0)
            .and_then(|entry| self.images.get(entry.image.0))
            .is_some_and(|slot| matches!(slot, ImageSlot::Failed))
    }

    /// Geometry of a sprite whose image is decoded.
    pub fn frame(&self, sprite: SpriteId) -> Option<SpriteFrame> {
        let entry = self.sprites.get(sprite.0)?;
        let ImageSlot::Ready { width, height, .. } = self.images.get(entry.image.0)? else {
            return None;
        };
        let (w, h) = (*width as f32, *height as f32);
        let [x, y, rw, rh] = entry.region.unwrap_or([0, 0, *width, *height]);
        Some(SpriteFrame {
            image: entry.image,
            uv: [x as f32 / w, y as f32 / h, rw as f32 / w, rh as f32 / h],
            size: Vec2::new(rw as f32, rh as f32),
        })
    }
}

#[derive(Deserialize)]
struct SheetFile {
    frames: BTreeMap<String, SheetFrame>,
    meta: SheetMeta,
}

#[derive(Deserialize)]
struct SheetFrame {
    frame: SheetRect,
}

#[derive(Deserialize)]
struct SheetRect {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

#[derive(Deserialize)]
struct SheetMeta {
    image: String,
}

/// Parse a TexturePacker hash-style sheet. Returns the image file name and the frame
/// regions, ordered by frame name.
pub fn parse_sheet(json: &str) -> Result<(String, Vec<[u32; 4]>)> {
    let sheet: SheetFile = serde_json::from_str(json)?;
    let frames = sheet
        .frames
        .values()
        .map(|f| [f.frame.x, f.frame.y, f.frame.w, f.frame.h])
        .collect();
    Ok((sheet.meta.image, frames))
}

/// Load every manifest entry from `base_dir` into the store.
///
/// `.json` entries are sprite sheets; everything else is a plain image. A failed
/// entry is logged and skipped so the rest of the application still starts.
/// Returns the number of entries loaded.
pub fn load_manifest(store: &mut SpriteStore, base_dir: &Path, manifest: &[(&str, &str)]) -> usize {
    let mut loaded = 0;
    for (alias, path) in manifest {
        match load_entry(store, base_dir, alias, path) {
            Ok(()) => {
                tracing::info!(alias, path, "asset loaded");
                loaded += 1;
            }
            Err(err) => tracing::warn!(alias, path, error = %err, "asset skipped"),
        }
    }
    loaded
}

fn load_entry(store: &mut SpriteStore, base_dir: &Path, alias: &str, path: &str) -> Result<()> {
    let full = base_dir.join(path);
    if full.extension().is_some_and(|ext| ext == "json") {
        let json = std::fs::read_to_string(&full)?;
        let (image_name, frames) = parse_sheet(&json)?;
        let image_path = full
            .parent()
            .map(|dir| dir.join(&image_name))
            .unwrap_or_else(|| image_name.clone().into());
        let pixels = image::open(&image_path)?.to_rgba8();
        store.insert_sheet(alias, pixels, frames);
    } else {
        let pixels = image::open(&full)?.to_rgba8();
        store.insert_image(alias, pixels);
    }
    Ok(())
}

/// Information about a single glyph in the font atlas.
#[derive(Clone, Copy, Debug)]
pub struct GlyphInfo {
    /// UV coordinates in the atlas (x, y, width, height) normalized to [0, 1].
    pub uv: [f32; 4],
    /// Size of the glyph in pixels.
    pub width: u32,
    pub height: u32,
    /// Offset from the cursor position to where the glyph should be drawn.
    pub offset_x: f32,
    pub offset_y: f32,
    /// How far to advance the cursor after this glyph.
    pub advance: f32,
}

/// Pre-rasterized glyphs packed into a single-channel bitmap.
pub struct FontAtlas {
    pub bitmap: Vec<u8>,
    pub width: u32,
    pub height: u32,
    glyphs: HashMap<char, GlyphInfo>,
    size: f32,
    line_height: f32,
    ascent: f32,
}

impl FontAtlas {
    /// Rasterize printable ASCII plus `extra` at `size` pixels.
    pub fn new(font: &Font, size: f32, extra: &[char]) -> Self {
        let chars: Vec<char> = (32u8..=126u8).map(char::from).chain(extra.iter().copied()).collect();

        let rasterized: Vec<(char, fontdue::Metrics, Vec<u8>)> = chars
            .iter()
            .map(|&c| {
                let (metrics, bitmap) = font.rasterize(c, size);
                (c, metrics, bitmap)
            })
            .collect();

        // Simple row packing; grow the smaller side until everything fits.
        let padding = 1u32;
        let mut atlas_width = 256u32;
        let mut atlas_height = 256u32;
        while !pack(&rasterized, atlas_width, atlas_height, padding, |_, _, _| {}) {
            if atlas_width <= atlas_height {
                atlas_width *= 2;
            } else {
                atlas_height *= 2;
            }
        }

        let mut bitmap = vec![0u8; (atlas_width * atlas_height) as usize];
        let mut glyphs = HashMap::new();
        pack(&rasterized, atlas_width, atlas_height, padding, |index, x, y| {
            let (c, metrics, glyph) = &rasterized[index];
            let (glyph_w, glyph_h) = (metrics.width as u32, metrics.height as u32);
            for gy in 0..glyph_h {
                let src = (gy * glyph_w) as usize;
                let dst = ((y + gy) * atlas_width + x) as usize;
                bitmap[dst..dst + glyph_w as usize]
                    .copy_from_slice(&glyph[src..src + glyph_w as usize]);
            }
            glyphs.insert(
                *c,
                GlyphInfo {
                    uv: [
                        x as f32 / atlas_width as f32,
                        y as f32 / atlas_height as f32,
                        glyph_w as f32 / atlas_width as f32,
                        glyph_h as f32 / atlas_height as f32,
                    ],
                    width: glyph_w,
                    height: glyph_h,
                    offset_x: metrics.xmin as f32,
                    offset_y: metrics.ymin as f32,
                    advance: metrics.advance_width,
                },
            );
        });

        let line_metrics = font.horizontal_line_metrics(size);
        let line_height = line_metrics.map(|m| m.new_line_size).unwrap_or(size * 1.2);
        let ascent = line_metrics.map(|m| m.ascent).unwrap_or(size);

        Self {
            bitmap,
            width: atlas_width,
            height: atlas_height,
            glyphs,
            size,
            line_height,
            ascent,
        }
    }

    /// Get glyph info for a character.
    pub fn glyph(&self, c: char) -> Option<&GlyphInfo> {
        self.glyphs.get(&c)
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    pub fn ascent(&self) -> f32 {
        self.ascent
    }

    /// Advance width of a string; unknown characters count as half an em.
    pub fn measure(&self, text: &str) -> f32 {
        text.chars()
            .map(|c| self.glyphs.get(&c).map_or(self.size * 0.5, |g| g.advance))
            .sum()
    }
}

/// Row-pack glyph boxes, calling `place(index, x, y)` for each. False if they
/// do not fit.
fn pack(
    glyphs: &[(char, fontdue::Metrics, Vec<u8>)],
    atlas_width: u32,
    atlas_height: u32,
    padding: u32,
    mut place: impl FnMut(usize, u32, u32),
) -> bool {
    let mut x = padding;
    let mut y = padding;
    let mut row_height = 0u32;
    for (index, (_, metrics, _)) in glyphs.iter().enumerate() {
        let (glyph_w, glyph_h) = (metrics.width as u32, metrics.height as u32);
        if glyph_w + 2 * padding > atlas_width {
            return false;
        }
        if x + glyph_w + padding > atlas_width {
            x = padding;
            y += row_height + padding;
            row_height = 0;
        }
        if y + glyph_h + padding > atlas_height {
            return false;
        }
        place(index, x, y);
        x += glyph_w + padding;
        row_height = row_height.max(glyph_h);
    }
    true
}

/// Greedy word wrap. Explicit newlines always break; a single word wider than
/// `max_width` gets a line of its own.
pub fn wrap_lines(text: &str, max_width: Option<f32>, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let Some(max_width) = max_width else {
            lines.push(paragraph.to_string());
            continue;
        };
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if line.is_empty() {
                line.push_str(word);
                continue;
            }
            let candidate = format!("{line} {word}");
            if measure(&candidate) <= max_width {
                line = candidate;
            } else {
                lines.push(std::mem::take(&mut line));
                line.push_str(word);
            }
        }
        lines.push(line);
    }
    lines
}

/// The UI font and its atlases, one per pixel size, built on first use.
pub struct Fonts {
    font: Option<Font>,
    extra_chars: Vec<char>,
    atlases: HashMap<u32, FontAtlas>,
}

impl Fonts {
    /// Parse TTF/OTF bytes. `extra_chars` are rasterized in addition to ASCII.
    pub fn from_bytes(data: &[u8], extra_chars: Vec<char>) -> Result<Self> {
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|err| TableauError::Font(err.to_string()))?;
        Ok(Self {
            font: Some(font),
            extra_chars,
            atlases: HashMap::new(),
        })
    }

    /// Load a font file from disk.
    pub fn load(path: &Path, extra_chars: Vec<char>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data, extra_chars)
    }

    /// No font available; text draws are skipped.
    pub fn none() -> Self {
        Self {
            font: None,
            extra_chars: Vec::new(),
            atlases: HashMap::new(),
        }
    }

    /// Atlas key for a requested pixel size.
    pub fn key(size: f32) -> u32 {
        size.round().max(1.0) as u32
    }

    /// Every atlas built so far, by key.
    pub fn atlases(&self) -> impl Iterator<Item = (u32, &FontAtlas)> {
        self.atlases.iter().map(|(key, atlas)| (*key, atlas))
    }

    /// Atlas for `size`, rasterizing it on first request.
    pub fn atlas(&mut self, size: f32) -> Option<&FontAtlas> {
        let font = self.font.as_ref()?;
        let key = Self::key(size);
        let extra = &self.extra_chars;
        Some(
            self.atlases
                .entry(key)
                .or_insert_with(|| FontAtlas::new(font, key as f32, extra)),
        )
    }
}
