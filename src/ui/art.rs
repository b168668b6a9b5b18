//! Album art drawn with half-block characters.
//!
//! Each terminal cell shows two vertically stacked pixels: the upper one as
//! the foreground of `▀`, the lower one as the background.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::Widget,
};

pub const ART_ROWS: u16 = 8;
pub const ART_COLS: u16 = ART_ROWS * 2; // 2 cols per row for square aspect

/// Rows of (R, G, B) pixels, two pixel rows per terminal row.
pub type ArtPixels = Vec<Vec<(u8, u8, u8)>>;

/// Decode cover image bytes and scale them to `cols` x `rows` cells.
pub fn decode_art(bytes: &[u8], cols: u16, rows: u16) -> Option<ArtPixels> {
    let img = match image::load_from_memory(bytes) {
        Ok(img) => img,
        Err(e) => {
            log::debug!("cover art is not a readable image: {e}");
            return None;
        }
    };
    let px_w = cols as u32;
    let px_h = (rows as u32) * 2; // half-block = 2 pixels per row
    if px_w == 0 || px_h == 0 {
        return None;
    }
    let resized = img.resize_exact(px_w, px_h, image::imageops::FilterType::Triangle);
    let rgb = resized.to_rgb8();
    let pixels = (0..px_h)
        .map(|y| {
            (0..px_w)
                .map(|x| {
                    let p = rgb.get_pixel(x, y);
                    (p[0], p[1], p[2])
                })
                .collect()
        })
        .collect();
    Some(pixels)
}

pub struct AlbumArtWidget<'a> {
    pixels: &'a [Vec<(u8, u8, u8)>],
}

impl<'a> AlbumArtWidget<'a> {
    pub fn new(pixels: &'a [Vec<(u8, u8, u8)>]) -> Self {
        AlbumArtWidget { pixels }
    }
}

impl Widget for AlbumArtWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let art_rows = self.pixels.len() / 2;
        let art_cols = self.pixels.first().map_or(0, Vec::len);
        let rows = (area.height as usize).min(art_rows);
        let cols = (area.width as usize).min(art_cols);
        for cy in 0..rows {
            let top_row = &self.pixels[cy * 2];
            let bot_row = self.pixels.get(cy * 2 + 1).unwrap_or(top_row);
            for cx in 0..cols {
                let (tr, tg, tb) = top_row[cx];
                let (br, bg, bb) = bot_row.get(cx).copied().unwrap_or(top_row[cx]);
                buf[(area.x + cx as u16, area.y + cy as u16)]
                    .set_char('▀')
                    .set_fg(Color::Rgb(tr, tg, tb))
                    .set_bg(Color::Rgb(br, bg, bb));
            }
        }
    }
}
