use std::time::{Duration, Instant};

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use super::*;
use crate::meter::{VuChannel, VuTiming};

fn row_symbols(buf: &Buffer, y: u16) -> String {
    (0..buf.area.width)
        .map(|x| buf[(x, y)].symbol().to_string())
        .collect()
}

#[test]
fn time_is_minutes_and_seconds() {
    assert_eq!(format_time(0, 0), "00:00 / 00:00");
    assert_eq!(format_time(65_000, 0), "00:00 / 00:00");
    assert_eq!(format_time(65_999, 215_000), "01:05 / 03:35");
    assert_eq!(format_time(0, 3_600_000), "00:00 / 60:00");
}

#[test]
fn list_window_centers_cursor() {
    assert_eq!(list_window(3, 10, 2), (0, 3));
    assert_eq!(list_window(20, 5, 0), (0, 5));
    assert_eq!(list_window(20, 5, 10), (8, 13));
    assert_eq!(list_window(20, 5, 19), (15, 20));
    assert_eq!(list_window(20, 0, 3), (0, 20));
}

#[test]
fn controls_mention_scrub_step() {
    let text = controls_text(7);
    assert!(text.contains("[H/L] scrub -/+7s"));
    assert!(text.contains("[q] quit"));
}

#[test]
fn vu_widget_draws_level_and_peak() {
    let mut ch = VuChannel::new(VuTiming::default());
    let now = Instant::now();
    ch.set_level(0.8, now);
    ch.set_level(0.4, now + Duration::from_millis(10));

    let area = Rect::new(0, 0, 12, 1);
    let mut buf = Buffer::empty(area);
    VuWidget::new("L", &ch).render(area, &mut buf);

    // Label + space, then ten cells: four filled, marker at cell 7.
    assert_eq!(row_symbols(&buf, 0), "L ████···▌··");
}

#[test]
fn vu_widget_is_empty_when_silent() {
    let ch = VuChannel::new(VuTiming::default());
    let area = Rect::new(0, 0, 6, 1);
    let mut buf = Buffer::empty(area);
    VuWidget::new("R", &ch).render(area, &mut buf);
    assert_eq!(row_symbols(&buf, 0), "R ····");
}

#[test]
fn art_widget_uses_half_blocks() {
    let pixels: ArtPixels = vec![vec![(255, 0, 0); 2], vec![(0, 0, 255); 2]];
    let area = Rect::new(0, 0, 4, 2);
    let mut buf = Buffer::empty(area);
    AlbumArtWidget::new(&pixels).render(area, &mut buf);

    let cell = &buf[(1, 0)];
    assert_eq!(cell.symbol(), "▀");
    assert_eq!(cell.fg, Color::Rgb(255, 0, 0));
    assert_eq!(cell.bg, Color::Rgb(0, 0, 255));
    // Beyond the art the buffer is untouched.
    assert_eq!(buf[(2, 0)].symbol(), " ");
    assert_eq!(buf[(0, 1)].symbol(), " ");
}

#[test]
fn garbage_bytes_are_not_art() {
    assert!(decode_art(b"not an image", ART_COLS, ART_ROWS).is_none());
}

#[test]
fn decoded_art_has_two_pixel_rows_per_cell() {
    let img = image::RgbImage::from_pixel(3, 3, image::Rgb([10, 20, 30]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    let pixels = decode_art(&bytes, 4, 2).unwrap();
    assert_eq!(pixels.len(), 4);
    assert!(pixels.iter().all(|r| r.len() == 4));
    assert_eq!(pixels[0][0], (10, 20, 30));
}
