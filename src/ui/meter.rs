use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::meter::VuChannel;

/// One horizontal VU row: a label, the level bar and the peak-hold marker.
pub struct VuWidget<'a> {
    label: &'a str,
    channel: &'a VuChannel,
}

impl<'a> VuWidget<'a> {
    pub fn new(label: &'a str, channel: &'a VuChannel) -> Self {
        Self { label, channel }
    }
}

fn level_color(x: u16, width: u16) -> Color {
    let frac = if width == 0 { 0.0 } else { x as f32 / width as f32 };
    if frac >= 0.85 {
        Color::Red
    } else if frac >= 0.6 {
        Color::Yellow
    } else {
        Color::Green
    }
}

impl Widget for VuWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let label_w = (self.label.chars().count() as u16 + 1).min(area.width);
        buf.set_string(area.x, area.y, self.label, Style::default());

        let bar_x = area.x + label_w;
        let width = area.width - label_w;
        let bar = self.channel.bar(width);
        for i in 0..width {
            let cell = &mut buf[(bar_x + i, area.y)];
            if i < bar.filled {
                cell.set_char('█').set_fg(level_color(i, width));
            } else {
                cell.set_char('·').set_fg(Color::DarkGray);
            }
        }
        if let Some(p) = bar.peak_at {
            buf[(bar_x + p, area.y)]
                .set_char('▌')
                .set_fg(Color::White);
        }
    }
}
