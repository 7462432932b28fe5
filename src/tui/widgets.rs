use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::color::Color as AppColor;
use crate::role::ColorRole;
use crate::store::Palette;

const BRIGHT_ROW: [Option<ColorRole>; 8] = [
    Some(ColorRole::Black),
    Some(ColorRole::White),
    Some(ColorRole::Red),
    Some(ColorRole::Green),
    Some(ColorRole::Blue),
    Some(ColorRole::Cyan),
    Some(ColorRole::Magenta),
    Some(ColorRole::Yellow),
];

// Black has no dim variant.
const DIM_ROW: [Option<ColorRole>; 8] = [
    None,
    Some(ColorRole::WhiteDim),
    Some(ColorRole::RedDim),
    Some(ColorRole::GreenDim),
    Some(ColorRole::BlueDim),
    Some(ColorRole::CyanDim),
    Some(ColorRole::MagentaDim),
    Some(ColorRole::YellowDim),
];

/// A widget that renders a 15-role palette as an 8x2 grid of colored
/// swatches: bright colors on top, dim colors below.
pub struct PaletteWidget<'a> {
    title: &'a str,
    palette: &'a Palette,
}

impl<'a> PaletteWidget<'a> {
    pub fn new(title: &'a str, palette: &'a Palette) -> Self {
        Self { title, palette }
    }
}

fn to_color(c: AppColor) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Choose black or white foreground for readable text on the given background.
fn contrast_fg(c: AppColor) -> Color {
    if c.relative_luminance() > 0.4 {
        Color::Black
    } else {
        Color::White
    }
}

/// Each swatch is 6 chars wide with the role label centered on the colored
/// background. Empty grid cells are left blank.
fn build_swatch_row(palette: &Palette, roles: &[Option<ColorRole>; 8]) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    for role in roles {
        match role {
            Some(role) => {
                let c = palette.get(*role);
                let style = Style::default().bg(to_color(c)).fg(contrast_fg(c));
                spans.push(Span::styled(format!("{:^6}", role.label()), style));
            }
            None => spans.push(Span::raw(" ".repeat(6))),
        }
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

impl Widget for PaletteWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().title(self.title);
        let inner = block.inner(area);
        block.render(area, buf);

        let lines = vec![
            Line::from("  Bright"),
            build_swatch_row(self.palette, &BRIGHT_ROW),
            Line::from("  Dim"),
            build_swatch_row(self.palette, &DIM_ROW),
        ];

        Paragraph::new(lines).render(inner, buf);
    }
}
