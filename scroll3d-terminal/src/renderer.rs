/// Text rendering of the virtual page and the model viewport card
use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;

use scroll3d_core::debug::format_progress;
use scroll3d_core::{Phase, SurfaceState};

use crate::page::{Region, VirtualPage};

/// Intensity ramp used for the viewport opacity bar (dim to bright)
const OPACITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Everything one frame needs besides the page itself
pub struct FrameView<'a> {
    pub titles: &'a [String],
    pub surface: &'a SurfaceState,
    pub phase: Phase,
    pub current: Option<usize>,
    pub progress: f64,
    pub status: &'a str,
}

pub struct PanelRenderer {
    width: usize,
    height: usize,
}

impl PanelRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    fn page_width(&self) -> usize {
        self.width * 3 / 5
    }

    pub fn draw<W: Write>(
        &self,
        writer: &mut W,
        page: &VirtualPage,
        view: &FrameView,
    ) -> std::io::Result<()> {
        let page_width = self.page_width();
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            let (text, color, bold) = page_row(page, view, y, page_width);
            if bold {
                writer.queue(SetAttribute(Attribute::Bold))?;
            }
            writer.queue(SetForegroundColor(color))?;
            writer.queue(Print(fit(&text, page_width)))?;
            writer.queue(SetAttribute(Attribute::Reset))?;
            writer.queue(SetForegroundColor(Color::DarkGrey))?;
            writer.queue(Print('│'))?;
        }

        let card_x = (page_width + 2) as u16;
        let card_width = self.width.saturating_sub(page_width + 2);
        for (i, (line, color)) in card_lines(view, card_width).into_iter().enumerate() {
            if i + 1 >= self.height {
                break;
            }
            writer.queue(cursor::MoveTo(card_x, (i + 1) as u16))?;
            writer.queue(SetForegroundColor(color))?;
            writer.queue(Print(fit(&line, card_width)))?;
        }

        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn page_row(page: &VirtualPage, view: &FrameView, y: usize, width: usize) -> (String, Color, bool) {
    match page.region_at(y) {
        Region::Header => {
            if y + page.scroll == page.header_rows / 2 {
                ("   scroll down to explore the models".to_string(), Color::Yellow, true)
            } else {
                (String::new(), Color::Reset, false)
            }
        }
        Region::Section { index, row } => {
            let active = view.surface.active_sections.get(index).copied().unwrap_or(false);
            let color = if active { Color::Cyan } else { Color::Grey };
            let rule = "─".repeat(width.saturating_sub(4));
            let text = if row == 0 {
                format!("  ┌{}", rule)
            } else if row == page.section_rows - 1 {
                format!("  └{}", rule)
            } else if row == page.section_rows / 2 {
                let title = view.titles.get(index).map(String::as_str).unwrap_or("");
                let marker = if active { "▶" } else { " " };
                format!("  │ {} {}. {}", marker, index + 1, title)
            } else {
                "  │".to_string()
            };
            (text, color, active)
        }
        Region::Footer => {
            if y + page.scroll == page.total_rows() - 1 {
                ("   end of page".to_string(), Color::DarkGrey, false)
            } else {
                (String::new(), Color::Reset, false)
            }
        }
        Region::Beyond => (String::new(), Color::Reset, false),
    }
}

fn card_lines(view: &FrameView, width: usize) -> Vec<(String, Color)> {
    let surface = view.surface;
    let style = &surface.style;
    let phase = match view.phase {
        Phase::Idle => "idle",
        Phase::FadingOut { .. } => "fading out",
        Phase::Swapping { .. } => "swapping",
        Phase::FadingIn { .. } => "fading in",
    };
    let source = surface.source.as_deref().unwrap_or("(none)");
    let orbit = surface
        .camera_orbit
        .map(|o| o.to_string())
        .unwrap_or_else(|| "(none)".to_string());
    let angles = surface
        .camera_orbit
        .map(|o| format!("{:.0}° / {:.0}°", o.theta.to_degrees(), o.phi.to_degrees()))
        .unwrap_or_else(|| "-".to_string());
    let current = view
        .current
        .map(|i| (i + 1).to_string())
        .unwrap_or_else(|| "-".to_string());

    let bar_width = width.saturating_sub(12).max(1);
    let filled = (style.opacity * bar_width as f64).round() as usize;
    let top_shade = OPACITY_RAMP.len() - 1;
    let shade_index = ((style.opacity * top_shade as f64) as usize).min(top_shade);
    let shade = OPACITY_RAMP[shade_index];
    let bar: String = (0..bar_width).map(|i| if i < filled { shade } else { ' ' }).collect();

    let model_color = if surface.loaded { Color::Cyan } else { Color::Grey };
    vec![
        ("MODEL VIEWPORT".to_string(), Color::Yellow),
        (String::new(), Color::Reset),
        (format!("section   {}", current), Color::White),
        (format!("model     {}", source), model_color),
        (format!("camera    {}", orbit), Color::White),
        (format!("angles    {}", angles), Color::White),
        (format!("loaded    {}", surface.loaded), Color::White),
        (String::new(), Color::Reset),
        (format!("phase     {}", phase), Color::White),
        (format!("opacity   [{}]", bar), Color::Cyan),
        (format!("transform {}", style.css_transform()), Color::White),
        (format!("footprint {:.0}%", style.footprint() * 100.0), Color::White),
        (format!("progress  {}", format_progress(view.progress)), Color::White),
        (String::new(), Color::Reset),
        ("↑/↓ scroll  PgUp/PgDn page".to_string(), Color::DarkGrey),
        ("Tab/S-Tab next/prev section".to_string(), Color::DarkGrey),
        ("1-9 activate  p positions".to_string(), Color::DarkGrey),
        ("g progress  q quit".to_string(), Color::DarkGrey),
        (String::new(), Color::Reset),
        (view.status.to_string(), Color::Green),
    ]
}

/// Truncate or pad to exactly `width` characters
fn fit(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}
