/// Terminal host for the scroll-driven model showcase
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use scroll3d_core::debug::format_progress;
use scroll3d_core::{
    resolver, Activation, ConfigError, ModelEvent, ModelSurface, PageLayout, ResourceLoadError,
    ShowcaseConfig, ShowcaseEngine, SurfaceState,
};

pub mod page;
pub mod renderer;

pub use page::VirtualPage;
pub use renderer::{FrameView, PanelRenderer};

/// Main application struct for the terminal showcase
pub struct TerminalApp {
    engine: ShowcaseEngine,
    surface: SurfaceState,
    page: VirtualPage,
    renderer: PanelRenderer,
    titles: Vec<String>,
    models_dir: Option<PathBuf>,
    started: Instant,
    seen_swaps: usize,
    status: String,
    running: bool,
}

impl TerminalApp {
    pub fn new(
        config: &ShowcaseConfig,
        section_rows: Option<usize>,
        models_dir: Option<PathBuf>,
    ) -> Result<Self, AppError> {
        let engine = ShowcaseEngine::new(config)?;
        let (width, height) = terminal::size()?;
        let count = engine.registry().count();
        let rows = height as usize;

        Ok(Self {
            titles: engine
                .registry()
                .sections()
                .iter()
                .map(|s| s.region.clone())
                .collect(),
            engine,
            surface: SurfaceState::new(count),
            page: VirtualPage::new(rows, section_rows.unwrap_or(rows), count),
            renderer: PanelRenderer::new(width as usize, rows),
            models_dir,
            started: Instant::now(),
            seen_swaps: 0,
            status: String::new(),
            running: true,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 60);
        self.engine.page_ready(self.now());
        self.engine.observe_layout(&self.page);

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            self.update();
            self.render()?;

            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let half_page = (self.page.viewport_rows / 2).max(1) as isize;
        let moved = match event::read()? {
            Event::Key(KeyEvent { code, .. }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                    false
                }
                KeyCode::Up | KeyCode::Char('k') => self.page.scroll_by(-1),
                KeyCode::Down | KeyCode::Char('j') => self.page.scroll_by(1),
                KeyCode::PageUp => self.page.scroll_by(-half_page),
                KeyCode::PageDown | KeyCode::Char(' ') => self.page.scroll_by(half_page),
                KeyCode::Home => self.page.scroll_to(0),
                KeyCode::End => self.page.scroll_to(usize::MAX),
                KeyCode::Tab => self.jump_to_section(true),
                KeyCode::BackTab => self.jump_to_section(false),
                KeyCode::Char(c @ '1'..='9') => {
                    self.manual_activate(c as i64 - '1' as i64);
                    false
                }
                KeyCode::Char('p') => {
                    self.dump_positions();
                    false
                }
                KeyCode::Char('g') => {
                    let progress = self.engine.inspector().scroll_progress(&self.page);
                    self.status = format!("scroll progress {}", format_progress(progress));
                    false
                }
                _ => false,
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => self.page.scroll_by(-3),
                MouseEventKind::ScrollDown => self.page.scroll_by(3),
                _ => false,
            },
            Event::Resize(width, height) => {
                self.page.resize(height as usize);
                self.renderer.resize(width as usize, height as usize);
                true
            }
            _ => false,
        };

        if moved {
            let now = self.now();
            self.engine.scroll_event(now);
            self.engine.observe_layout(&self.page);
        }
        Ok(())
    }

    /// Scroll the neighbouring section into place; the engine picks it up
    /// through the normal scroll path
    fn jump_to_section(&mut self, forward: bool) -> bool {
        let target = neighbour_section(self.engine.current_index(), self.titles.len(), forward);
        self.page.scroll_to_section(target)
    }

    fn manual_activate(&mut self, index: i64) {
        let now = self.now();
        let outcome = self.engine.inspector().activate(index, now, &mut self.surface);
        self.status = match outcome {
            Activation::Started => format!(
                "activated section {} ({} ms)",
                index + 1,
                self.engine.controller().timings().total().as_millis()
            ),
            Activation::Ignored(reason) => format!("section {} ignored: {:?}", index + 1, reason),
        };
    }

    fn dump_positions(&mut self) {
        let positions = self.engine.inspector().section_positions(&self.page);
        let visible: Vec<String> = positions
            .iter()
            .filter(|p| p.visible)
            .map(|p| format!("{}@{:.0}", p.index + 1, p.center))
            .collect();
        for position in &positions {
            log::info!("{}", position);
        }
        self.status = format!("visible centers: {}", visible.join(" "));
    }

    fn update(&mut self) {
        let now = self.now();
        self.engine.tick(now, &self.page, &mut self.surface);

        // Every swap the engine applied gets a load notification
        if self.surface.source_swaps != self.seen_swaps {
            self.seen_swaps = self.surface.source_swaps;
            if let Some(source) = self.surface.loaded_source() {
                let event = self.load_model(&source);
                self.engine.model_event(&event, &mut self.surface);
                if let ModelEvent::Failed(err) = &event {
                    self.status = err.to_string();
                }
            }
        }
    }

    /// Resolve a model reference against the models directory, if one is set
    fn load_model(&self, source: &str) -> ModelEvent {
        let Some(dir) = &self.models_dir else {
            return ModelEvent::Loaded {
                source: source.to_string(),
            };
        };
        let path = dir.join(source.trim_start_matches('/'));
        if path.is_file() {
            ModelEvent::Loaded {
                source: source.to_string(),
            }
        } else {
            ModelEvent::Failed(ResourceLoadError {
                source_ref: source.to_string(),
                reason: format!("{} not found", path.display()),
            })
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let progress = resolver::scroll_progress(self.page.container_rect(), self.page.viewport());
        let view = FrameView {
            titles: &self.titles,
            surface: &self.surface,
            phase: self.engine.controller().phase(),
            current: self.engine.current_index(),
            progress,
            status: &self.status,
        };

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout, &self.page, &view)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "scroll3d | {} sections | row {}/{}",
                self.titles.len(),
                self.page.scroll,
                self.page.max_scroll()
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Section after (or before) `current`, clamped to the page
fn neighbour_section(current: Option<usize>, count: usize, forward: bool) -> usize {
    let last = count.saturating_sub(1);
    match (current, forward) {
        (None, _) => 0,
        (Some(i), true) => (i + 1).min(last),
        (Some(i), false) => i.saturating_sub(1),
    }
}

/// Startup failures of the terminal host
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("terminal unavailable: {0}")]
    Terminal(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_showcase_loads() {
        let config = ShowcaseConfig::from_toml_str(include_str!("../showcase.toml")).unwrap();
        let engine = ShowcaseEngine::new(&config).unwrap();
        assert_eq!(engine.registry().count(), 5);
        assert_eq!(engine.registry().section_at(2).unwrap().region, "Top view");
    }

    #[test]
    fn test_neighbour_section_clamps() {
        assert_eq!(neighbour_section(None, 5, true), 0);
        assert_eq!(neighbour_section(Some(2), 5, true), 3);
        assert_eq!(neighbour_section(Some(4), 5, true), 4);
        assert_eq!(neighbour_section(Some(2), 5, false), 1);
        assert_eq!(neighbour_section(Some(0), 5, false), 0);
    }
}
