use crate::framebuffer::FrameBuffer;
use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

/// Display is used by the runner to put the framebuffer on a screen. It
/// should abstract the implementation details, so a variety of kinds of
/// screen would work.
pub trait Display {
    /// draw the whole framebuffer
    fn draw(&mut self, frame: &FrameBuffer) -> Result<(), io::Error>;

    /// one line of front-end state (paused, halted...), shown on the next draw
    fn set_status(&mut self, status: &str);
}

/// canvas bounds for a framebuffer; y is flipped so row 0 is at the top
fn x_bounds(frame: &FrameBuffer) -> [f64; 2] {
    [0.0, (frame.width() - 1) as f64]
}

fn y_bounds(frame: &FrameBuffer) -> [f64; 2] {
    [-1.0 * (frame.height() - 1) as f64, 0.0]
}

fn lit_points(frame: &FrameBuffer) -> Vec<(f64, f64)> {
    frame
        .lit_pixels()
        .map(|(x, y)| (x as f64, -1.0 * y as f64))
        .collect()
}

/// monochrome display in a terminal, rendered using TUI and Crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    status: String,
}

impl MonoTermDisplay {
    pub fn new() -> Result<MonoTermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        Ok(MonoTermDisplay {
            terminal,
            status: String::new(),
        })
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, frame: &FrameBuffer) -> Result<(), io::Error> {
        let title = if self.status.is_empty() {
            "CHIP-8".to_string()
        } else {
            format!("CHIP-8 - {}", self.status)
        };
        let lit = lit_points(frame);

        // for now this assumes a 1:1 ratio between terminal cells and chip8 pixels
        self.terminal.draw(|f| {
            let size = Rect::new(0, 0, 2 + frame.width() as u16, 2 + frame.height() as u16);

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title(title)
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(x_bounds(frame))
                .y_bounds(y_bounds(frame))
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &lit,
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }

    fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

impl Drop for MonoTermDisplay {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
    }
}

/// useful for testing and for running without a terminal
#[derive(Debug, Default)]
pub struct DummyDisplay {
    pub frames_drawn: usize,
    pub lit_on_last_frame: usize,
    pub status: String,
}

impl DummyDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, frame: &FrameBuffer) -> Result<(), io::Error> {
        self.frames_drawn += 1;
        self.lit_on_last_frame = frame.lit_pixels().count();
        Ok(())
    }

    fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_bounds() {
        assert_eq!(x_bounds(&FrameBuffer::default()), [0.0, 63.0]);
    }

    #[test]
    fn test_y_bounds() {
        assert_eq!(y_bounds(&FrameBuffer::default()), [-31.0, 0.0]);
    }

    #[test]
    fn test_lit_points_flip_y() {
        let mut fb = FrameBuffer::default();
        fb.draw_sprite(2, 3, &[0x80]);
        assert_eq!(lit_points(&fb), vec![(2.0, -3.0)]);
    }

    #[test]
    fn test_dummy_display_counts_frames() -> Result<(), io::Error> {
        let mut d = DummyDisplay::new();
        let mut fb = FrameBuffer::default();
        fb.draw_sprite(0, 0, &[0xF0]);
        d.set_status("running");
        d.draw(&fb)?;
        d.draw(&fb)?;
        assert_eq!(d.frames_drawn, 2);
        assert_eq!(d.lit_on_last_frame, 4);
        assert_eq!(d.status, "running");
        Ok(())
    }

    #[test]
    #[ignore]
    // NB. needs a real terminal
    fn test_draw_blank_frame() -> Result<(), io::Error> {
        let mut d = MonoTermDisplay::new()?;
        d.draw(&FrameBuffer::default())
    }
}
