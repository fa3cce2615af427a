//! Player: the frame-loop host.
//!
//! Owns the terminal session and supplies the engine's per-frame callback:
//! each iteration measures the real elapsed time since the previous frame,
//! steps the executor by that delta, and redraws the world map next to the
//! script trace with the currently executing line highlighted. When the
//! executor reaches its terminal state the loop stops ticking it and waits
//! for the user to quit.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use crossterm::{cursor, event, execute, queue, style, terminal};

use crate::engine::Executor;
use crate::engine::program::Program;
use crate::renderer::Renderer;
use crate::types::{Color, Style};
use crate::world::{GridWorld, World};

/// Rows reserved above the map for the key help line.
const MAP_OFFSET: u16 = 1;

/// Gap between the map and the script trace pane.
const PANE_GAP: u16 = 3;

pub struct Player {
    world: GridWorld,
    executor: Executor,
}

impl Player {
    pub fn new(world: GridWorld, program: Program) -> Self {
        Player {
            world,
            executor: Executor::new(program),
        }
    }

    /// Run the script to completion in the terminal.
    ///
    /// Sets up the terminal, enters the frame loop, and restores the terminal
    /// on exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        let (map_w, map_h) = self.map_size();
        let trace_w = self
            .executor
            .program()
            .instructions
            .iter()
            .map(|inst| inst.raw.len() as u16)
            .max()
            .unwrap_or(0);
        let need_w = map_w + PANE_GAP + trace_w;
        let need_h = (map_h + 2).max(self.executor.program().len() as u16 + 2);

        let (term_w, term_h) = terminal::size()?;
        if term_w < need_w || term_h < need_h {
            bail!("Terminal too small: need {need_w}x{need_h}, have {term_w}x{term_h}");
        }

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.run_loop(&mut stdout);

        // Always restore terminal state.
        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();

        result
    }

    fn run_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let mut current = self.executor.current_index();
        self.executor.begin(&mut |_, index| current = index);

        self.draw(stdout, current)?;

        let mut last = Instant::now();
        let mut drawn_final = false;

        loop {
            if event::poll(Duration::from_millis(16))? {
                match event::read()? {
                    event::Event::Key(key) => match key.code {
                        event::KeyCode::Char('q') | event::KeyCode::Esc => break,
                        _ => {}
                    },
                    event::Event::Resize(_, _) => self.draw(stdout, current)?,
                    _ => {}
                }
            }

            let now = Instant::now();
            let delta_ms = now.duration_since(last).as_secs_f64() * 1000.0;
            last = now;

            if !self.executor.is_stopped() {
                self.executor
                    .step(delta_ms, &mut self.world, &mut |_, index| current = index)?;
                self.draw(stdout, current)?;
            } else if !drawn_final {
                // One last full draw, then only react to input.
                self.draw(stdout, current)?;
                drawn_final = true;
            }
        }

        Ok(())
    }

    fn map_size(&self) -> (u16, u16) {
        let (w, h) = self.world.terrain().extents();
        (w.max(0) as u16, h.max(0) as u16)
    }

    // -----------------------------------------------------------------------
    // Terminal output
    // -----------------------------------------------------------------------

    fn draw(&self, stdout: &mut io::Stdout, current: usize) -> Result<()> {
        self.draw_help(stdout)?;
        self.draw_map(stdout)?;
        self.draw_trace(stdout, current)?;
        self.draw_status(stdout, current)?;
        stdout.flush()?;
        Ok(())
    }

    fn draw_help(&self, stdout: &mut io::Stdout) -> Result<()> {
        let mut cs = style::ContentStyle::default();
        cs.attributes.set(style::Attribute::Dim);
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::PrintStyledContent(style::StyledContent::new(cs, " grid-rover | q: quit")),
        )?;
        Ok(())
    }

    fn draw_map(&self, stdout: &mut io::Stdout) -> Result<()> {
        let grid = Renderer::render(&self.world);
        for (row, cells) in grid.iter().enumerate() {
            queue!(stdout, cursor::MoveTo(0, row as u16 + MAP_OFFSET))?;
            for cell in cells {
                let cs = to_content_style(&cell.style);
                queue!(
                    stdout,
                    style::PrintStyledContent(style::StyledContent::new(cs, cell.ch))
                )?;
            }
        }
        Ok(())
    }

    /// The script pane: every instruction, with the executing line painted
    /// green-on-yellow like the original tracer.
    fn draw_trace(&self, stdout: &mut io::Stdout, current: usize) -> Result<()> {
        let (map_w, _) = self.map_size();
        let x = map_w + PANE_GAP;

        for (index, inst) in self.executor.program().instructions.iter().enumerate() {
            let style = if index == current && !self.executor.is_stopped() {
                Style {
                    fg: Some(Color::Yellow),
                    bg: Some(Color::Green),
                    bold: true,
                    ..Default::default()
                }
            } else {
                Style::default()
            };
            queue!(
                stdout,
                cursor::MoveTo(x, index as u16 + MAP_OFFSET),
                style::PrintStyledContent(style::StyledContent::new(
                    to_content_style(&style),
                    format!("{:>3} {}", index + 1, inst.raw),
                )),
            )?;
        }
        Ok(())
    }

    fn draw_status(&self, stdout: &mut io::Stdout, current: usize) -> Result<()> {
        let (_, map_h) = self.map_size();
        let y = (map_h + MAP_OFFSET).max(self.executor.program().len() as u16 + MAP_OFFSET);

        let status = if self.executor.is_stopped() {
            if self.world.is_on_target() {
                " Finished: robot reached the target ".to_string()
            } else {
                " Finished ".to_string()
            }
        } else {
            format!(
                " Line {}/{} ",
                current + 1,
                self.executor.program().len()
            )
        };

        let mut cs = style::ContentStyle::default();
        cs.attributes.set(style::Attribute::Dim);
        queue!(
            stdout,
            cursor::MoveTo(0, y),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::PrintStyledContent(style::StyledContent::new(cs, status)),
        )?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Style conversion
// ---------------------------------------------------------------------------

fn to_content_style(s: &Style) -> style::ContentStyle {
    let mut cs = style::ContentStyle::default();
    if let Some(fg) = s.fg {
        cs.foreground_color = Some(to_ct_color(fg));
    }
    if let Some(bg) = s.bg {
        cs.background_color = Some(to_ct_color(bg));
    }
    if s.bold {
        cs.attributes.set(style::Attribute::Bold);
    }
    if s.dim {
        cs.attributes.set(style::Attribute::Dim);
    }
    cs
}

fn to_ct_color(c: Color) -> style::Color {
    match c {
        Color::Black => style::Color::Black,
        Color::Red => style::Color::Red,
        Color::Green => style::Color::Green,
        Color::Yellow => style::Color::Yellow,
        Color::Blue => style::Color::Blue,
        Color::Magenta => style::Color::Magenta,
        Color::Cyan => style::Color::Cyan,
        Color::White => style::Color::White,
    }
}
