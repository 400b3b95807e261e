/// Terminal frontend: drives a viewer session from a crossterm event loop
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use stlview_core::{Axis, SessionError, ViewerConfig, ViewerSession};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: u32 = 2;

/// Speed change per key press, radians per 500 ms
pub const SPEED_STEP: f32 = 0.1;

/// Scroll delta sent per zoom key press or wheel notch
pub const ZOOM_STEP: f32 = 100.0;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    session: ViewerSession<AsciiRenderer>,
    running: bool,
    started: Instant,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
    status: Option<String>,
}

impl TerminalApp {
    pub fn new(config: ViewerConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let config = config.with_size(width as u32, height as u32 * CELL_ASPECT);
        let renderer = AsciiRenderer::new(width as usize, height as usize);
        let session = ViewerSession::new(config, renderer).map_err(session_error)?;

        Ok(Self {
            session,
            running: true,
            started: Instant::now(),
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            status: None,
        })
    }

    /// Replace the displayed mesh with an STL file's contents.
    ///
    /// A file that fails to load is reported in the status line and the
    /// previous mesh keeps spinning.
    pub fn load_file(&mut self, bytes: &[u8]) -> Result<(), SessionError> {
        let result = self.session.on_file_loaded(bytes);
        self.status = Some(match &result {
            Ok(()) => format!("{} triangles", self.session.mesh().triangle_count()),
            Err(e) => e.to_string(),
        });
        result
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            let timestamp = self.started.elapsed().as_secs_f64() * 1000.0;
            self.session.on_frame(timestamp);
            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_fps_sample).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => self.session.on_zoom(ZOOM_STEP),
                MouseEventKind::ScrollDown => self.session.on_zoom(-ZOOM_STEP),
                _ => {}
            },
            Event::Resize(width, height) if width > 0 && height > 0 => {
                self.session
                    .backend_mut()
                    .resize(width as usize, height as usize);
                self.session
                    .on_resize(width as u32, height as u32 * CELL_ASPECT);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        let nudge = |app: &mut Self, axis: Axis, step: f32| {
            let speed = app.session.pipeline().rotation().speed(axis);
            app.session.on_speed_change(axis, speed + step);
        };

        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('x') => nudge(self, Axis::X, SPEED_STEP),
            KeyCode::Char('X') => nudge(self, Axis::X, -SPEED_STEP),
            KeyCode::Char('y') => nudge(self, Axis::Y, SPEED_STEP),
            KeyCode::Char('Y') => nudge(self, Axis::Y, -SPEED_STEP),
            KeyCode::Char('z') => nudge(self, Axis::Z, SPEED_STEP),
            KeyCode::Char('Z') => nudge(self, Axis::Z, -SPEED_STEP),
            KeyCode::Char('0') => {
                for axis in Axis::ALL {
                    self.session.on_speed_change(axis, 0.0);
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => {
                self.session.on_zoom(ZOOM_STEP)
            }
            KeyCode::Char('-') | KeyCode::Down => self.session.on_zoom(-ZOOM_STEP),
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let renderer = self.session.backend_mut();
        renderer.clear();
        renderer.render();

        let mut stdout = stdout();
        self.session.backend().draw(&mut stdout)?;

        let speeds = self.session.pipeline().rotation().speeds;
        let mut overlay = format!(
            "STLView | FPS: {:.1} | speed x{:.1} y{:.1} z{:.1} | zoom {:.2} | x/y/z +speed, X/Y/Z -speed, 0 stop, +/- zoom, q quit",
            self.fps,
            speeds.x,
            speeds.y,
            speeds.z,
            self.session.viewport().zoom()
        );
        if let Some(status) = &self.status {
            overlay.push_str(" | ");
            overlay.push_str(status);
        }
        let overlay: String = overlay
            .chars()
            .take(self.session.backend().width())
            .collect();

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(overlay),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

fn session_error(e: SessionError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}
