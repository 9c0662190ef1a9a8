/// Terminal render shell for meshview
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use meshview_core::{Camera, MeshBuffers, ModelTransform};
use nalgebra::Vector3;
use std::io::{stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub mod config;
pub mod error;
pub mod renderer;

pub use config::ViewerConfig;
pub use error::ShellError;
pub use renderer::{AsciiRenderer, Frame, MeshRenderer};

/// Radians per key press for manual rotation
const NUDGE: f32 = 0.1;

/// Rows reserved above the viewport for the status line
const STATUS_ROWS: u16 = 1;

/// Main application struct for terminal 3D rendering.
///
/// Owns the mesh buffers and the configuration for the whole session; the
/// renderer only reads from them.
pub struct TerminalApp {
    buffers: MeshBuffers,
    config: ViewerConfig,
    transform: ModelTransform,
    camera: Camera,
    renderer: AsciiRenderer,
    wireframe: bool,
    spinning: bool,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(buffers: MeshBuffers, config: ViewerConfig) -> Result<Self, ShellError> {
        let (columns, rows) = terminal::size()?;
        Ok(Self::with_size(buffers, config, columns, rows))
    }

    /// Build the app for a terminal of `columns` x `rows` cells
    pub fn with_size(buffers: MeshBuffers, config: ViewerConfig, columns: u16, rows: u16) -> Self {
        let renderer = Self::make_renderer(&buffers, &config, columns, rows);
        let camera = Camera::new(renderer.aspect());

        Self {
            transform: ModelTransform::new(config.mesh.scale),
            wireframe: config.grid.enabled,
            buffers,
            config,
            camera,
            renderer,
            spinning: true,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    fn make_renderer(
        buffers: &MeshBuffers,
        config: &ViewerConfig,
        columns: u16,
        rows: u16,
    ) -> AsciiRenderer {
        let width = config.window.width.min(columns).max(1);
        let height = config.window.height.min(rows.saturating_sub(STATUS_ROWS)).max(1);

        let mut renderer =
            AsciiRenderer::new(width as usize, height as usize, config.smoothing.samples);
        renderer.bind(buffers);
        debug!(width, height, renderer = renderer.name(), "bound mesh buffers");
        renderer
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> Result<(), ShellError> {
        terminal::enable_raw_mode()?;

        let result = with_alternate_screen(&mut stdout(), || self.main_loop());

        // Raw mode is dropped on every path out, including a failed screen switch
        let restored = terminal::disable_raw_mode().map_err(ShellError::from);
        result.and(restored)
    }

    fn main_loop(&mut self) -> Result<(), ShellError> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(&event);
            }

            self.update();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        info!("viewer closed");
        Ok(())
    }

    /// Apply one terminal event to the view state
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if *kind != KeyEventKind::Release => {
                self.handle_key(*code)
            }
            Event::Resize(columns, rows) => self.resize(*columns, *rows),
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('g') => {
                self.wireframe = !self.wireframe;
                debug!(wireframe = self.wireframe, "toggled wireframe overlay");
            }
            KeyCode::Char(' ') => {
                self.spinning = !self.spinning;
            }
            KeyCode::Char('w') | KeyCode::Up => {
                self.transform.rotate(&Vector3::x(), -NUDGE);
            }
            KeyCode::Char('s') | KeyCode::Down => {
                self.transform.rotate(&Vector3::x(), NUDGE);
            }
            KeyCode::Char('a') | KeyCode::Left => {
                self.transform.rotate(&Vector3::y(), -NUDGE);
            }
            KeyCode::Char('d') | KeyCode::Right => {
                self.transform.rotate(&Vector3::y(), NUDGE);
            }
            _ => {}
        }
    }

    fn resize(&mut self, columns: u16, rows: u16) {
        self.renderer = Self::make_renderer(&self.buffers, &self.config, columns, rows);
        self.camera.aspect = self.renderer.aspect();
    }

    fn update(&mut self) {
        if self.spinning {
            self.transform.spin();
        }
    }

    /// Rasterize the current view without touching the terminal
    pub fn draw(&mut self) {
        let frame = Frame {
            camera: &self.camera,
            transform: &self.transform,
            mesh_color: self.config.mesh_color,
            grid_color: self.config.grid_color,
            wireframe: self.wireframe,
        };
        self.renderer.draw(&frame);
    }

    fn render(&mut self) -> Result<(), ShellError> {
        self.draw();

        let mut stdout = stdout();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine)
        )?;
        self.renderer.present(&mut stdout, STATUS_ROWS)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "meshview | {} faces | FPS: {:.1} | grid: {} | Arrows/WASD=Rotate G=Grid Space=Spin Q=Quit",
                self.buffers.face_count(),
                self.fps,
                if self.wireframe { "on" } else { "off" },
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Run `body` on the alternate screen with the cursor hidden.
///
/// The main screen and cursor are restored even when entering the alternate
/// screen or `body` fails; the first error is returned.
fn with_alternate_screen<W: Write, T>(
    out: &mut W,
    body: impl FnOnce() -> Result<T, ShellError>,
) -> Result<T, ShellError> {
    let result = execute!(out, terminal::EnterAlternateScreen, cursor::Hide)
        .map_err(ShellError::from)
        .and_then(|()| body());

    let restored = execute!(out, terminal::LeaveAlternateScreen, cursor::Show);
    let value = result?;
    restored?;
    Ok(value)
}
