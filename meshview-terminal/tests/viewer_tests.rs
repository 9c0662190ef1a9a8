//! Integration tests for the terminal render shell.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::style::Color;
use std::path::Path;

use meshview_core::{load_buffers, parse_obj, MeshBuffers};
use meshview_terminal::{ShellError, TerminalApp, ViewerConfig};

const FRONT_FACING: &str = "v -1 -1 0\nv 1 -1 0\nv 0 1 0\nf 1 2 3\n";
const BACK_FACING: &str = "v -1 -1 0\nv 1 -1 0\nv 0 1 0\nf 1 3 2\n";

fn buffers(obj: &str) -> MeshBuffers {
    MeshBuffers::from_mesh(&parse_obj(obj).unwrap()).unwrap()
}

/// 40x20 cells gives a square viewport once the cell aspect is applied
fn app(obj: &str, config: ViewerConfig) -> TerminalApp {
    TerminalApp::with_size(buffers(obj), config, 40, 21)
}

fn key(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn grid_color(config: &ViewerConfig) -> Color {
    let c = config.grid_color;
    Color::Rgb {
        r: (c.red * 255.0).round() as u8,
        g: (c.green * 255.0).round() as u8,
        b: (c.blue * 255.0).round() as u8,
    }
}

fn count_cells(app: &TerminalApp, color: Color) -> usize {
    let renderer = app.renderer();
    (0..renderer.height())
        .flat_map(|y| (0..renderer.width()).map(move |x| (x, y)))
        .filter(|&(x, y)| renderer.cell(x, y).map(|c| c.color) == Some(color))
        .count()
}

// ─── Viewport ─────────────────────────────────────────────────

#[test]
fn viewport_is_clamped_to_terminal() {
    let app = app(FRONT_FACING, ViewerConfig::default());
    assert_eq!(app.renderer().width(), 40);
    assert_eq!(app.renderer().height(), 20);
}

#[test]
fn resize_rebuilds_viewport() {
    let mut app = app(FRONT_FACING, ViewerConfig::default());
    app.handle_event(&Event::Resize(30, 11));
    assert_eq!(app.renderer().width(), 30);
    assert_eq!(app.renderer().height(), 10);
}

// ─── Shading ──────────────────────────────────────────────────

#[test]
fn lit_face_is_brighter_than_unlit_face() {
    let mut front = app(FRONT_FACING, ViewerConfig::default());
    front.draw();
    let lit = front.renderer().cell(20, 10).unwrap();
    assert_eq!(lit.ch, '#');

    let mut back = app(BACK_FACING, ViewerConfig::default());
    back.draw();
    let unlit = back.renderer().cell(20, 10).unwrap();
    assert_eq!(unlit.ch, ':');
}

#[test]
fn bundled_cube_renders() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../assets/cube.obj");
    let buffers = load_buffers(path).unwrap();
    assert_eq!(buffers.face_count(), 12);
    assert_eq!(buffers.normals().len(), 3 * 3 * 12);

    let mut app = TerminalApp::with_size(buffers, ViewerConfig::default(), 40, 21);
    app.draw();
    assert_ne!(app.renderer().cell(20, 10).unwrap().ch, ' ');
}

#[test]
fn empty_mesh_draws_nothing() {
    let mut app = app("# empty\n", ViewerConfig::default());
    app.draw();
    let renderer = app.renderer();
    for y in 0..renderer.height() {
        for x in 0..renderer.width() {
            assert_eq!(renderer.cell(x, y).unwrap().ch, ' ');
        }
    }
}

// ─── Wireframe overlay ────────────────────────────────────────

#[test]
fn wireframe_overlay_toggles() {
    let config = ViewerConfig::default();
    let grid = grid_color(&config);

    let mut app = app(FRONT_FACING, config);
    assert!(app.wireframe());
    app.draw();
    assert!(count_cells(&app, grid) > 0);

    app.handle_event(&key('g'));
    assert!(!app.wireframe());
    app.draw();
    assert_eq!(count_cells(&app, grid), 0);
}

#[test]
fn wireframe_can_start_disabled() {
    let config = ViewerConfig::from_toml("[grid]\nenabled = false\n").unwrap();
    let grid = grid_color(&config);

    let mut app = app(FRONT_FACING, config);
    app.draw();
    assert_eq!(count_cells(&app, grid), 0);
}

#[test]
fn quit_key_stops_the_loop() {
    let mut app = app(FRONT_FACING, ViewerConfig::default());
    assert!(app.is_running());
    app.handle_event(&key('q'));
    assert!(!app.is_running());
}

// ─── Configuration files ──────────────────────────────────────

#[test]
fn malformed_config_file_is_fatal() {
    let path = std::env::temp_dir().join(format!("meshview-{}-bad.toml", std::process::id()));
    std::fs::write(&path, "[smoothing]\nsamples = \"lots\"\n").unwrap();
    let result = ViewerConfig::load(&path);
    std::fs::remove_file(&path).ok();

    assert!(matches!(result, Err(ShellError::Config { .. })));
}

#[test]
fn config_file_is_applied() {
    let path = std::env::temp_dir().join(format!("meshview-{}-good.toml", std::process::id()));
    std::fs::write(&path, "[window]\nwidth = 16\nheight = 8\n\n[mesh]\nscale = 2.0\n").unwrap();
    let config = ViewerConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.mesh.scale, 2.0);
    let app = app(FRONT_FACING, config);
    assert_eq!(app.renderer().width(), 16);
    assert_eq!(app.renderer().height(), 8);
}
