/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use meshview_core::projection::{project_with, ScreenPoint};
use meshview_core::{Camera, MeshBuffers, ModelTransform};
use nalgebra::{Point3, Vector3};
use std::io::Write;

use crate::config::{Rgb, Rgba};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f32 = 0.5;

/// Ambient term of the lighting model
const AMBIENT: f32 = 0.2;

/// Depth slack granted to wireframe edges so they win over the faces they outline
const WIRE_DEPTH_BIAS: f32 = 1e-3;

/// Per-frame inputs for a draw call
pub struct Frame<'a> {
    pub camera: &'a Camera,
    pub transform: &'a ModelTransform,
    pub mesh_color: Rgba,
    pub grid_color: Rgb,
    pub wireframe: bool,
}

/// A renderer that receives mesh buffers once and draws them every frame
pub trait MeshRenderer {
    /// Upload the buffers to draw; replaces anything bound before
    fn bind(&mut self, buffers: &MeshBuffers);

    /// Draw the bound buffers into the renderer's target
    fn draw(&mut self, frame: &Frame<'_>);

    fn name(&self) -> &str;
}

/// One resolved terminal cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        color: Color::Reset,
    };
}

/// Fragment stored per coverage sample
#[derive(Debug, Clone, Copy)]
struct Sample {
    depth: f32,
    color: [f32; 3],
    intensity: f32,
}

impl Sample {
    const EMPTY: Sample = Sample {
        depth: f32::INFINITY,
        color: [0.0; 3],
        intensity: 0.0,
    };
}

/// Wireframe fragment stored per cell
#[derive(Debug, Clone, Copy)]
struct Edge {
    depth: f32,
    ch: char,
}

/// ASCII renderer that converts 3D meshes to terminal characters.
///
/// Solid geometry is drawn from the non-indexed corner stream so each corner
/// carries its own normal; the wireframe overlay walks the index buffer.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    sample_offsets: Vec<(f32, f32)>,
    samples: Vec<Sample>,
    edges: Vec<Option<Edge>>,
    cells: Vec<Cell>,
    // Bound geometry
    corner_positions: Vec<Point3<f32>>,
    corner_normals: Vec<Vector3<f32>>,
    positions: Vec<Point3<f32>>,
    indices: Vec<u32>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize, samples: u32) -> Self {
        let sample_offsets = sample_pattern(samples.max(1) as usize);
        let size = width * height;
        Self {
            width,
            height,
            samples: vec![Sample::EMPTY; size * sample_offsets.len()],
            sample_offsets,
            edges: vec![None; size],
            cells: vec![Cell::BLANK; size],
            corner_positions: Vec::new(),
            corner_normals: Vec::new(),
            positions: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Width over height of the viewport in screen units
    pub fn aspect(&self) -> f32 {
        self.width as f32 * CELL_ASPECT / self.height.max(1) as f32
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y * self.width + x])
    }

    pub fn clear(&mut self) {
        self.samples.fill(Sample::EMPTY);
        self.edges.fill(None);
        self.cells.fill(Cell::BLANK);
    }

    fn rasterize_corners(&mut self, frame: &Frame<'_>) {
        let mvp = frame.camera.view_projection() * frame.transform.matrix();
        let rotation = frame.transform.normal_matrix();
        let light = Vector3::new(1.0, 1.0, 1.0).normalize();
        let base = [
            frame.mesh_color.red,
            frame.mesh_color.green,
            frame.mesh_color.blue,
        ];
        let alpha = frame.mesh_color.alpha;

        for corner in (0..self.corner_positions.len()).step_by(3) {
            let mut screen = [ScreenPoint {
                x: 0.0,
                y: 0.0,
                depth: 0.0,
            }; 3];
            let mut shade = [0.0f32; 3];
            let mut clipped = false;

            for i in 0..3 {
                let Some(p) = project_with(
                    &mvp,
                    &self.corner_positions[corner + i],
                    self.width,
                    self.height,
                ) else {
                    clipped = true;
                    break;
                };
                screen[i] = p;

                let normal = rotation * self.corner_normals[corner + i];
                shade[i] = (AMBIENT + normal.dot(&light).max(0.0)).min(1.0);
            }

            // Triangle crosses the eye plane
            if clipped {
                continue;
            }

            self.rasterize_triangle(&screen, &shade, base, alpha);
        }
    }

    fn rasterize_triangle(
        &mut self,
        screen: &[ScreenPoint; 3],
        shade: &[f32; 3],
        base: [f32; 3],
        alpha: f32,
    ) {
        let [v0, v1, v2] = *screen;

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i64;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i64;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i64;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i64;

        // Clip to screen bounds
        let min_x = min_x.max(0) as usize;
        let max_x = max_x.min(self.width as i64 - 1);
        let min_y = min_y.max(0) as usize;
        let max_y = max_y.min(self.height as i64 - 1);
        if max_x < 0 || max_y < 0 {
            return;
        }

        let per_cell = self.sample_offsets.len();
        for y in min_y..=max_y as usize {
            for x in min_x..=max_x as usize {
                for (s, &(ox, oy)) in self.sample_offsets.iter().enumerate() {
                    let p = (x as f32 + ox, y as f32 + oy);
                    let Some((w0, w1, w2)) =
                        barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), p)
                    else {
                        continue;
                    };
                    if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                        continue;
                    }

                    let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                    if !(-1.0..=1.0).contains(&depth) {
                        continue;
                    }

                    let sample = &mut self.samples[(y * self.width + x) * per_cell + s];
                    if depth < sample.depth {
                        let intensity = w0 * shade[0] + w1 * shade[1] + w2 * shade[2];
                        *sample = Sample {
                            depth,
                            // Blended over a black background
                            color: base.map(|c| c * intensity * alpha),
                            intensity: intensity * alpha,
                        };
                    }
                }
            }
        }
    }

    fn rasterize_wireframe(&mut self, frame: &Frame<'_>) {
        let mvp = frame.camera.view_projection() * frame.transform.matrix();
        let projected: Vec<Option<ScreenPoint>> = self
            .positions
            .iter()
            .map(|p| project_with(&mvp, p, self.width, self.height))
            .collect();

        for face in 0..self.indices.len() / 3 {
            let [a, b, c] = [0, 1, 2].map(|i| self.indices[face * 3 + i] as usize);
            for (from, to) in [(a, b), (b, c), (c, a)] {
                if let (Some(from), Some(to)) = (projected[from], projected[to]) {
                    self.rasterize_line(from, to);
                }
            }
        }
    }

    fn rasterize_line(&mut self, from: ScreenPoint, to: ScreenPoint) {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let ch = edge_char(dx, dy);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        let per_cell = self.sample_offsets.len();

        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let x = (from.x + dx * t).floor();
            let y = (from.y + dy * t).floor();
            if x < 0.0 || y < 0.0 || x >= self.width as f32 || y >= self.height as f32 {
                continue;
            }
            let depth = from.depth + (to.depth - from.depth) * t;
            let idx = y as usize * self.width + x as usize;

            let surface = self.samples[idx * per_cell..(idx + 1) * per_cell]
                .iter()
                .map(|s| s.depth)
                .fold(f32::INFINITY, f32::min);
            if depth > surface + WIRE_DEPTH_BIAS {
                continue;
            }
            if self.edges[idx].map_or(true, |edge| depth < edge.depth) {
                self.edges[idx] = Some(Edge { depth, ch });
            }
        }
    }

    fn resolve(&mut self, frame: &Frame<'_>) {
        let per_cell = self.sample_offsets.len();
        let grid = to_color([
            frame.grid_color.red,
            frame.grid_color.green,
            frame.grid_color.blue,
        ]);

        for idx in 0..self.cells.len() {
            if let Some(edge) = self.edges[idx] {
                self.cells[idx] = Cell {
                    ch: edge.ch,
                    color: grid,
                };
                continue;
            }

            let samples = &self.samples[idx * per_cell..(idx + 1) * per_cell];
            let covered: Vec<&Sample> = samples.iter().filter(|s| s.depth.is_finite()).collect();
            if covered.is_empty() {
                self.cells[idx] = Cell::BLANK;
                continue;
            }

            // Uncovered samples count as black background
            let intensity = covered.iter().map(|s| s.intensity).sum::<f32>() / per_cell as f32;
            let mut color = [0.0f32; 3];
            for s in &covered {
                for (c, v) in color.iter_mut().zip(s.color) {
                    *c += v / covered.len() as f32;
                }
            }

            let ramp = (intensity * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
            // Any coverage at all shows up as at least the faintest glyph
            let ramp = ramp.clamp(1, LUMINOSITY_RAMP.len() - 1);
            self.cells[idx] = Cell {
                ch: LUMINOSITY_RAMP[ramp],
                color: to_color(color),
            };
        }
    }

    /// Write the resolved cells to `writer`, starting at terminal row `top`
    pub fn present<W: Write>(&self, writer: &mut W, top: u16) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            writer.queue(MoveTo(0, top + y as u16))?;
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                if current != Some(cell.color) {
                    writer.queue(SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.ch))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl MeshRenderer for AsciiRenderer {
    fn bind(&mut self, buffers: &MeshBuffers) {
        let (corner_positions, corner_normals): (Vec<_>, Vec<_>) = (0..buffers.corner_count())
            .filter_map(|corner| buffers.corner(corner))
            .unzip();
        self.corner_positions = corner_positions;
        self.corner_normals = corner_normals;
        self.positions = buffers
            .positions()
            .chunks_exact(3)
            .map(|p| Point3::new(p[0], p[1], p[2]))
            .collect();
        self.indices = buffers.indices().to_vec();
    }

    fn draw(&mut self, frame: &Frame<'_>) {
        self.clear();
        self.rasterize_corners(frame);
        if frame.wireframe {
            self.rasterize_wireframe(frame);
        }
        self.resolve(frame);
    }

    fn name(&self) -> &str {
        "ascii"
    }
}

/// Sub-cell sample positions on a stratified grid, `count` of them
fn sample_pattern(count: usize) -> Vec<(f32, f32)> {
    let side = (count as f32).sqrt().ceil() as usize;
    (0..side * side)
        .map(|i| {
            let (col, row) = (i % side, i / side);
            (
                (col as f32 + 0.5) / side as f32,
                (row as f32 + 0.5) / side as f32,
            )
        })
        .take(count)
        .collect()
}

/// Line glyph for a screen-space edge direction (y grows downwards)
fn edge_char(dx: f32, dy: f32) -> char {
    // Compare slopes in square units rather than cells
    let (wx, wy) = (dx.abs() * CELL_ASPECT, dy.abs());
    if wy < 0.5 * wx {
        '-'
    } else if wx < 0.5 * wy {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

fn to_color(rgb: [f32; 3]) -> Color {
    let [r, g, b] = rgb.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    Color::Rgb { r, g, b }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
