/// meshview - spin an OBJ mesh in the terminal
///
/// Controls:
///   - Arrow Keys / WASD: Rotate the mesh
///   - G: Toggle the wireframe overlay
///   - Space: Pause the idle spin
///   - Q/ESC: Quit
use std::path::PathBuf;
use std::process;

use clap::Parser;
use meshview_core::load_buffers;
use meshview_terminal::{ShellError, TerminalApp, ViewerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "meshview")]
#[command(version, about = "Render an OBJ mesh with flat lighting in the terminal")]
struct Cli {
    /// Mesh to display (vertex and triangle records of the OBJ format)
    #[arg(default_value = "teapot.obj")]
    mesh: PathBuf,

    /// Viewer configuration (TOML)
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Print mesh statistics and exit without opening the viewer
    #[arg(long)]
    info: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        tracing::error!("{e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), ShellError> {
    let config = ViewerConfig::load(&cli.config)?;

    if cli.dump_config {
        let text = toml::to_string_pretty(&config).map_err(|e| ShellError::Config {
            path: cli.config.clone(),
            source: meshview_terminal::config::ConfigError::Invalid(e.to_string()),
        })?;
        print!("{text}");
        return Ok(());
    }

    // Everything that can fail on the input happens before the terminal is touched
    let buffers = load_buffers(&cli.mesh)?;

    if let Some((min, max)) = buffers.bounds() {
        tracing::info!(
            vertices = buffers.vertex_count(),
            faces = buffers.face_count(),
            min = ?min.coords.as_slice(),
            max = ?max.coords.as_slice(),
            "mesh ready"
        );
    }

    if cli.info {
        println!("mesh:     {}", cli.mesh.display());
        println!("vertices: {}", buffers.vertex_count());
        println!("faces:    {}", buffers.face_count());
        println!("normals:  {} (one per face corner)", buffers.corner_count());
        if let Some((min, max)) = buffers.bounds() {
            println!("bounds:   [{}, {}, {}] .. [{}, {}, {}]", min.x, min.y, min.z, max.x, max.y, max.z);
        }
        return Ok(());
    }

    let mut app = TerminalApp::new(buffers, config)?;
    app.run()
}
