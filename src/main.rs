use anyhow::{Context, Result, anyhow};
use clap::{ArgAction, Parser, Subcommand};
use pixelwright::Config;
use pixelwright::input::InputState;
use pixelwright::script::{Script, ascii_frame};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "pixelwright")]
#[command(
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("PIXELWRIGHT_GIT_HASH"), ")"),
    about = "Raster sprite engine for layered, animated pixel art"
)]
struct Cli {
    /// Load configuration from this file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long, action = ArgAction::SetTrue)]
    print_config: bool,

    /// Write the commented example configuration to the default location
    #[arg(long, action = ArgAction::SetTrue)]
    init_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a TOML gesture script and print the resulting sprite
    Replay {
        /// Gesture script to run
        script: PathBuf,

        /// Frame to print (1-based), defaults to the active frame
        #[arg(long, value_name = "N")]
        frame: Option<usize>,

        /// Write the composited active frame as PNG
        #[cfg(feature = "cairo")]
        #[arg(long, value_name = "PATH")]
        png: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.init_config {
        let path = Config::create_default_file()?;
        println!("Wrote example configuration to {}", path.display());
        return Ok(());
    }

    let config = load_config(cli.config.as_deref())?;

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    match cli.command {
        Some(Command::Replay {
            script,
            frame,
            #[cfg(feature = "cairo")]
            png,
        }) => {
            let state = replay(config, &script, frame)?;
            #[cfg(feature = "cairo")]
            {
                if let Some(path) = png {
                    write_png(state, &path)?;
                }
            }
            #[cfg(not(feature = "cairo"))]
            drop(state);
        }
        None => {
            println!("pixelwright: Raster sprite engine for layered, animated pixel art");
            println!();
            println!("Usage:");
            println!("  pixelwright replay <SCRIPT>   Replay a gesture script and print the sprite");
            println!("  pixelwright --print-config    Show the effective configuration");
            println!("  pixelwright --init-config     Write the example configuration");
            println!("  pixelwright --help            Show help");
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(anyhow!("Config file {} does not exist", path.display()));
            }
            Config::load_from(path)
        }
        None => Config::load(),
    }
}

fn display_size(config: &Config) -> (u32, u32) {
    let cell = config.canvas.cell_size;
    let side = |cells: u32| ((cells as f64 * cell).round() as u32).max(1);
    (side(config.canvas.grid_width), side(config.canvas.grid_height))
}

fn replay(mut config: Config, script_path: &Path, frame: Option<usize>) -> Result<InputState> {
    let script = Script::load(script_path)?;
    if let Some(canvas) = script.canvas {
        config.canvas.grid_width = canvas.width;
        config.canvas.grid_height = canvas.height;
        config.validate_and_clamp();
    }

    let (width, height) = display_size(&config);
    let mut state = InputState::from_config(&config, width, height)
        .map_err(|e| anyhow!("Invalid keybindings: {e}"))?;

    let report = script.replay(&mut state)?;
    log::info!(
        "Script {} finished: {} events",
        script_path.display(),
        report.events
    );

    let sprite = &state.sprite;
    let index = match frame {
        Some(n) => n
            .checked_sub(1)
            .filter(|i| *i < sprite.frames.len())
            .with_context(|| format!("Frame {n} out of range (1-{})", sprite.frames.len()))?,
        None => sprite.active_frame,
    };
    let shown = &sprite.frames[index];

    println!(
        "sprite {}x{}, {} frame(s), {} commit(s)",
        sprite.width(),
        sprite.height(),
        sprite.frames.len(),
        report.commits
    );
    println!(
        "frame {}/{} \"{}\": {} layer(s)",
        index + 1,
        sprite.frames.len(),
        shown.name,
        shown.layers.len()
    );
    let colors: Vec<String> = sprite.colors_in_use().iter().map(|c| c.to_string()).collect();
    if colors.is_empty() {
        println!("colors: none");
    } else {
        println!("colors: {}", colors.join(" "));
    }
    print!("{}", ascii_frame(shown));

    Ok(state)
}

#[cfg(feature = "cairo")]
fn write_png(mut state: InputState, path: &Path) -> Result<()> {
    use pixelwright::draw::CairoSurface;

    let (width, height) = state.viewport.display_dimensions();
    let mut surface = CairoSurface::new(width as u32, height as u32)
        .map_err(|e| anyhow!("Failed to create Cairo surface: {e}"))?;
    state.render(&mut surface);
    surface
        .write_png(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
