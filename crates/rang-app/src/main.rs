//! `rang` command line tool over the file backend.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use kurbo::Point;
use rang_app::AppConfig;
use rang_core::backend::{FileBackend, RoomDirectory, StrokeLog};
use rang_core::color::parse_css_color;
use rang_core::simplify::{DEFAULT_TOLERANCE, simplify_stroke};
use rang_render::{StrokeRenderer, Surface};
use std::io::{self, Read, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rang", version, about = "Inspect and export Rang drawing rooms")]
struct Cli {
    /// Config file (JSON). Defaults to the platform config directory.
    #[arg(long, env = "RANG_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding room files. Overrides the config file.
    #[arg(long, env = "RANG_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List rooms.
    Rooms {
        /// Only rooms with active users.
        #[arg(long)]
        active: bool,
    },
    /// List active users of a room.
    Users {
        #[arg(long)]
        room: String,
    },
    /// Replay a room's strokes and write a PNG.
    Export {
        #[arg(long)]
        room: String,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        /// Background color, e.g. `#ffffff`.
        #[arg(long, conflicts_with = "transparent")]
        background: Option<String>,
        /// Keep erased and empty areas transparent.
        #[arg(long)]
        transparent: bool,
    },
    /// Simplify a JSON array of points read from stdin.
    Simplify {
        #[arg(long)]
        tolerance: Option<f64>,
    },
    /// Remove every stroke of a room. Only its creator may do this.
    Clear {
        #[arg(long)]
        room: String,
        #[arg(long)]
        user: String,
    },
    /// Delete a room with no active users.
    DeleteRoom {
        #[arg(long)]
        room: String,
    },
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let path = cli.config.clone().or_else(AppConfig::default_path);
    let mut config = match path {
        Some(path) => AppConfig::load(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    Ok(config)
}

fn open_backend(config: &AppConfig) -> Result<FileBackend> {
    let dir = config.data_dir()?;
    log::debug!("Using room data in {}", dir.display());
    Ok(FileBackend::new(dir)?)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    pollster::block_on(run(cli.command, config))
}

async fn run(command: Command, config: AppConfig) -> Result<()> {
    match command {
        Command::Rooms { active } => {
            let backend = open_backend(&config)?;
            let rooms = if active {
                backend.active_rooms().await?
            } else {
                backend.list_rooms()?
            };
            for room in rooms {
                println!(
                    "{}\t{}\t{} active\tcreated by {}",
                    room.id, room.name, room.active_users, room.created_by
                );
            }
        }
        Command::Users { room } => {
            let backend = open_backend(&config)?;
            for user in backend.users_in_room(&room).await? {
                let state = if user.is_drawing { "drawing" } else { "idle" };
                println!("{}\t{}\t{}", user.id, user.name, state);
            }
        }
        Command::Export {
            room,
            out,
            width,
            height,
            background,
            transparent,
        } => {
            let backend = open_backend(&config)?;
            if backend.get_room(&room).await?.is_none() {
                bail!("room {} not found", room);
            }
            let strokes = backend.fetch_strokes(&room).await?;

            let mut surface = Surface::new(
                width.unwrap_or(config.width),
                height.unwrap_or(config.height),
            )?;
            surface.replay(&strokes);

            let background = if transparent {
                None
            } else {
                match background {
                    Some(color) => Some(parse_css_color(&color)?),
                    None => config.background_color()?,
                }
            };
            let png = surface.to_png(background)?;
            std::fs::write(&out, png)
                .with_context(|| format!("writing {}", out.display()))?;
            log::info!("Exported {} strokes to {}", strokes.len(), out.display());
        }
        Command::Simplify { tolerance } => {
            let tolerance = tolerance
                .or(config.tolerance)
                .unwrap_or(DEFAULT_TOLERANCE);
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            let points: Vec<Point> =
                serde_json::from_str(&input).context("expected a JSON array of {x, y} points")?;

            let simplified = simplify_stroke(&points, tolerance);
            log::info!("Simplified {} points to {}", points.len(), simplified.len());
            let mut stdout = io::stdout().lock();
            serde_json::to_writer(&mut stdout, &simplified)?;
            writeln!(stdout)?;
        }
        Command::Clear { room, user } => {
            let backend = open_backend(&config)?;
            let result = backend.clear_room_strokes(&room, &user).await?;
            if !result.success {
                bail!(result.message.unwrap_or_else(|| "clear refused".to_string()));
            }
            println!("Cleared room {}", room);
        }
        Command::DeleteRoom { room } => {
            let backend = open_backend(&config)?;
            let result = backend.delete_room(&room).await?;
            if !result.success {
                bail!(result.message.unwrap_or_else(|| "delete refused".to_string()));
            }
            println!("Deleted room {}", room);
        }
    }
    Ok(())
}
