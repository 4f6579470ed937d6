//! Oxidized-Retro - libretro core loader
//!
//! Binds a core for a content file, lets it negotiate its environment while
//! loading the content, and reports what it asked for.

use anyhow::{bail, Context};
use clap::Parser;
use or_core::{fatal, logging, Config, LogLevel};
use or_integration::CoreSession;
use or_loader::{core_pathname, ContentInfo};
use std::path::PathBuf;

/// Load a libretro core and report its negotiated environment
#[derive(Parser, Debug)]
#[command(name = "oxidized-retro")]
#[command(version, about)]
struct Cli {
    /// Content (game) file to load
    content: PathBuf,

    /// Core library, or a directory to search for one
    #[arg(short = 'L', long)]
    core: Option<PathBuf>,

    /// Config file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// BIOS/firmware directory handed to the core
    #[arg(long)]
    system_dir: Option<PathBuf>,

    /// Core variables, `key=value` pairs separated by `;`
    #[arg(long)]
    variables: Option<String>,

    /// off, error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<LogLevel>,
}

fn load_config(cli: &Cli) -> Config {
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            logging::init(cli.log_level.unwrap_or_default());
            fatal("Failed to load configuration", &e);
        }
    };

    if let Some(core) = &cli.core {
        config.core.path = core.clone();
    }
    if let Some(dir) = &cli.system_dir {
        config.paths.system_directory = Some(dir.clone());
    }
    if let Some(variables) = &cli.variables {
        config.core.variables = variables.clone();
    }
    if let Some(level) = cli.log_level {
        config.debug.log_level = level;
    }
    config
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli);
    logging::init(config.debug.log_level);

    tracing::info!("Starting Oxidized-Retro");

    // SAFETY: the core path comes from the user's own config or command line.
    let session = match unsafe { CoreSession::bind(&config, &cli.content) } {
        Ok(session) => session,
        Err(e) => fatal("Failed to load libretro core", &e),
    };

    let core = session.core();
    let info = core.system_info();
    tracing::info!(
        "Core: {} {} ({}), extensions: {}",
        info.library_name,
        info.library_version,
        core_pathname(&info),
        info.valid_extensions
    );

    // Read before init so a failure here leaves nothing to deinit.
    let data = if info.need_fullpath {
        None
    } else {
        Some(
            std::fs::read(&cli.content)
                .with_context(|| format!("Failed to read content {:?}", cli.content))?,
        )
    };

    core.init();
    let content = ContentInfo {
        path: Some(cli.content.as_path()),
        data: data.as_deref(),
        meta: None,
    };
    if !core.load_game(&content) {
        core.deinit();
        bail!("Core refused to load {:?}", cli.content);
    }

    let av = core.system_av_info();
    tracing::info!(
        "Video: {}x{} (max {}x{}), {:.2} fps, audio {} Hz",
        av.geometry.base_width,
        av.geometry.base_height,
        av.geometry.max_width,
        av.geometry.max_height,
        av.timing.fps,
        av.timing.sample_rate
    );

    session.with_environment(|env| {
        let state = env.state();
        tracing::info!("Pixel format: {}", state.pixel_format.name());
        tracing::info!("Rotation: {} degrees", state.rotation.degrees());
        tracing::info!("Video driver: {}", env.video().selected());
        if let Some(render) = &state.hw_render {
            tracing::info!(
                "Hardware rendering: context {} v{}.{}",
                render.context_type,
                render.version_major,
                render.version_minor
            );
        }
        for (port, id, description) in state.input_descriptors.iter() {
            tracing::info!("Player {} {}: {}", port + 1, or_environ::BUTTON_NAMES[id], description);
        }
        for variable in &state.declared_variables {
            tracing::info!("Option {}: {}", variable.key, variable.description.as_deref().unwrap_or(""));
        }
        if let Some(messages) = env.messages_mut() {
            for message in messages.iter() {
                tracing::info!("Message ({} frames): {}", message.remaining_frames, message.text);
            }
            messages.clear();
        }
    });

    if session.shutdown_requested() {
        tracing::info!("Core requested shutdown");
    }

    core.unload_game();
    core.deinit();
    drop(session);

    tracing::info!("Done");
    Ok(())
}
