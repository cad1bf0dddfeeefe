use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use formats::{AssetBundle, AssetError};
use globe::interaction::PointerCommand;
use globe::{FocusSignal, GlobeConfig, GlobeEngine, GlobeError, GlobeMount, MountState, Viewport};
use runtime::DeviceProfile;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless run of the globe engine; writes an SVG snapshot")]
struct Args {
    /// Asset directory (assets.json, base map, country and region datasets, theme)
    #[arg(long, default_value = "crates/apps/globe_demo/assets")]
    assets: PathBuf,

    /// Optional engine config JSON; missing keys keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    #[arg(long, default_value_t = 800.0)]
    height: f64,

    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Force the low-power performance policy
    #[arg(long)]
    low_power: bool,

    /// Pick the performance policy from a browser user agent instead
    #[arg(long)]
    user_agent: Option<String>,

    /// Touch points reported alongside `--user-agent`
    #[arg(long, default_value_t = 0)]
    touch_points: u32,

    /// Horizontal drag applied early in the run (px)
    #[arg(long, default_value_t = 120.0)]
    drag_px: f64,

    /// Click this canvas point (x,y) after the drag
    #[arg(long, value_parser = parse_point)]
    click: Option<[f64; 2]>,

    /// Focus region to zoom into after the drag
    #[arg(long)]
    focus: Option<String>,

    /// Total frames to simulate
    #[arg(long, default_value_t = 240)]
    frames: u32,

    /// Output SVG path
    #[arg(long, default_value = "globe.svg")]
    out: PathBuf,
}

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Globe(#[from] GlobeError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("globe failed to mount: {0}")]
    Mount(String),
}

fn parse_point(s: &str) -> Result<[f64; 2], String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got {s:?}"))?;
    let parse = |v: &str| v.trim().parse::<f64>().map_err(|e| format!("{v:?}: {e}"));
    Ok([parse(x)?, parse(y)?])
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "globe demo failed");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<GlobeConfig, DemoError> {
    let Some(path) = path else {
        return Ok(GlobeConfig::default());
    };
    let payload = fs::read_to_string(path).map_err(|source| DemoError::Read {
        path: path.clone(),
        source,
    })?;
    Ok(GlobeConfig::from_json_str(&payload)?)
}

fn run(args: &Args) -> Result<(), DemoError> {
    let config = load_config(args.config.as_ref())?;
    let viewport = Viewport::new(args.width, args.height, args.dpr)?;
    let device = match &args.user_agent {
        _ if args.low_power => DeviceProfile { low_power: true },
        Some(ua) => DeviceProfile::detect(ua, args.touch_points, args.width),
        None => DeviceProfile::desktop(),
    };

    let mut mount = GlobeMount::new();
    let state = mount.mount(|| {
        let assets = AssetBundle::load_dir(&args.assets)?;
        GlobeEngine::for_device(config, assets, viewport, device)
    });
    if let MountState::Failed(message) = state {
        return Err(DemoError::Mount(message.clone()));
    }

    let cy = args.height / 2.0;
    let mut now = 0.0;
    for frame in 0..args.frames {
        if let Some(engine) = mount.engine_mut() {
            script(engine, args, frame, cy)?;
        }
        if !mount.frame(now) {
            break;
        }
        now += FRAME_MS;

        if let Some(engine) = mount.engine_mut() {
            for event in engine.drain_events() {
                match serde_json::to_string(&event.payload) {
                    Ok(json) => info!(frame = event.frame_index, event = %json, "engine event"),
                    Err(err) => error!(error = %err, "event not serializable"),
                }
            }
        }
    }

    let Some(engine) = mount.engine() else {
        return Err(DemoError::Mount("engine missing after run".to_string()));
    };
    let svg = engine.to_svg();
    fs::write(&args.out, &svg).map_err(|source| DemoError::Write {
        path: args.out.clone(),
        source,
    })?;
    info!(
        path = %args.out.display(),
        bytes = svg.len(),
        mode = ?engine.mode(),
        metrics = ?engine.metrics().snapshot(),
        "snapshot written"
    );
    mount.teardown();
    Ok(())
}

/// Scripted input: drag, then an optional click, then an optional focus.
fn script(engine: &mut GlobeEngine, args: &Args, frame: u32, cy: f64) -> Result<(), DemoError> {
    match frame {
        10 => {
            engine.pointer(PointerCommand::Down { x: 20.0, y: cy })?;
            engine.pointer(PointerCommand::Move {
                x: 20.0 + args.drag_px,
                y: cy,
            })?;
            engine.pointer(PointerCommand::Up {
                x: 20.0 + args.drag_px,
                y: cy,
            })?;
        }
        20 => {
            if let Some([x, y]) = args.click {
                engine.pointer(PointerCommand::Down { x, y })?;
                engine.pointer(PointerCommand::Up { x, y })?;
            }
        }
        30 => {
            if let Some(region) = &args.focus {
                engine.focus_signal(FocusSignal {
                    region_id: region.clone(),
                    active: true,
                })?;
            }
        }
        _ => {}
    }
    Ok(())
}
