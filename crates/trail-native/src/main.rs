mod present;

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use trail_core::{action_for_key, apply_action, EffectConfig, Engine};
use winit::{
    event::*,
    event_loop::{ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use present::GpuState;

/// Fixed step used when there is no display clock to follow.
const HEADLESS_FRAME: Duration = Duration::from_micros(16_667);

#[derive(Parser, Debug)]
#[command(name = "flowtrail")]
#[command(about = "Flow-field particle trails", long_about = None)]
#[command(version)]
struct Args {
    /// TOML file overriding the default effect parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for spawning and the flow field
    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Render this many frames without a window and exit
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u32>,

    /// Directory for headless PNG frames
    #[arg(long, default_value = "frames")]
    out: PathBuf,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EffectConfig> {
    let Some(path) = path else {
        return Ok(EffectConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg = EffectConfig::from_toml_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    log::info!("[config] loaded {}", path.display());
    Ok(cfg)
}

fn run_headless(args: &Args, cfg: &EffectConfig, frames: u32) -> anyhow::Result<()> {
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating output dir {}", args.out.display()))?;
    let mut engine = Engine::new(args.width, args.height, args.seed);
    let started = Instant::now();
    for i in 0..frames {
        engine.tick(HEADLESS_FRAME, cfg, None);
        let path = args.out.join(format!("frame_{i:05}.png"));
        engine
            .frame()
            .to_rgba8()
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    log::info!(
        "[headless] {} frames to {} in {:.2?} ({} particles live)",
        frames,
        args.out.display(),
        started.elapsed(),
        engine.particle_count()
    );
    engine.stop();
    Ok(())
}

fn run_windowed(args: &Args, mut cfg: EffectConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("creating event loop")?;
    let window = WindowBuilder::new()
        .with_title("flowtrail")
        .with_inner_size(winit::dpi::PhysicalSize::new(args.width, args.height))
        .build(&event_loop)
        .context("creating window")?;

    let mut state = pollster::block_on(GpuState::new(&window)).context("initialising GPU")?;
    let size = window.inner_size();
    let mut engine = Engine::new(size.width, size.height, args.seed);
    let mut paused = false;
    let mut last_frame = Instant::now();

    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::Resized(size),
                ..
            } => {
                state.resize(size);
                engine.resize(size.width, size.height);
            }
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                engine.stop();
                elwt.exit();
            }
            Event::WindowEvent {
                event:
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                logical_key,
                                state: ElementState::Pressed,
                                ..
                            },
                        ..
                    },
                ..
            } => {
                let key = match &logical_key {
                    Key::Named(NamedKey::Escape) => {
                        engine.stop();
                        elwt.exit();
                        return;
                    }
                    Key::Named(NamedKey::Space) => " ",
                    Key::Character(c) => c.as_str(),
                    _ => return,
                };
                if let Some(action) = action_for_key(key) {
                    apply_action(action, &mut cfg, &mut paused);
                }
            }
            Event::AboutToWait => {
                let now = Instant::now();
                let dt = now - last_frame;
                last_frame = now;
                if !paused {
                    engine.tick(dt, &cfg, None);
                }
                match state.render(engine.frame()) {
                    Ok(_) => state.window.request_redraw(),
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        state.reconfigure()
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("[present] out of GPU memory");
                        elwt.exit();
                    }
                    Err(e) => log::warn!("[present] {e:?}"),
                }
            }
            _ => {}
        })
        .context("running event loop")?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let cfg = load_config(args.config.as_deref())?;

    match args.headless {
        Some(frames) => run_headless(&args, &cfg, frames),
        None => run_windowed(&args, cfg),
    }
}
