use std::any::Any;
use std::env;
use std::fmt;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use pollster::block_on;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use showcase::{
    HeadlessRenderer, LightRig, Mat4, Material, ModelData, RenderSession, Renderer, SceneConfig,
    SceneResources, ShaderSources, TextureImage,
};

const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 720;
const DEFAULT_FRAMES: u64 = 3;
const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;
    let resources = load_resources(&options.assets)?;
    let config = load_config(&options)?;
    let lights_path = options.lights_path();
    let lights = match &lights_path {
        Some(path) => load_lights(path)?,
        None => LightRig::default_rig(),
    };

    println!(
        "Loaded model with {} vertices ({} triangles)",
        resources.model.vertex_count(),
        resources.model.triangle_count()
    );
    print_material(&resources.material);
    print_lights(&lights);

    if options.summary_only {
        run_headless(&resources, config, lights, options.frames)
    } else {
        let fallback = (config.clone(), lights.clone());
        match run_interactive(resources.clone(), config, lights, lights_path) {
            Ok(()) => Ok(()),
            Err(err) => {
                if err.downcast_ref::<WindowInitError>().is_some() {
                    eprintln!(
                        "{err}. Falling back to --summary-only mode (set DISPLAY or install X11 libs to enable rendering)."
                    );
                    let (config, lights) = fallback;
                    run_headless(&resources, config, lights, options.frames)
                } else {
                    Err(err)
                }
            }
        }
    }
}

fn run_headless(
    resources: &SceneResources,
    config: SceneConfig,
    lights: LightRig,
    frames: u64,
) -> Result<()> {
    let mut session = RenderSession::new(
        config,
        resources.material,
        lights,
        WINDOW_WIDTH,
        WINDOW_HEIGHT,
    );
    print_matrix("View", session.view());
    print_matrix("Projection", session.projection());

    let mut backend = HeadlessRenderer::new();
    session.begin(&mut backend);
    for index in 0..frames {
        let stats = match session.frame(&mut backend, headless_elapsed(index)) {
            Ok(stats) => stats,
            Err(never) => match never {},
        };
        println!(
            "Frame {} angle={:.4} flushed={} bytes",
            stats.frame,
            stats.angle,
            backend.last_flush()
        );
    }
    println!("Rendered {} frame(s)", session.frames_rendered());
    Ok(())
}

/// Simulated time of headless frame `index`, spaced one refresh apart.
fn headless_elapsed(index: u64) -> Duration {
    FRAME_INTERVAL.mul_f64(index as f64)
}

fn run_interactive(
    resources: SceneResources,
    config: SceneConfig,
    lights: LightRig,
    lights_path: Option<PathBuf>,
) -> Result<()> {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
    panic::set_hook(default_hook);
    let event_loop = event_loop
        .map_err(|panic| WindowInitError::from_panic("event loop", panic))?
        .map_err(|err| WindowInitError::from_error("event loop", err))?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Showcase")
            .with_inner_size(LogicalSize::new(WINDOW_WIDTH as f64, WINDOW_HEIGHT as f64))
            .build(&event_loop)
            .map_err(|err| WindowInitError::from_error("window", err))?,
    );

    let mut renderer = block_on(Renderer::new(Arc::clone(&window), &resources))?;
    let size = renderer.size();
    let session = RenderSession::new(config, resources.material, lights, size.width, size.height);
    session.begin(&mut renderer);

    let mut app = AppState {
        renderer,
        session,
        lights_path,
        started: Instant::now(),
        last_error: None,
    };

    event_loop.run(|event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);
        match app.process_event(&event) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => elwt.exit(),
            Err(err) => {
                app.last_error = Some(err);
                elwt.exit();
            }
        }
    })?;

    println!("Rendered {} frame(s)", app.session.frames_rendered());
    if let Some(err) = app.last_error {
        return Err(err);
    }

    Ok(())
}

struct AppState {
    renderer: Renderer,
    session: RenderSession,
    lights_path: Option<PathBuf>,
    started: Instant,
    last_error: Option<anyhow::Error>,
}

enum Flow {
    Continue,
    Exit,
}

#[derive(Debug)]
struct WindowInitError {
    message: String,
}

impl WindowInitError {
    fn from_panic(stage: &str, panic: Box<dyn Any + Send>) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {}", panic_message(panic)),
        }
    }

    fn from_error(stage: &str, err: impl fmt::Display) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {err}"),
        }
    }
}

impl fmt::Display for WindowInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for WindowInitError {}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".into(),
        },
    }
}

impl AppState {
    fn process_event(&mut self, event: &Event<()>) -> Result<Flow> {
        match event {
            Event::WindowEvent { event, window_id } if *window_id == self.renderer.window_id() => {
                match event {
                    WindowEvent::CloseRequested => return Ok(Flow::Exit),
                    WindowEvent::Resized(size) => {
                        if size.width > 0 && size.height > 0 {
                            self.renderer.resize(*size);
                            self.session
                                .resize(&mut self.renderer, size.width, size.height);
                        }
                    }
                    WindowEvent::KeyboardInput { event, .. } => return Ok(self.handle_key(event)),
                    WindowEvent::RedrawRequested => self.redraw()?,
                    _ => {}
                }
            }
            Event::AboutToWait => {
                self.renderer.window().request_redraw();
            }
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn redraw(&mut self) -> Result<()> {
        match self.session.frame(&mut self.renderer, self.started.elapsed()) {
            Ok(stats) => debug!("frame {} angle={:.4}", stats.frame, stats.angle),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = self.renderer.window().inner_size();
                self.renderer.resize(size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(anyhow!("GPU is out of memory"));
            }
            Err(wgpu::SurfaceError::Timeout) => {
                info!("Surface timeout; retrying next frame");
            }
            Err(err) => warn!("Skipping frame: {err}"),
        }
        Ok(())
    }

    fn handle_key(&mut self, event: &KeyEvent) -> Flow {
        if event.state != ElementState::Pressed || event.repeat {
            return Flow::Continue;
        }
        match event.physical_key {
            PhysicalKey::Code(KeyCode::Escape) => Flow::Exit,
            PhysicalKey::Code(KeyCode::KeyL) => {
                self.reload_lights();
                Flow::Continue
            }
            _ => Flow::Continue,
        }
    }

    fn reload_lights(&mut self) {
        let Some(path) = self.lights_path.as_deref() else {
            info!("No lights file to reload");
            return;
        };
        match load_lights(path) {
            Ok(lights) => {
                info!("Reloaded direction lights from {}", path.display());
                self.session.update_direction_lights(&mut self.renderer, lights);
            }
            Err(err) => error!("{err:#}"),
        }
    }
}

fn load_resources(dir: &Path) -> Result<SceneResources> {
    let model = ModelData::from_json_str(&read_text(&dir.join("model.json"))?)
        .context("failed to parse model.json")?;

    let material_path = dir.join("material.json");
    let material = if material_path.exists() {
        Material::from_json_str(&read_text(&material_path)?)
            .context("failed to parse material.json")?
    } else {
        info!("No material.json in {}; using defaults", dir.display());
        Material::default()
    };

    let texture_path = dir.join("texture.png");
    let texture = if texture_path.exists() {
        let bytes = fs::read(&texture_path)
            .with_context(|| format!("failed to read {}", texture_path.display()))?;
        TextureImage::decode(&bytes).context("failed to decode texture.png")?
    } else {
        info!("No texture.png in {}; using plain white", dir.display());
        TextureImage::white()
    };

    let shaders = ShaderSources {
        vertex: read_text(&dir.join("vertex.wgsl"))?,
        fragment: read_text(&dir.join("fragment.wgsl"))?,
    };

    Ok(SceneResources {
        model,
        material,
        texture,
        shaders,
    })
}

fn load_config(options: &CliOptions) -> Result<SceneConfig> {
    let path = match &options.config {
        Some(path) => path.clone(),
        None => {
            let path = options.assets.join("scene.json");
            if !path.exists() {
                return Ok(SceneConfig::default());
            }
            path
        }
    };
    SceneConfig::from_json_str(&read_text(&path)?)
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn load_lights(path: &Path) -> Result<LightRig> {
    LightRig::from_json_str(&read_text(path)?)
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_material(material: &Material) {
    let [sr, sg, sb] = material.specular;
    let [er, eg, eb] = material.emission;
    println!(
        "Material specular=({sr:.2}, {sg:.2}, {sb:.2}) emission=({er:.2}, {eg:.2}, {eb:.2}) roughness={:.2} metallic={:.2}",
        material.roughness, material.metallic
    );
}

fn print_lights(lights: &LightRig) {
    println!("Direction lights ({} lit):", lights.lit_count());
    for light in lights.lights() {
        let [ir, ig, ib] = light.intensity;
        let [dx, dy, dz] = light.direction;
        println!(
            " - [{}] intensity=({ir:.2}, {ig:.2}, {ib:.2}) direction=({dx:.2}, {dy:.2}, {dz:.2})",
            light.slot
        );
    }
}

fn print_matrix(name: &str, m: &Mat4) {
    println!("{name} matrix:");
    for row in m.chunks_exact(4) {
        println!(
            "  [{:9.4} {:9.4} {:9.4} {:9.4}]",
            row[0], row[1], row[2], row[3]
        );
    }
}

struct CliOptions {
    assets: PathBuf,
    summary_only: bool,
    frames: u64,
    lights: Option<PathBuf>,
    config: Option<PathBuf>,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        const USAGE: &str = "Usage: showcase <assets-dir> [--summary-only] [--frames N] [--lights FILE] [--config FILE]";

        let mut args = env::args().skip(1);
        let Some(assets) = args.next() else {
            return Err(anyhow!(USAGE));
        };
        let mut options = Self {
            assets: PathBuf::from(assets),
            summary_only: false,
            frames: DEFAULT_FRAMES,
            lights: None,
            config: None,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--summary-only" => options.summary_only = true,
                "--frames" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--frames expects a count"))?;
                    options.frames = value
                        .parse()
                        .with_context(|| format!("invalid frame count: {value}"))?;
                }
                "--lights" => {
                    let value = args.next().ok_or_else(|| anyhow!("--lights expects a file"))?;
                    options.lights = Some(PathBuf::from(value));
                }
                "--config" => {
                    let value = args.next().ok_or_else(|| anyhow!("--config expects a file"))?;
                    options.config = Some(PathBuf::from(value));
                }
                other => {
                    return Err(anyhow!("Unknown argument: {other}. {USAGE}"));
                }
            }
        }
        Ok(options)
    }

    /// Explicit `--lights` wins; otherwise `lights.json` next to the assets.
    fn lights_path(&self) -> Option<PathBuf> {
        self.lights.clone().or_else(|| {
            let path = self.assets.join("lights.json");
            path.exists().then_some(path)
        })
    }
}
