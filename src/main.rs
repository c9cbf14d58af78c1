//! The showroom: a lit, shadowed scene you can walk around in

use std::path::PathBuf;

use clap::Parser;
use showroom::prelude::*;

/// Command line options
#[derive(Parser)]
#[command(name = "showroom", about = "Walk around a small 3D showroom")]
struct Cli {
    /// Scene file (.ron or .json); defaults to <asset-root>/scene.ron, then the built-in scene
    scene: Option<PathBuf>,

    /// Directory scene asset paths are relative to
    #[arg(long, default_value = "assets")]
    asset_root: PathBuf,

    /// Disable VSync
    #[arg(long)]
    no_vsync: bool,

    /// Start with audio muted
    #[arg(long)]
    mute: bool,

    /// Master volume applied on top of the scene's music volume
    #[arg(long, default_value_t = 1.0)]
    volume: f32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Name the background track is registered under
const MUSIC: &str = "music";

struct ShowroomGame {
    scene: SceneConfig,
    asset_root: PathBuf,
    frame: FrameState,
    bindings: KeyBindings,
    stage: Option<Stage>,
    audio: Option<AudioManager>,
    start_muted: bool,
    master_volume: f32,
}

impl ShowroomGame {
    fn new(scene: SceneConfig, asset_root: PathBuf, start_muted: bool, master_volume: f32) -> Self {
        let frame = scene.frame_state();
        Self {
            scene,
            asset_root,
            frame,
            bindings: KeyBindings::wasd(),
            stage: None,
            audio: None,
            start_muted,
            master_volume,
        }
    }

    fn start_music(&mut self) {
        let Some(music) = &self.scene.music else {
            return;
        };

        let mut audio = match AudioManager::new() {
            Ok(audio) => audio,
            Err(e) => {
                log::warn!("Audio disabled: {e}");
                return;
            }
        };

        audio.set_master_volume(self.master_volume);
        if self.start_muted {
            audio.mute();
        }

        let path = showroom::stage::asset_path(&self.asset_root, &music.path);
        let playback = Playback {
            looping: music.looping,
            volume: music.volume,
        };
        match audio.load(MUSIC, &path, playback) {
            Ok(()) => {
                audio.play(MUSIC);
                log::info!("Playing {}", path.display());
            }
            Err(e) => log::error!("Music unavailable: {e}"),
        }

        self.audio = Some(audio);
    }
}

impl Game for ShowroomGame {
    fn init(&mut self, ctx: &mut EngineContext) {
        log::info!("Building scene '{}'", self.scene.name);

        self.frame.camera.set_aspect(ctx.width(), ctx.height());
        if let Some(renderer) = ctx.renderer_mut() {
            self.stage = Some(Stage::build(renderer, &self.scene, &self.asset_root));
        }

        self.start_music();
        log::info!("Click to look around, WASD to move, M to mute, Esc to release the mouse");
    }

    fn update(&mut self, ctx: &mut EngineContext) {
        if ctx.input.is_cursor_grabbed() {
            let delta = ctx.input.mouse_delta();
            self.frame
                .look(delta.x, delta.y, self.scene.controls.look_sensitivity);
        }

        self.frame = self.frame.step(ctx.time.delta_seconds());

        if let (Some(stage), Some(renderer)) = (&self.stage, ctx.renderer_mut()) {
            stage.sync(renderer, &self.frame);
        }
    }

    fn render(&mut self, ctx: &mut EngineContext) {
        if let (Some(stage), Some(renderer)) = (&self.stage, ctx.renderer()) {
            stage.render(renderer);
        }
    }

    fn on_key(&mut self, _ctx: &mut EngineContext, key: KeyCode, edge: KeyEdge) {
        self.frame.movement = self.bindings.apply_key_event(self.frame.movement, key, edge);

        if key == KeyCode::KeyM
            && edge == KeyEdge::Down
            && let Some(audio) = &mut self.audio
        {
            audio.toggle_mute();
        }
    }

    fn on_resize(&mut self, _ctx: &mut EngineContext, width: u32, height: u32) {
        self.frame.camera.set_aspect(width, height);
    }

    fn shutdown(&mut self, _ctx: &mut EngineContext) {
        if let Some(audio) = &mut self.audio {
            audio.stop_all();
        }
        log::info!("Ran {} ticks", self.frame.ticks);
    }
}

/// Pick the scene: an explicit file must load, the bundled one may fall back
fn load_scene(cli: &Cli) -> Result<SceneConfig, Box<dyn std::error::Error>> {
    if let Some(path) = &cli.scene {
        log::info!("Loading scene {}", path.display());
        return Ok(SceneConfig::load(path)?);
    }

    let bundled = cli.asset_root.join("scene.ron");
    if !bundled.exists() {
        log::info!("No {}, using the built-in scene", bundled.display());
        return Ok(SceneConfig::default());
    }

    match SceneConfig::load(&bundled) {
        Ok(scene) => Ok(scene),
        Err(e) => {
            log::warn!("Ignoring {}: {e}", bundled.display());
            Ok(SceneConfig::default())
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let scene = match load_scene(&cli) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("Could not load scene: {e}");
            std::process::exit(1);
        }
    };

    let config = EngineConfig::default()
        .with_title(scene.name.clone())
        .with_size(1280, 720)
        .with_vsync(!cli.no_vsync);

    let game = ShowroomGame::new(scene, cli.asset_root, cli.mute, cli.volume);
    let engine = Engine::new(config, game);

    if let Err(e) = engine.run() {
        eprintln!("Engine error: {}", e);
    }
}
