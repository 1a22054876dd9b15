//! # SWARM Windowed Client
//!
//! Drives [`Game::tick`] from macroquad's frame callback and rasterizes the
//! command stream into two render targets.
//!
//! Controls: WASD to move, the pointer aims, Q quits.

use std::path::Path;

use macroquad::audio::{load_sound, play_sound_once, Sound};
use macroquad::prelude as mq;
use swarm::config::AssetConfig;
use swarm_core::Arena;
use swarm_rendering::{
    Blit, Color, DrawCommand, FontId, PassDesc, RasterBackend, TargetId, TextBuffer, TextMeasure,
    TextureId,
};
use swarm::{Assets, Game, GameConfig, GameEvent, InputSnapshot, Keys};
use swarm_shared::{Rect, Vec2};
use tracing::{error, info, warn};

const CONFIG_PATH: &str = "config/swarm.toml";

fn load_config() -> GameConfig {
    if !Path::new(CONFIG_PATH).exists() {
        return GameConfig::default();
    }
    GameConfig::from_path(CONFIG_PATH).unwrap_or_else(|err| {
        warn!(%err, "config rejected, using defaults");
        GameConfig::default()
    })
}

fn window_conf() -> mq::Conf {
    let config = load_config();
    mq::Conf {
        window_title: config.window.title.clone(),
        window_width: config.window.width as i32,
        window_height: config.window.height as i32,
        window_resizable: true,
        ..Default::default()
    }
}

fn mq_color(color: Color) -> mq::Color {
    mq::Color::new(color.r, color.g, color.b, color.a)
}

fn mq_rect(rect: Rect) -> mq::Rect {
    mq::Rect::new(rect.x, rect.y, rect.width, rect.height)
}

/// Text measurement with the loaded font (or macroquad's built-in one).
struct FontMeasure {
    font: Option<mq::Font>,
}

impl TextMeasure for FontMeasure {
    fn measure(&self, _font: FontId, text: &str, size: f32) -> Vec2 {
        let dims = mq::measure_text(text, self.font.as_ref(), size as u16, 1.0);
        Vec2::new(dims.width, dims.height)
    }
}

/// Rasterizes draw commands with macroquad.
struct MacroquadBackend {
    textures: Vec<mq::Texture2D>,
    font: Option<mq::Font>,
    world: mq::RenderTarget,
    ui: mq::RenderTarget,
    render_size: Vec2,
    ui_size: Vec2,
}

impl MacroquadBackend {
    fn new(
        atlas: Option<mq::Texture2D>,
        font: Option<mq::Font>,
        render_size: Vec2,
        ui_size: Vec2,
    ) -> Self {
        let world = mq::render_target(render_size.x as u32, render_size.y as u32);
        world.texture.set_filter(mq::FilterMode::Nearest);
        let ui = mq::render_target(ui_size.x as u32, ui_size.y as u32);
        Self {
            textures: atlas.into_iter().collect(),
            font,
            world,
            ui,
            render_size,
            ui_size,
        }
    }

    fn target(&self, id: TargetId) -> (&mq::RenderTarget, Vec2) {
        match id {
            TargetId::World => (&self.world, self.render_size),
            TargetId::Ui => (&self.ui, self.ui_size),
        }
    }

    fn texture(&self, id: TextureId) -> Option<&mq::Texture2D> {
        self.textures.get(id.0 as usize)
    }
}

impl RasterBackend for MacroquadBackend {
    fn begin_pass(&mut self, pass: &PassDesc) {
        let (target, size) = self.target(pass.target);
        let view = match pass.camera {
            Some(camera) => {
                let top_left = camera.screen_to_world(Vec2::ZERO);
                let bottom_right = camera.screen_to_world(size);
                Rect::from_pos_size(top_left, bottom_right - top_left)
            }
            None => Rect::from_pos_size(Vec2::ZERO, size),
        };
        let mut camera = mq::Camera2D::from_display_rect(mq_rect(view));
        camera.render_target = Some(target.clone());
        mq::set_camera(&camera);
        mq::clear_background(mq_color(pass.clear));
    }

    fn draw(&mut self, command: &DrawCommand, text: &TextBuffer) {
        match *command {
            DrawCommand::Quad { dest, tint } => {
                mq::draw_rectangle(dest.x, dest.y, dest.width, dest.height, mq_color(tint));
            }
            DrawCommand::QuadOutline {
                dest,
                thickness,
                tint,
            } => {
                mq::draw_rectangle_lines(
                    dest.x,
                    dest.y,
                    dest.width,
                    dest.height,
                    thickness,
                    mq_color(tint),
                );
            }
            DrawCommand::Texture { src, position, tint } => {
                if let Some(atlas) = self.texture(TextureId(0)) {
                    let params = mq::DrawTextureParams {
                        source: Some(mq_rect(src)),
                        ..Default::default()
                    };
                    mq::draw_texture_ex(atlas, position.x, position.y, mq_color(tint), params);
                }
            }
            DrawCommand::TexturePro {
                texture,
                src,
                dest,
                tint,
            } => {
                if let Some(texture) = self.texture(texture) {
                    let params = mq::DrawTextureParams {
                        source: Some(mq_rect(src)),
                        dest_size: Some(mq::vec2(dest.width, dest.height)),
                        ..Default::default()
                    };
                    mq::draw_texture_ex(texture, dest.x, dest.y, mq_color(tint), params);
                }
            }
            DrawCommand::Text {
                text: span,
                position,
                size,
                tint,
                ..
            } => {
                let text = text.resolve(span);
                let font_size = size as u16;
                // macroquad positions text by baseline, commands by top-left.
                let dims = mq::measure_text(text, self.font.as_ref(), font_size, 1.0);
                let params = mq::TextParams {
                    font: self.font.as_ref(),
                    font_size,
                    color: mq_color(tint),
                    ..Default::default()
                };
                mq::draw_text_ex(text, position.x, position.y + dims.offset_y, params);
            }
            DrawCommand::Circle {
                center,
                radius,
                tint,
            } => {
                mq::draw_circle(center.x, center.y, radius, mq_color(tint));
            }
        }
    }

    fn end_pass(&mut self) {
        mq::set_default_camera();
    }

    fn composite(&mut self, blits: &[Blit]) {
        mq::clear_background(mq::BLACK);
        for blit in blits {
            let (target, _) = self.target(blit.target);
            let params = mq::DrawTextureParams {
                dest_size: Some(mq::vec2(blit.dest.width, blit.dest.height)),
                flip_y: true,
                ..Default::default()
            };
            mq::draw_texture_ex(&target.texture, blit.dest.x, blit.dest.y, mq::WHITE, params);
        }
    }
}

/// Sounds played for game events. Missing files are skipped.
struct Sounds {
    shoot: Option<Sound>,
    hit: Option<Sound>,
    die: Option<Sound>,
}

impl Sounds {
    async fn load(assets: &AssetConfig) -> Self {
        Self {
            shoot: load_optional_sound(&assets.shoot_sound).await,
            hit: load_optional_sound(&assets.hit_sound).await,
            die: load_optional_sound(&assets.die_sound).await,
        }
    }

    fn play(&self, event: &GameEvent) {
        let sound = match event {
            GameEvent::Shot { .. } => self.shoot.as_ref(),
            GameEvent::PlayerHit { .. } => self.hit.as_ref(),
            GameEvent::EnemyKilled { .. } => self.die.as_ref(),
            GameEvent::GameOver { .. } => None,
        };
        if let Some(sound) = sound {
            play_sound_once(sound);
        }
    }
}

async fn load_optional_sound(path: &Path) -> Option<Sound> {
    match load_sound(&path.to_string_lossy()).await {
        Ok(sound) => Some(sound),
        Err(err) => {
            warn!(path = %path.display(), %err, "sound not loaded");
            None
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    swarm::init_logging();
    let config = load_config();

    let atlas = match mq::load_texture(&config.assets.atlas.to_string_lossy()).await {
        Ok(texture) => {
            texture.set_filter(mq::FilterMode::Nearest);
            Some(texture)
        }
        Err(err) => {
            warn!(%err, "atlas not loaded, sprites will be missing");
            None
        }
    };
    let font = match mq::load_ttf_font(&config.assets.font.to_string_lossy()).await {
        Ok(font) => Some(font),
        Err(err) => {
            warn!(%err, "font not loaded, using the built-in font");
            None
        }
    };
    let sounds = Sounds::load(&config.assets).await;

    let mut backend = MacroquadBackend::new(
        atlas,
        font.clone(),
        config.window.render_size(),
        config.window.window_size(),
    );
    let assets = Assets {
        atlas: TextureId(0),
        font: FontId(0),
        measure: Box::new(FontMeasure { font }),
    };

    let persistent = Arena::with_config("persistent", config.memory.persistent_arena());
    let mut game = match Game::new(config, &persistent, assets) {
        Ok(game) => game,
        Err(err) => {
            error!(%err, "setup failed");
            return;
        }
    };
    let events = game.events();
    mq::show_mouse(false);

    loop {
        if mq::is_key_pressed(mq::KeyCode::Q) {
            break;
        }

        let (mouse_x, mouse_y) = mq::mouse_position();
        let snapshot = InputSnapshot {
            dt: mq::get_frame_time(),
            mouse: Vec2::new(mouse_x, mouse_y),
            window_size: Vec2::new(mq::screen_width(), mq::screen_height()),
            keys: Keys {
                left: mq::is_key_down(mq::KeyCode::A),
                right: mq::is_key_down(mq::KeyCode::D),
                up: mq::is_key_down(mq::KeyCode::W),
                down: mq::is_key_down(mq::KeyCode::S),
            },
        };

        if let Err(err) = game.tick(&snapshot, &mut backend) {
            error!(%err, frame = game.frame_count(), "frame failed, stopping");
            break;
        }
        for event in events.drain() {
            sounds.play(&event);
        }

        mq::next_frame().await;
    }

    info!(score = game.score(), survived = game.elapsed(), "client closed");
    println!("{}", game.stats());
}
