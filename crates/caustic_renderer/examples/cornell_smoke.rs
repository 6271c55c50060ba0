//! Cornell box with two smoke-filled blocks.
//!
//! ```text
//! cargo run --release --example cornell_smoke -- [config.json] [output.png]
//! ```
//!
//! The optional config is a JSON `RenderConfig`; missing fields use defaults.

use anyhow::{Context, Result};
use caustic_renderer::{
    render_with_progress, Background, Color, ConstantMedium, Cuboid, DiffuseLight, FlipFace,
    Instance, Lambertian, Rect, RenderConfig, Scene, ThinLensCamera, Vec3,
};
use std::sync::atomic::{AtomicU32, Ordering};

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config {}", path))?;
            RenderConfig::from_json_str(&json)
                .with_context(|| format!("Invalid config {}", path))?
        }
        None => RenderConfig::default().with_resolution(400, 400).with_samples(200),
    };
    let output = args.next().unwrap_or_else(|| "cornell_smoke.png".to_string());

    let scene = build_scene(config.aspect_ratio())?;

    let last_reported = AtomicU32::new(0);
    let image = render_with_progress(&scene, &config, &|percent| {
        // Rows finish out of order; only report forward progress.
        if percent % 10 == 0 && last_reported.fetch_max(percent, Ordering::Relaxed) < percent {
            log::info!("{}%", percent);
        }
    });

    image::save_buffer(
        &output,
        &image.to_rgba(),
        image.width,
        image.height,
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("Failed to write {}", output))?;

    log::info!("Saved {}", output);
    Ok(())
}

fn build_scene(aspect_ratio: f32) -> Result<Scene> {
    let red = Lambertian::new(Color::new(0.65, 0.05, 0.05));
    let white = Lambertian::new(Color::splat(0.73));
    let green = Lambertian::new(Color::new(0.12, 0.45, 0.15));
    let light = DiffuseLight::new(Color::splat(7.0));

    let camera = ThinLensCamera::new()
        .with_position(
            Vec3::new(278.0, 278.0, -800.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0)
        .with_aspect_ratio(aspect_ratio);

    let mut builder = Scene::builder()
        .with_background(Background::Solid(Color::ZERO))
        .with_camera(camera);

    builder
        .add(Rect::yz(0.0, 555.0, 0.0, 555.0, 555.0, green))
        .add(Rect::yz(0.0, 555.0, 0.0, 555.0, 0.0, red))
        .add_emitter(FlipFace::new(Rect::xz(113.0, 443.0, 127.0, 432.0, 554.0, light)))
        .add(Rect::xz(0.0, 555.0, 0.0, 555.0, 555.0, white.clone()))
        .add(Rect::xz(0.0, 555.0, 0.0, 555.0, 0.0, white.clone()))
        .add(Rect::xy(0.0, 555.0, 0.0, 555.0, 555.0, white.clone()));

    let tall = Instance::rotate_y(
        Cuboid::new(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white.clone()),
        15.0,
    )
    .then_translate(Vec3::new(265.0, 0.0, 295.0));
    let short = Instance::rotate_y(Cuboid::new(Vec3::ZERO, Vec3::splat(165.0), white), -18.0)
        .then_translate(Vec3::new(130.0, 0.0, 65.0));

    builder
        .add(ConstantMedium::new(tall, 0.01, Color::ZERO))
        .add(ConstantMedium::new(short, 0.01, Color::ONE));

    Ok(builder.build()?)
}
