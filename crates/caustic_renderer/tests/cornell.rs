//! End-to-end renders of the Cornell box.

use caustic_renderer::{
    render, Background, Color, ConstantMedium, Cuboid, DiffuseLight, FlipFace, ImageBuffer,
    Instance, Lambertian, Rect, RenderConfig, Scene, Strategy, ThinLensCamera, Vec3,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn cornell_box(smoke: bool) -> Scene {
    let red = Lambertian::new(Color::new(0.65, 0.05, 0.05));
    let white = Lambertian::new(Color::splat(0.73));
    let green = Lambertian::new(Color::new(0.12, 0.45, 0.15));
    let light = DiffuseLight::new(Color::splat(15.0));

    let camera = ThinLensCamera::new()
        .with_position(
            Vec3::new(278.0, 278.0, -800.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0)
        .with_aspect_ratio(1.0);

    let mut builder = Scene::builder()
        .with_background(Background::Solid(Color::ZERO))
        .with_camera(camera);

    builder
        .add(Rect::yz(0.0, 555.0, 0.0, 555.0, 555.0, green))
        .add(Rect::yz(0.0, 555.0, 0.0, 555.0, 0.0, red))
        .add_emitter(FlipFace::new(Rect::xz(213.0, 343.0, 227.0, 332.0, 554.0, light)))
        .add(Rect::xz(0.0, 555.0, 0.0, 555.0, 0.0, white.clone()))
        .add(Rect::xz(0.0, 555.0, 0.0, 555.0, 555.0, white.clone()))
        .add(Rect::xy(0.0, 555.0, 0.0, 555.0, 555.0, white.clone()));

    let tall = Instance::rotate_y(
        Cuboid::new(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white.clone()),
        15.0,
    )
    .then_translate(Vec3::new(265.0, 0.0, 295.0));
    let short = Instance::rotate_y(
        Cuboid::new(Vec3::ZERO, Vec3::splat(165.0), white),
        -18.0,
    )
    .then_translate(Vec3::new(130.0, 0.0, 65.0));

    if smoke {
        builder
            .add(ConstantMedium::new(tall, 0.01, Color::ZERO))
            .add(ConstantMedium::new(short, 0.01, Color::ONE));
    } else {
        builder.add(tall).add(short);
    }

    builder.build().unwrap()
}

/// Per-pixel variance estimated from two independent renders:
/// E[(a - b)^2] = 2 Var.
fn pixel_variance(a: &ImageBuffer, b: &ImageBuffer) -> f32 {
    let sum: f32 = a
        .pixels
        .iter()
        .zip(&b.pixels)
        .map(|(x, y)| (*x - *y).length_squared() / 3.0)
        .sum();
    sum / (2.0 * a.pixels.len() as f32)
}

fn variance_at(scene: &Scene, strategy: Strategy, samples: u32) -> f32 {
    let config = RenderConfig::default()
        .with_resolution(12, 12)
        .with_samples(samples)
        .with_strategy(strategy);
    let a = render(scene, &config.clone().with_seed(1));
    let b = render(scene, &config.with_seed(2));
    pixel_variance(&a, &b)
}

#[test]
fn test_cornell_box_renders() {
    init_logging();
    let scene = cornell_box(false);
    let config = RenderConfig::default().with_resolution(12, 12).with_samples(16);

    let image = render(&scene, &config);
    assert_eq!(image.pixels.len(), 144);
    assert!(image.pixels.iter().all(|p| p.is_finite() && p.min_element() >= 0.0));

    let mean = image.mean();
    assert!(mean.length() > 0.01, "box is lit: {:?}", mean);
    // Camera looks down +z, so the green wall at x = 555 is on the left.
    let column = |x: u32| (2..10).map(|y| image.get(x, y)).sum::<Color>();
    let left = column(0);
    let right = column(11);
    assert!(left.y > left.x, "left wall {:?}", left);
    assert!(right.x > right.y, "right wall {:?}", right);
}

#[test]
fn test_cornell_smoke_renders_deterministically() {
    init_logging();
    let scene = cornell_box(true);
    let config = RenderConfig::default()
        .with_resolution(12, 12)
        .with_samples(8)
        .with_seed(5);

    let a = render(&scene, &config);
    let b = render(&scene, &config.clone().with_parallel(false));
    assert_eq!(a, b);
    assert!(a.pixels.iter().all(|p| p.is_finite() && p.min_element() >= 0.0));
}

#[test]
fn test_variance_falls_with_sample_count() {
    init_logging();
    let scene = cornell_box(false);
    let coarse = variance_at(&scene, Strategy::Mis, 4);
    let fine = variance_at(&scene, Strategy::Mis, 64);
    assert!(fine < coarse * 0.5, "4 spp {} vs 64 spp {}", coarse, fine);
}

#[test]
fn test_mis_beats_bsdf_sampling() {
    init_logging();
    let scene = cornell_box(false);
    let bsdf = variance_at(&scene, Strategy::Bsdf, 16);
    let mis = variance_at(&scene, Strategy::Mis, 16);
    assert!(mis < bsdf, "mis {} vs bsdf {}", mis, bsdf);
}
