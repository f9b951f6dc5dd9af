//! Minimal example: a cube on a ground plane, ambient occlusion baked into
//! both and a single red brush stroke across the ground.
//!
//! Painting runs once at startup; [`VertexPainterPlugin`] copies the
//! resulting colors into the meshes.

use bevy::prelude::*;
use bevy_vertex_painter::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(VertexPainterPlugin)
        .add_systems(Startup, setup)
        .run();
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut targets: ResMut<PaintTargets>,
    config: Res<PainterConfig>,
) {
    let material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        ..default()
    });

    // Ground, subdivided so the brush has vertices to work with
    let ground_mesh = Mesh::from(Plane3d::default().mesh().size(4.0, 4.0).subdivisions(16));
    let ground_transform = Transform::IDENTITY;
    let ground = targets.insert(
        PaintTarget::from_mesh(&ground_mesh)
            .unwrap()
            .with_name("ground")
            .with_transform(ground_transform),
    );

    let cube_mesh = Mesh::from(Cuboid::new(1.0, 1.0, 1.0));
    let cube_transform = Transform::from_xyz(0.0, 0.5, 0.0);
    let cube = targets.insert(
        PaintTarget::from_mesh(&cube_mesh)
            .unwrap()
            .with_name("cube")
            .with_transform(cube_transform),
    );

    let mut scene = MeshScene::from_targets(&targets);

    // Bake into each target's first layer
    let ao = AoSettings {
        samples: 64,
        seed: Some(7),
        ..config.ao
    };
    let report = bake_ambient_occlusion(&mut targets, &[ground, cube], &mut scene, &ao).unwrap();
    info!("Baked {} targets, {} rays", report.targets, report.rays);

    // Paint on a new layer above the bake
    for id in [ground, cube] {
        let target = targets.get_mut(id).unwrap();
        let vertex_count = target.vertex_count();
        target
            .layer_stack_mut()
            .add(Layer::default().with_name("Paint"), vertex_count);
    }

    let brush = config
        .brush
        .with_mode(PaintMode::Paint)
        .with_color(LinearRgba::RED)
        .with_radius(0.6)
        .with_strength(1.0);

    let mut stroke = BrushStroke::new();
    stroke.begin().unwrap();
    stroke.add_target(&targets, ground).unwrap();
    for step in 0..=10 {
        let x = -1.8 + step as f32 * 0.2;
        stroke
            .update_stroke(&mut targets, &scene, vec3(x, 0.0, 1.2), &brush)
            .unwrap();
    }
    if let Some(record) = stroke.end(&targets) {
        info!("Stroke changed {} targets", record.targets().count());
    }

    commands.spawn((
        Mesh3d(meshes.add(ground_mesh)),
        MeshMaterial3d(material.clone()),
        ground_transform,
        PaintedMesh::new(ground),
    ));
    commands.spawn((
        Mesh3d(meshes.add(cube_mesh)),
        MeshMaterial3d(material),
        cube_transform,
        PaintedMesh::new(cube),
    ));

    // Add a light
    commands.spawn((
        PointLight {
            intensity: 2000.0,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0),
    ));

    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-3.0, 4.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
