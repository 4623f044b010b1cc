use criterion::{black_box, criterion_group, criterion_main, Criterion};

use splatcam_3d::{
    camera::{Camera, CameraId, CameraParams, Intrinsics, Pose, Recentering},
    projection::{perspective, ClipRange},
    transforms::world_to_view,
};
use splatcam_image::Image;

fn bench_world_to_view(c: &mut Criterion) {
    let rotation = [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
    let translation = [0.5, -1.0, 4.0];

    c.bench_function("world_to_view", |b| {
        b.iter(|| {
            world_to_view(
                black_box(&rotation),
                black_box(&translation),
                black_box(&[0.1, 0.2, 0.3]),
                black_box(0.5),
            )
        })
    });
}

fn bench_perspective(c: &mut Criterion) {
    let clip = ClipRange::default();

    c.bench_function("perspective", |b| {
        b.iter(|| perspective(black_box(&clip), black_box(1.2), black_box(0.8)))
    });
}

fn bench_camera_update(c: &mut Criterion) {
    let image = Image::<f32, 3>::from_size_val([64, 48].into(), 0.5).unwrap();
    let id = CameraId {
        colmap_id: 1,
        uid: 0,
        image_name: "frame_0001".to_string(),
    };
    let intrinsics = Intrinsics {
        fov_x: 1.2,
        fov_y: 0.9,
        cx: 32.0,
        cy: 24.0,
    };
    let pose = Pose::new(
        [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        [0.0, 0.0, 5.0],
    );
    let params = CameraParams::new(id, pose, intrinsics, image).with_recentering(Recentering {
        translate: [1.0, 0.0, 0.0],
        scale: 0.5,
    });
    let mut camera = Camera::new(params).unwrap();

    c.bench_function("camera_update", |b| b.iter(|| camera.update().unwrap()));
}

criterion_group!(
    benches,
    bench_world_to_view,
    bench_perspective,
    bench_camera_update
);
criterion_main!(benches);
