// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vertex extraction benchmarks
//!
//! Extraction is cubic in the side count, so prisms with growing numbers of
//! sides show the cost curve; a batch of cubes shows per-solid overhead.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vmf_lite_geometry::{
    extract_vertices, solid_vertices, ExtractionOptions, HalfSpace, Solid, Tolerances, Vector3,
};
use vmf_lite_model::{GenericClass, Plane, TypedValue, UvAxis, Vec3, Vec4};

/// Prism with `n` vertical sides around the z axis, capped top and bottom
fn prism(n: usize) -> Vec<HalfSpace> {
    let mut spaces = vec![
        HalfSpace::new(Vector3::z(), 64.0),
        HalfSpace::new(-Vector3::z(), 64.0),
    ];
    for i in 0..n {
        let angle = std::f64::consts::TAU * i as f64 / n as f64;
        spaces.push(HalfSpace::new(Vector3::new(angle.cos(), angle.sin(), 0.0), 64.0));
    }
    spaces
}

fn cube_class(id: i32, x: f64) -> GenericClass {
    let faces = [
        [[x - 64.0, 64.0, 64.0], [x + 64.0, 64.0, 64.0], [x + 64.0, -64.0, 64.0]],
        [[x - 64.0, -64.0, -64.0], [x + 64.0, -64.0, -64.0], [x + 64.0, 64.0, -64.0]],
        [[x - 64.0, 64.0, 64.0], [x - 64.0, -64.0, 64.0], [x - 64.0, -64.0, -64.0]],
        [[x + 64.0, 64.0, -64.0], [x + 64.0, -64.0, -64.0], [x + 64.0, -64.0, 64.0]],
        [[x + 64.0, 64.0, 64.0], [x - 64.0, 64.0, 64.0], [x - 64.0, 64.0, -64.0]],
        [[x + 64.0, -64.0, -64.0], [x - 64.0, -64.0, -64.0], [x - 64.0, -64.0, 64.0]],
    ];
    let uv = TypedValue::Uv(UvAxis::new(Vec4::new(1.0, 0.0, 0.0, 0.0), 0.25));

    let mut solid = GenericClass::new("solid").with_property("id", id);
    for (i, [a, b, c]) in faces.into_iter().enumerate() {
        let plane = Plane::new(Vec3::from(a), Vec3::from(b), Vec3::from(c));
        solid = solid.with_child(
            GenericClass::new("side")
                .with_property("id", i as i32)
                .with_property("plane", plane)
                .with_property("material", "DEV/DEV_MEASUREGENERIC01B")
                .with_property("uaxis", uv.clone())
                .with_property("vaxis", uv.clone()),
        );
    }
    solid.with_child(GenericClass::new("editor"))
}

fn bench_prism(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_prism");
    let tolerances = Tolerances::default();
    for sides in [8usize, 32, 64] {
        let spaces = prism(sides);
        group.bench_with_input(BenchmarkId::from_parameter(sides), &spaces, |b, spaces| {
            b.iter(|| extract_vertices(black_box(spaces), &tolerances))
        });
    }
    group.finish();
}

fn bench_solids(c: &mut Criterion) {
    let solids: Vec<Solid> = (0..500)
        .filter_map(|i| Solid::try_from(&cube_class(i, f64::from(i) * 256.0)).ok())
        .collect();
    let options = ExtractionOptions::default();
    c.bench_function("solid_vertices_500", |b| {
        b.iter(|| solid_vertices(black_box(&solids), &options))
    });
}

criterion_group!(benches, bench_prism, bench_solids);
criterion_main!(benches);
