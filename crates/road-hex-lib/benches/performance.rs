//! Performance benchmarks for road-hex-lib
//!
//! Run with: cargo bench --package road-hex-lib

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use road_hex_lib::{
    Coordinate, CoordinateBounds, Crs, Feature, FeatureCollection, Geometry, NeighborPolicy,
    Properties, extract_coordinates, map_to_cells_with, segmentize, segmentize_collection,
};

/// Generate a wiggly road with the specified number of vertices.
fn generate_road(num_points: usize, base_lat: f64, base_lon: f64) -> Vec<Coordinate> {
    (0..num_points)
        .map(|i| {
            let t = i as f64 / num_points as f64;
            let lat = base_lat + t * 0.1 + (t * 50.0).sin() * 0.001;
            let lon = base_lon + t * 0.1 + (t * 30.0).cos() * 0.001;
            Coordinate::new(lon, lat, &CoordinateBounds::DECLARED).unwrap()
        })
        .collect()
}

/// Generate a collection of roads spread across an area
fn generate_collection(num_roads: usize, points_per_road: usize) -> FeatureCollection {
    let features = (0..num_roads)
        .map(|i| {
            let lat_offset = (i % 10) as f64 * 0.1;
            let lon_offset = (i / 10) as f64 * 0.1;
            let road = generate_road(points_per_road, 51.5 + lat_offset, 0.1 + lon_offset);
            Feature::new(
                i.to_string(),
                Properties {
                    id_t1: i as f64,
                    road_name: format!("A{i}"),
                    class: None,
                    nrn: None,
                },
                Geometry::line_string(road).unwrap(),
            )
        })
        .collect();
    FeatureCollection::new(features, Crs::default())
}

// ============================================================================
// Core Benchmarks - Key performance indicators
// ============================================================================

fn bench_segmentize(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmentize");

    let road = generate_road(1_000, 51.5, 0.1);
    for max in [0.0005, 0.001, 0.005] {
        group.bench_with_input(BenchmarkId::from_parameter(max), &max, |b, &max| {
            b.iter(|| segmentize(&road, max).unwrap());
        });
    }

    group.finish();
}

fn bench_map_to_cells(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_to_cells");
    group.sample_size(20);

    let road = segmentize(&generate_road(1_000, 51.5, 0.1), 0.001).unwrap();
    group.throughput(Throughput::Elements(road.len() as u64));

    for resolution in [7u8, 8, 10] {
        group.bench_with_input(
            BenchmarkId::new("ring_1", resolution),
            &resolution,
            |b, &resolution| {
                b.iter(|| map_to_cells_with(&road, resolution, NeighborPolicy::default()).unwrap());
            },
        );
    }

    group.bench_function("cell_only_8", |b| {
        b.iter(|| map_to_cells_with(&road, 8, NeighborPolicy::CellOnly).unwrap());
    });

    group.finish();
}

fn bench_collection(c: &mut Criterion) {
    let mut group = c.benchmark_group("collection");
    group.sample_size(20);

    // 100 roads with 200 vertices each
    let collection = generate_collection(100, 200);
    group.throughput(Throughput::Elements(100 * 200));

    group.bench_function("segmentize_100x200", |b| {
        b.iter(|| segmentize_collection(&collection, 0.001).unwrap());
    });

    let segmented = segmentize_collection(&collection, 0.001).unwrap();
    group.bench_function("extract_100x200", |b| {
        b.iter(|| extract_coordinates(&segmented));
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(benches, bench_segmentize, bench_map_to_cells, bench_collection);

criterion_main!(benches);
