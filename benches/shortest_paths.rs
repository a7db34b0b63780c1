use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, RgbImage};
use scissors_core::{CrossGradMono, Grid, Raster, ShortestPaths, WeightedGrid};

fn checkerboard_raster(size: u32) -> Raster {
    let mut img = RgbImage::new(size, size);
    for y in 0..size {
        for x in 0..size {
            let v = if (x + y) % 2 == 0 { 255 } else { 0 };
            img.put_pixel(x, y, image::Rgb([v, v, v]));
        }
    }
    Raster::from_dynamic_image(&DynamicImage::ImageRgb8(img))
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("shortest_paths");
    group.sample_size(20);

    let size = 256;
    let raster = checkerboard_raster(size);
    let grid = Grid::new(size, size);
    let weigher = CrossGradMono::new(&raster);

    group.bench_function("find_all_paths", |b| {
        b.iter(|| {
            let weighted = WeightedGrid::new(black_box(&grid), black_box(&weigher));
            let mut engine = ShortestPaths::new(&weighted);
            let snapshot = engine.find_all_paths(black_box(0));
            black_box(snapshot);
        })
    });

    group.bench_function("extend_search_batches_of_4096", |b| {
        b.iter(|| {
            let weighted = WeightedGrid::new(black_box(&grid), black_box(&weigher));
            let mut engine = ShortestPaths::new(&weighted);
            engine.set_start(black_box(0));
            while !engine.all_paths_found() {
                black_box(engine.extend_search(black_box(4096)));
            }
        })
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
