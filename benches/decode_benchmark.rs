//! Codec and analyzer benchmarks.
//!
//! Run with: cargo bench --bench decode_benchmark

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use sor_rs::analysis::{AnalysisConfig, ScanType, detect_events};
use sor_rs::blocks::{
    BlockInfo, DataPoints, DataPointsAtScaleFactor, FixedParametersBlock, MapBlock,
};
use sor_rs::{SorFile, encode};

// ============================================================================
// Test Data Generation
// ============================================================================

/// A trace of `n_points` samples, one per meter, with a loss step halfway.
fn synthetic_trace(n_points: usize) -> SorFile {
    let data: Vec<u16> = (0..n_points)
        .map(|i| if i < n_points / 2 { 55_535 } else { 58_535 })
        .collect();

    let mut map = MapBlock::new(200);
    for id in ["FxdParams", "DataPts"] {
        map.block_info.push(BlockInfo {
            identifier: id.into(),
            revision_number: 200,
            size: 0,
        });
    }

    SorFile {
        map,
        general_parameters: None,
        supplier_parameters: None,
        fixed_parameters: Some(FixedParametersBlock {
            date_time_stamp: 0,
            units_of_distance: "mt".into(),
            actual_wavelength: 15500,
            acquisition_offset: 0,
            acquisition_offset_distance: 0,
            total_n_pulse_widths_used: 1,
            pulse_widths_used: vec![30],
            data_spacing: vec![333_564],
            n_data_points_for_pulse_widths_used: vec![n_points as i32],
            group_index: 100_000,
            backscatter_coefficient: 0,
            number_of_averages: 0,
            averaging_time: 0,
            acquisition_range: 0,
            acquisition_range_distance: 0,
            front_panel_offset: 0,
            noise_floor_level: 0,
            noise_floor_scale_factor: 0,
            power_offset_first_point: 0,
            loss_threshold: 0,
            reflectance_threshold: 0,
            end_of_fibre_threshold: 0,
            trace_type: "ST".into(),
            window_coordinate_1: 0,
            window_coordinate_2: 0,
            window_coordinate_3: 0,
            window_coordinate_4: 0,
        }),
        key_events: None,
        link_parameters: None,
        data_points: Some(DataPoints {
            number_of_data_points: n_points as i32,
            total_number_scale_factors_used: 1,
            scale_factors: vec![DataPointsAtScaleFactor {
                n_points: n_points as i32,
                scale_factor: 1000,
                data,
            }],
        }),
        proprietary_blocks: Vec::new(),
    }
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    for n_points in [1_000, 16_000, 64_000] {
        let file = synthetic_trace(n_points);
        let bytes = encode(&file, &file.map).expect("encode synthetic trace");
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("decode", n_points), &bytes, |b, bytes| {
            b.iter(|| SorFile::from_bytes(black_box(bytes)).expect("decode"))
        });
        group.bench_with_input(BenchmarkId::new("encode", n_points), &file, |b, file| {
            b.iter(|| encode(black_box(file), &file.map).expect("encode"))
        });
    }
    group.finish();
}

fn bench_analysis(c: &mut Criterion) {
    let config = AnalysisConfig::default();
    let mut group = c.benchmark_group("analysis");
    group.sample_size(20);
    for n_points in [4_000, 16_000] {
        let file = synthetic_trace(n_points);
        group.bench_with_input(BenchmarkId::new("detect_events", n_points), &file, |b, file| {
            b.iter(|| {
                detect_events(black_box(file), 50.0, 25_000.0, ScanType::Long, &config)
                    .expect("analyze")
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_codec, bench_analysis);
criterion_main!(benches);
