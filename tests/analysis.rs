use sor_rs::analysis::{
    AnalysisConfig, AnalysisError, DEFAULT_MAX_DISTANCE, DEFAULT_START_DISTANCE, ScanType, Trace,
    analyze, analyze_with_config, detect_events,
};
use sor_rs::blocks::{
    DataPoints, DataPointsAtScaleFactor, FixedParametersBlock, GeneralParametersBlock, MapBlock,
};
use sor_rs::{EventRange, SorFile};

/// Data spacing giving a sample every ~1 m at a group index of 1.0.
const ONE_METER_SPACING: i32 = 333_564;

fn fixed(group_index: i32, data_spacing: i32) -> FixedParametersBlock {
    FixedParametersBlock {
        date_time_stamp: 0,
        units_of_distance: "mt".into(),
        actual_wavelength: 15500,
        acquisition_offset: 0,
        acquisition_offset_distance: 0,
        total_n_pulse_widths_used: 1,
        pulse_widths_used: vec![30],
        data_spacing: vec![data_spacing],
        n_data_points_for_pulse_widths_used: vec![0],
        group_index,
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
    }
}

fn trace_file(samples: Vec<u16>, scale_factor: i16) -> SorFile {
    SorFile {
        map: MapBlock::new(200),
        general_parameters: None,
        supplier_parameters: None,
        fixed_parameters: Some(fixed(100_000, ONE_METER_SPACING)),
        key_events: None,
        link_parameters: None,
        data_points: Some(DataPoints {
            number_of_data_points: samples.len() as i32,
            total_number_scale_factors_used: 1,
            scale_factors: vec![DataPointsAtScaleFactor {
                n_points: samples.len() as i32,
                scale_factor,
                data: samples,
            }],
        }),
        proprietary_blocks: Vec::new(),
    }
}

/// `len` samples at `before`, switching to `after` at sample `at`.
fn step(len: usize, at: usize, before: u16, after: u16) -> Vec<u16> {
    (0..len).map(|i| if i < at { before } else { after }).collect()
}

fn all_within(ranges: &[EventRange], lo: f64, hi: f64) -> bool {
    ranges.iter().all(|r| lo <= r.start && r.start <= r.end && r.end <= hi)
}

#[test]
fn trace_conversion() {
    let mut sor = trace_file(vec![65535, 64535, 55535], 1000);
    sor.general_parameters = Some(GeneralParametersBlock {
        language_code: "EN".into(),
        cable_id: String::new(),
        fiber_id: String::new(),
        fiber_type: 652,
        nominal_wavelength: 1550,
        originating_location: String::new(),
        terminating_location: String::new(),
        cable_code: String::new(),
        current_data_flag: "BC".into(),
        user_offset: 1_000_000,
        user_offset_distance: 0,
        operator: String::new(),
        comment: String::new(),
    });

    let trace = Trace::from_sor(&sor, &AnalysisConfig::default()).unwrap();
    assert_eq!(trace.len(), 3);
    assert_eq!(trace.power, vec![0.0, -1.0, -10.0]);
    assert!((trace.step - 1.0).abs() < 1e-5);
    assert_eq!(trace.distances[0], 0.0);
    assert!((trace.distances[2] - 2.0 * trace.step).abs() < 1e-12);
    assert_eq!(trace.speed_in_fiber, 299_792_458.0);
    // 1e6 * 100 ps = 100 us of round trip at c.
    let launch = trace.launch_connector_distance.unwrap();
    assert!((launch - 29_979.2458).abs() < 1e-6);
}

#[test]
fn rising_step_is_a_fiber_issue() {
    let sor = trace_file(step(2000, 1000, 55_535, 58_535), 1000);
    let report = analyze(&sor, DEFAULT_START_DISTANCE, DEFAULT_MAX_DISTANCE, ScanType::Long);

    assert!(report.success, "{}", report.diagnostic);
    assert!(report.cause.is_none());
    assert!(!report.fiber_issues.is_empty());
    assert!(all_within(&report.fiber_issues, 900.0, 1100.0));
    assert!(report.back_reflections.is_empty());
}

#[test]
fn falling_step_is_a_back_reflection() {
    let sor = trace_file(step(2000, 1000, 58_535, 55_535), 1000);
    let report = analyze(&sor, DEFAULT_START_DISTANCE, DEFAULT_MAX_DISTANCE, "long");

    assert!(report.success, "{}", report.diagnostic);
    assert!(!report.back_reflections.is_empty());
    // Curvature is only negative on the approach to the drop.
    assert!(all_within(&report.back_reflections, 900.0, 1000.0));
    assert!(report.fiber_issues.is_empty());
}

#[test]
fn merged_ranges_are_ordered_and_disjoint() {
    let sor = trace_file(step(2000, 1000, 55_535, 58_535), 1000);
    let events = detect_events(
        &sor,
        50.0,
        25_000.0,
        ScanType::Long,
        &AnalysisConfig::default(),
    )
    .unwrap();
    for pair in events.fiber_issues.windows(2) {
        assert!(pair[0].end < pair[1].start);
        assert!(pair[1].start - pair[0].start > 75.0);
    }
    for range in &events.fiber_issues {
        assert!(range.end - range.start <= 75.0);
    }
}

#[test]
fn flat_trace_has_no_events() {
    let sor = trace_file(vec![60_000; 1500], 1000);
    let report = analyze(&sor, 50.0, 25_000.0, ScanType::Short);
    assert!(report.success);
    assert!(report.fiber_issues.is_empty());
    assert!(report.back_reflections.is_empty());
}

#[test]
fn short_scans_stop_at_the_cap() {
    let sor = trace_file(step(10_000, 9_000, 55_535, 58_535), 1000);

    let short = analyze(&sor, 50.0, 25_000.0, "SHORT");
    assert!(short.success, "{}", short.diagnostic);
    assert!(short.fiber_issues.is_empty());

    let long = analyze(&sor, 50.0, 25_000.0, ScanType::Long);
    assert!(long.success, "{}", long.diagnostic);
    assert!(!long.fiber_issues.is_empty());
    assert!(all_within(&long.fiber_issues, 8_900.0, 9_100.0));

    // Below the threshold the requested distance is used as is.
    let config = AnalysisConfig::default();
    assert_eq!(config.distance_cap(9_500.0, ScanType::Short), 8_500.0);
    assert_eq!(config.distance_cap(7_900.0, ScanType::Short), 7_900.0);
}

#[test]
fn thresholds_come_from_config() {
    let sor = trace_file(step(2000, 1000, 55_535, 58_535), 1000);
    let config = AnalysisConfig {
        fiber_issue_slope: 0.1,
        ..AnalysisConfig::default()
    };
    let report = analyze_with_config(&sor, 50.0, 25_000.0, ScanType::Long, &config);
    assert!(report.success);
    assert!(report.fiber_issues.is_empty());
}

#[test]
fn missing_blocks_fail_in_report() {
    let mut sor = trace_file(vec![60_000; 100], 1000);
    sor.fixed_parameters = None;
    let report = analyze(&sor, 50.0, 25_000.0, ScanType::Long);
    assert!(!report.success);
    assert_eq!(report.cause, Some(AnalysisError::MissingBlock("FxdParams")));
    assert!(report.diagnostic.contains("FxdParams"));
    assert!(report.fiber_issues.is_empty());
    assert!(report.back_reflections.is_empty());

    let mut sor = trace_file(vec![60_000; 100], 1000);
    sor.data_points = None;
    let report = analyze(&sor, 50.0, 25_000.0, ScanType::Long);
    assert_eq!(report.cause, Some(AnalysisError::MissingBlock("DataPts")));
}

#[test]
fn invalid_parameters_fail_in_report() {
    let sor = trace_file(vec![55_535; 100], 0);
    let report = analyze(&sor, 0.0, 25_000.0, ScanType::Long);
    assert!(!report.success);
    assert_eq!(report.cause, Some(AnalysisError::NonFinite("power")));

    let mut sor = trace_file(vec![60_000; 100], 1000);
    sor.fixed_parameters = Some(fixed(0, ONE_METER_SPACING));
    let report = analyze(&sor, 0.0, 25_000.0, ScanType::Long);
    assert_eq!(report.cause, Some(AnalysisError::InvalidGroupIndex(0)));

    let mut sor = trace_file(vec![60_000; 100], 1000);
    sor.fixed_parameters = Some(fixed(146_800, 0));
    let report = analyze(&sor, 0.0, 25_000.0, ScanType::Long);
    assert_eq!(report.cause, Some(AnalysisError::InvalidDataSpacing(0)));

    let mut sor = trace_file(vec![60_000; 100], 1000);
    if let Some(points) = sor.data_points.as_mut() {
        points.scale_factors.clear();
        points.total_number_scale_factors_used = 0;
    }
    let report = analyze(&sor, 0.0, 25_000.0, ScanType::Long);
    assert_eq!(report.cause, Some(AnalysisError::MissingScaleFactors));
}

#[test]
fn window_beyond_trace_fails_in_report() {
    let sor = trace_file(vec![60_000; 100], 1000);
    let report = analyze(&sor, 500.0, 25_000.0, ScanType::Long);
    assert!(!report.success);
    assert!(matches!(
        report.cause,
        Some(AnalysisError::TooFewSamples { available: 0, .. })
    ));
}

#[test]
fn scan_type_from_tag() {
    assert_eq!(ScanType::from("short"), ScanType::Short);
    assert_eq!(ScanType::from("Short"), ScanType::Short);
    assert_eq!(ScanType::from("long"), ScanType::Long);
    assert_eq!(ScanType::from("otdr"), ScanType::Long);
    assert_eq!("short".parse::<ScanType>(), Ok(ScanType::Short));
}

#[test]
fn report_serializes() {
    let sor = trace_file(step(2000, 1000, 55_535, 58_535), 1000);
    let report = analyze(&sor, 50.0, 25_000.0, ScanType::Long);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["success"], true);
    assert!(json["fiber_issues"][0]["start"].is_number());
}
