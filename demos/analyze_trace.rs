//! Decode a SOR file, print its parameters and the detected event ranges.
//!
//! Usage: cargo run --example analyze_trace -- <trace.sor> [max_distance_m] [config.json]
//!
//! The scan type is taken from the file name: `olt1_p3_short_001.sor` is a
//! short scan, anything without a `short` segment is a long scan.

use sor_rs::analysis::{
    AnalysisConfig, DEFAULT_MAX_DISTANCE, DEFAULT_START_DISTANCE, ScanType, analyze_with_config,
};
use sor_rs::{Result, SorFile};
use std::path::Path;

fn scan_type_of(path: &str) -> ScanType {
    let stem = Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    if stem.split('_').any(|tag| ScanType::from_tag(tag) == ScanType::Short) {
        ScanType::Short
    } else {
        ScanType::Long
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let Some(path) = args.get(1) else {
        eprintln!("usage: {} <trace.sor> [max_distance_m] [config.json]", args[0]);
        std::process::exit(2);
    };
    let max_distance = args
        .get(2)
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(DEFAULT_MAX_DISTANCE);
    let config = match args.get(3) {
        Some(config_path) => AnalysisConfig::load_from_file(config_path)?,
        None => AnalysisConfig::default(),
    };

    // 1) Decode every block
    let sor = SorFile::from_file(path)?;
    println!("File            : {}", path);
    println!("Map revision    : {}", sor.map.revision_number);
    for info in &sor.map.block_info {
        println!("  {:<12} rev {:>4}  {:>8} bytes", info.identifier, info.revision_number, info.size);
    }

    if let Some(general) = &sor.general_parameters {
        println!("Cable / fiber   : {} / {}", general.cable_id, general.fiber_id);
        println!("Wavelength      : {} nm", general.nominal_wavelength);
    }
    if let Some(supplier) = &sor.supplier_parameters {
        println!(
            "Instrument      : {} {} (s/n {})",
            supplier.supplier_name, supplier.otdr_mainframe_id, supplier.otdr_mainframe_sn
        );
    }
    if let Some(fixed) = &sor.fixed_parameters {
        println!("Refractive index: {:.5}", fixed.refractive_index());
        println!("Pulse widths    : {:?} ns", fixed.pulse_widths_used);
    }
    if let Some(events) = &sor.key_events {
        println!("Key events      : {}", events.number_of_key_events);
        for event in events.iter() {
            println!(
                "  #{:<3} code {}  loss {:>6}  reflectance {:>8}",
                event.event_number, event.event_code, event.event_loss, event.event_reflectance
            );
        }
    }
    for block in &sor.proprietary_blocks {
        println!("Proprietary     : {} ({} bytes)", block.identifier, block.data.len());
    }
    println!();

    // 2) Run the detector
    let scan_type = scan_type_of(path);
    let report = analyze_with_config(
        &sor,
        DEFAULT_START_DISTANCE,
        max_distance,
        scan_type,
        &config,
    );
    println!("Scan type       : {:?}", scan_type);
    println!("{}", report.diagnostic);
    for range in &report.back_reflections {
        println!("  back reflection {:>9.1} m .. {:>9.1} m", range.start, range.end);
    }
    for range in &report.fiber_issues {
        println!("  fiber issue     {:>9.1} m .. {:>9.1} m", range.start, range.end);
    }

    Ok(())
}
