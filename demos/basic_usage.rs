// ============================================================================
// Basic Usage Example
// ============================================================================

use chrono::{Duration, Utc};
use flow_totalizer::prelude::*;
use std::sync::Arc;

fn main() {
    #[cfg(feature = "logging")]
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Flow Totalizer Example ===\n");

    // Small line meter: rolls over every 1000 litres
    let config = AccumulatorConfig::small_line();
    let threshold = config.threshold;
    let mut totalizer = match BidirectionalTotalizer::new(config, Arc::new(LoggingEventHandler)) {
        Ok(totalizer) => totalizer,
        Err(reason) => {
            eprintln!("Invalid configuration: {}", reason);
            return;
        }
    };

    let started = Utc::now();
    let start = totalizer.snapshot(started);

    // One hour of mostly forward flow with occasional backflow
    println!("Recording flow...");
    for minute in 0..60 {
        let delta = if minute % 15 == 14 { -12.5 } else { 37.25 };
        if let Err(e) = totalizer.record(delta) {
            println!("  minute {}: increment rejected: {}", minute, e);
        }
    }
    let end = totalizer.snapshot(started + Duration::minutes(60));

    println!("\n=== Sub-totals ===");
    println!("A->B: {:?}", totalizer.forward());
    println!("B->A: {:?}", totalizer.reverse());

    println!("\n=== Net totals ===");
    for mode in [
        TotalizationMode::AOnly,
        TotalizationMode::BOnly,
        TotalizationMode::AMinusB,
        TotalizationMode::BMinusA,
    ] {
        match totalizer.net(mode).and_then(|net| net.to_decimal(threshold)) {
            Ok(net) => println!("  {:?}: {}", mode, net),
            Err(e) => println!("  {:?}: {}", mode, e),
        }
    }

    println!("\n=== Average flow ===");
    match start.average_flow_to(&end, TotalizationMode::AMinusB, threshold) {
        Ok(rate) => println!("  {:.4} L/s", rate),
        Err(e) => println!("  {} (best effort: {:?})", e, e.best_effort_rate()),
    }

    // Meter-factor correction after calibration
    println!("\n=== Applying meter factor 1.0025 ===");
    if let Err(e) = totalizer.rescale(1.0025) {
        println!("  rescale failed: {}", e);
    }
    println!("A->B: {:?}", totalizer.forward());
}
