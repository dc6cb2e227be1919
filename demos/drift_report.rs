// ============================================================================
// Drift Report Example
// ============================================================================

use accumulation_drift::prelude::*;
use std::sync::Arc;

fn print_magnitude(label: &str, magnitude: &ErrorMagnitude) {
    match magnitude.as_finite() {
        Some(value) => println!(
            "  {:<20} {} ({})",
            label,
            value.format_grouped(15),
            value.format_scientific(15)
        ),
        None => println!("  {:<20} {}", label, magnitude),
    }
}

fn main() {
    #[cfg(feature = "logging")]
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Accumulation Drift Example ===\n");

    let analyzer = AnalyzerBuilder::interactive()
        .parallel_trajectory(4)
        .build(Arc::new(LoggingObserver))
        .unwrap();

    let base = "10000000.0";
    let increment = "0.01";
    let iterations = 100_000;

    println!(
        "Adding {} to {}, {} times\n",
        increment, base, iterations
    );

    for precision in [Precision::Single32, Precision::Double64] {
        let result = analyzer
            .run_simulation(base, increment, iterations, precision.label())
            .unwrap();

        println!("{} ({})", precision, precision.type_name());
        println!("  {:<20} {}", "Expected (exact)", result.expected.format_grouped(15));
        println!("  {:<20} {}", "Actual", result.actual.format_grouped(15));
        print_magnitude("Absolute error", &result.absolute_error);
        print_magnitude("Relative error (%)", &result.relative_error_percent);

        if let Some(peak) = result.peak_error() {
            println!("  {:<20} step {}", "Peak error at", peak.step);
        }
        if let Some(step) = result.first_overflow_step {
            println!("  {:<20} step {}", "Overflow at", step);
        }

        // A handful of evenly spaced points from the trajectory
        let series = result.plot_series();
        let stride = (series.len() / 5).max(1);
        println!("  Trajectory:");
        for (step, error) in series.iter().step_by(stride) {
            println!("    step {:>7}: {:e}", step, error);
        }
        println!();
    }
}
