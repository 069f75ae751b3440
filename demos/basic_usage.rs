//! Basic usage example for the statpower library.
//!
//! This example sizes a one-sample and a two-sample proportion study, then
//! prints a small power table.

use statpower::prelude::*;

fn main() {
    println!("statpower - Basic Usage Example\n");

    // One-sample: H0 p = 0.80 against an actual rate of 0.95
    println!("One-sample proportion test (p0 = 0.80, p1 = 0.95, alpha = 0.05, power = 0.80)");
    for test_type in one_proportion::TestType::ALL {
        let size = one_proportion::solve_for_sample_size(
            0.05,
            0.80,
            0.80,
            0.95,
            Alternative::TwoSided,
            *test_type,
        )
        .expect("Failed to solve for sample size");
        println!("  {test_type:<24} n = {size}");
    }
    println!();

    // Two-sample with unequal allocation and dropouts
    println!("Two-sample proportion test, treatment:reference = 2:1, 10% dropout");
    let solution = TwoProportion::new()
        .alpha(0.05)
        .power(0.80)
        .treatment_proportion(0.80)
        .reference_proportion(0.95)
        .group_allocation(GroupAllocation::new().ratio_of_treatment_to_reference(2.0))
        .dropout_rate(0.10)
        .solve()
        .expect("Failed to solve two-sample design");
    let (treatment, reference) = solution.sample_sizes();
    let (treatment_enrolled, reference_enrolled) = solution.sizes_include_dropouts();
    println!("  Evaluable:   treatment = {treatment}, reference = {reference}");
    println!("  To enroll:   treatment = {treatment_enrolled}, reference = {reference_enrolled}");
    println!();

    // Smallest detectable treatment rate with 100 subjects in total
    let detectable = two_proportion::solve_for_treatment_proportion(
        0.05,
        0.80,
        0.95,
        Alternative::TwoSided,
        two_proportion::TestType::ZTestPooled,
        &GroupAllocation::new().equal().size_of_total(100.0),
        SearchDirection::Less,
    )
    .expect("Failed to solve for treatment proportion");
    println!("With 100 subjects, a treatment rate of {detectable:.4} or lower is detectable");
    println!();

    // Power table
    let design = OneProportion::new().null_proportion(0.80).proportion(0.95);
    let sizes = [20.0, 30.0, 42.0, 60.0, 80.0];
    let alphas = [0.01, 0.05, 0.10];
    let table = power_table(&design, &sizes, &alphas).expect("Failed to tabulate power");

    println!("Power table ({}):", design.name());
    print!("  {:>6}", "n");
    for alpha in table.alphas() {
        print!("  alpha={alpha:<5}");
    }
    println!();
    for (i, size) in table.sizes().iter().enumerate() {
        print!("  {size:>6}");
        for j in 0..table.alphas().len() {
            print!("  {:<11.4}", table.get(i, j));
        }
        println!();
    }
    if let Some(size) = table.min_size_for(0.80, 1) {
        println!("\nSmallest tabulated n with 80% power at alpha = 0.05: {size}");
    }
}
