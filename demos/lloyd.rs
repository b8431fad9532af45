use segmentation::*;

/// Customers scattered around four segment profiles: (annual income in k, spending score, visits per month)
fn customers() -> Table {
    let profiles = [[25.0, 80.0, 9.0], [30.0, 20.0, 2.0], [85.0, 75.0, 6.0], [90.0, 15.0, 1.0]];
    let cnt = 200;
    let column = |dim: usize, spread: f64| (0..cnt)
        .map(|i| profiles[i % profiles.len()][dim] + ((i * (dim + 3)) as f64 * 0.77).sin() * spread)
        .collect::<Vec<f64>>();
    Table::new()
        .with_text("customer", (0..cnt).map(|i| format!("C{:04}", i)).collect())
        .with_numeric("income", column(0, 8.0))
        .with_numeric("spending", column(1, 10.0))
        .with_numeric("visits", column(2, 1.5))
}

fn main() -> Result<(), KMeansError> {
    env_logger::init();

    let table = customers();
    let schema = FeatureSchema::new(["income", "spending", "visits"])?;
    let kmean: KMeans<f64> = schema.extract(&table)?;

    let conf = KMeansConfig::build()
        .seed(42)
        .init_done(&|_| println!("Initialization completed."))
        .iteration_done(&|s, nr, new_distsum|
            println!("Iteration {} - Error: {:.2} -> {:.2} | Improvement: {:.2}",
                nr, s.distsum, new_distsum, s.distsum - new_distsum))
        .build();
    let result = kmean.kmeans_lloyd(4, KMeans::init_random_sample, &conf)?;

    println!("{:?} after {} iterations, WCSS {:.2}", result.status, result.iterations, result.distsum);
    for c in 0..result.k {
        println!("segment {}: {:>3} customers, centroid {:.1?}", c, result.centroid_frequency[c], result.centroid(c));
    }
    for warning in &result.warnings {
        println!("warning: {:?}", warning);
    }
    Ok(())
}
