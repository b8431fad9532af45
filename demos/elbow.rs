use segmentation::*;

fn main() -> Result<(), KMeansError> {
    env_logger::init();

    let centers = [[0.0, 0.0], [6.0, 1.0], [2.0, 7.0], [9.0, 8.0], [4.0, 4.0]];
    let rows: Vec<[f64; 2]> = (0..500)
        .map(|i| {
            let (c, x) = (centers[i % centers.len()], i as f64);
            [c[0] + (x * 0.37).sin() * 0.8, c[1] + (x * 1.19).cos() * 0.8]
        })
        .collect();
    let kmean = KMeans::from_rows(&rows)?;

    let conf = KMeansConfig::build().seed(7).build();
    let diag = diagnostics(&kmean, 1..=10, &conf)?;

    println!("{:>3} {:>12} {:>11} {:>6}", "k", "wcss", "silhouette", "iters");
    for entry in diag.iter() {
        let silhouette = entry.silhouette.map(|s| format!("{:.4}", s)).unwrap_or_else(|| "-".into());
        println!("{:>3} {:>12.3} {:>11} {:>6}", entry.k, entry.wcss, silhouette, entry.iterations);
    }
    println!("elbow at k={:?}", diag.elbow());
    println!("best silhouette (k, score): {:?}", diag.best_silhouette());
    Ok(())
}
