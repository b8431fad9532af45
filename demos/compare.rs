use segmentation::*;

/// Run both implementations with different seeds and reconcile their cluster names.
fn main() -> Result<(), KMeansError> {
    env_logger::init();

    let rows: Vec<[f32; 3]> = (0..300)
        .map(|i| {
            let x = i as f32;
            let base = (i % 3) as f32 * 5.0;
            [base + (x * 0.3).sin(), base * 0.5 + (x * 0.8).cos(), (x * 1.1).sin()]
        })
        .collect();
    let kmean = KMeans::from_rows(&rows)?;

    let lloyd = Lloyd.calculate(&kmean, 3, KMeans::init_random_sample, &KMeansConfig::build().seed(1).build())?;
    let fused = FusedLloyd.calculate(&kmean, 3, KMeans::init_random_sample, &KMeansConfig::build().seed(2).build())?;

    let permutation = align(&lloyd.assignments, &fused.assignments, 3)?;
    let aligned = fused.relabel(&permutation)?;
    println!("permutation (fused -> lloyd): {:?}", permutation.as_slice());
    println!("disagreement before: {}", align::disagreement(&lloyd.assignments, &fused.assignments));
    println!("disagreement after:  {}", align::disagreement(&lloyd.assignments, &aligned.assignments));
    println!("WCSS lloyd={:.3} fused={:.3}", lloyd.distsum, aligned.distsum);
    Ok(())
}
