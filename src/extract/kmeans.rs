//! Seeded k-means over Lab pixels.
//!
//! Assignment and convergence scoring come from `kmeans_colors`' `Calculate`
//! implementation for `Lab`; initialization and the update step live here so
//! the loop can honor a cancellation flag between iterations and reseed
//! empty clusters without touching a random source.

use kmeans_colors::Calculate;
use palette::Lab;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use super::CancelFlag;
use crate::{PaletteError, Result};

/// Loop limits and seed for a single k-means run.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KmeansParams {
    pub k: usize,
    pub max_iterations: usize,
    pub convergence: f32,
    pub seed: u64,
}

#[derive(Debug, Clone)]
pub(crate) struct KmeansOutcome {
    pub centroids: Vec<Lab>,
    /// Cluster index for every input point, against the final centroids
    pub indices: Vec<u8>,
    pub iterations: usize,
    pub converged: bool,
}

// ------------------------------------------------------------
// k-means++ seeding
// ------------------------------------------------------------

/// Pick up to `k` initial centroids with k-means++ weighting.
///
/// Stops early when every remaining point already coincides with a chosen
/// centroid, so the result may hold fewer than `k` entries.
fn init_plus_plus(points: &[Lab], k: usize, rng: &mut StdRng) -> Vec<Lab> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.random_range(0..points.len())]);

    let mut distances: Vec<f32> = points
        .iter()
        .map(|p| Lab::difference(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f32 = distances.iter().sum();
        if total <= 0.0 {
            break;
        }

        let mut target = rng.random::<f32>() * total;
        let mut chosen = None;
        for (i, &d) in distances.iter().enumerate() {
            if d > 0.0 {
                chosen = Some(i);
                if target < d {
                    break;
                }
                target -= d;
            }
        }
        let Some(next) = chosen else { break };

        let centroid = points[next];
        centroids.push(centroid);
        for (d, p) in distances.iter_mut().zip(points) {
            *d = d.min(Lab::difference(p, &centroid));
        }
    }

    centroids
}

// ------------------------------------------------------------
// Update step
// ------------------------------------------------------------

/// Move each centroid to the mean of its points. A centroid that lost all
/// its points jumps to the point currently worst served by its own centroid.
fn recalculate_centroids(points: &[Lab], centroids: &mut [Lab], indices: &[u8]) {
    let k = centroids.len();
    let mut sums = vec![[0.0f64; 3]; k];
    let mut counts = vec![0usize; k];

    for (p, &i) in points.iter().zip(indices) {
        let sum = &mut sums[i as usize];
        sum[0] += p.l as f64;
        sum[1] += p.a as f64;
        sum[2] += p.b as f64;
        counts[i as usize] += 1;
    }

    let mut reseeded: Vec<usize> = Vec::new();
    for c in 0..k {
        if counts[c] > 0 {
            let n = counts[c] as f64;
            centroids[c] = Lab::new(
                (sums[c][0] / n) as f32,
                (sums[c][1] / n) as f32,
                (sums[c][2] / n) as f32,
            );
            continue;
        }

        let farthest = points
            .iter()
            .zip(indices)
            .enumerate()
            .filter(|(i, _)| !reseeded.contains(i))
            .map(|(i, (p, &owner))| (i, Lab::difference(p, &centroids[owner as usize])))
            .max_by(|a, b| a.1.total_cmp(&b.1));

        if let Some((i, _)) = farthest {
            warn!(cluster = c, point = i, "Reseeding empty k-means cluster");
            centroids[c] = points[i];
            reseeded.push(i);
        }
    }
}

// ------------------------------------------------------------
// Lloyd iterations
// ------------------------------------------------------------

/// Cluster `points` into at most `params.k` groups.
///
/// Always terminates: after `max_iterations` the current centroids are
/// returned even if they are still moving. `points` must not be empty and
/// `params.k` must fit the `u8` cluster indices.
pub(crate) fn run(
    points: &[Lab],
    params: KmeansParams,
    cancel: Option<&CancelFlag>,
) -> Result<KmeansOutcome> {
    run_until(points, params, |_| cancel.is_some_and(CancelFlag::is_cancelled))
}

/// [`run`] with the stop check as a closure over the number of completed
/// iterations. It is consulted before every iteration.
fn run_until(
    points: &[Lab],
    params: KmeansParams,
    stop: impl Fn(usize) -> bool,
) -> Result<KmeansOutcome> {
    debug_assert!(!points.is_empty());
    debug_assert!(params.k <= u8::MAX as usize + 1);

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut centroids = init_plus_plus(points, params.k, &mut rng);
    let mut indices: Vec<u8> = Vec::with_capacity(points.len());
    let mut iterations = 0;
    let mut converged = false;

    while iterations < params.max_iterations {
        if stop(iterations) {
            warn!(iterations, "k-means cancelled");
            return Err(PaletteError::Cancelled { iterations });
        }

        indices.clear();
        Lab::get_closest_centroid(points, &centroids, &mut indices);

        let previous = centroids.clone();
        recalculate_centroids(points, &mut centroids, &indices);
        iterations += 1;

        let movement = Lab::check_loop(&centroids, &previous);
        debug!(iteration = iterations, movement, "k-means iteration");
        if movement < params.convergence {
            converged = true;
            break;
        }
    }

    if !converged {
        debug!(iterations, "k-means stopped at iteration cap");
    }

    indices.clear();
    Lab::get_closest_centroid(points, &centroids, &mut indices);

    Ok(KmeansOutcome {
        centroids,
        indices,
        iterations,
        converged,
    })
}
