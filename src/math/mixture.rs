//! Gaussian mixture cluster model for control point placement
//!
//! A model is built in two stages. An analytic mixture is laid over the
//! envelope's bounding box, with isotropic covariances scaled by the envelope
//! area raised to per-component exponents. A fixed-size synthetic sample is
//! then drawn from it and a full-covariance mixture is fitted to that sample by
//! expectation-maximisation. The fitted model describes a sample of the analytic
//! mixture rather than the mixture itself, which perturbs cluster shapes.

use crate::io::configuration::{
    KMEANS_ITERATIONS, MIXTURE_MAX_ITERATIONS, MIXTURE_REGULARIZATION, MIXTURE_SYNTHETIC_SAMPLES,
    MIXTURE_TOLERANCE,
};
use crate::io::error::{Result, computation_error, invalid_parameter};
use crate::math::covariance::Covariance;
use crate::math::probability::{gaussian_log_density, log_sum_exp, select_weighted};
use geo::{Area, BoundingRect, Contains, Coord, Point, Polygon};
use ndarray::{Array2, Axis};
use rand::Rng;
use rand_distr::StandardNormal;

/// One weighted bivariate Gaussian of a mixture
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianComponent {
    /// Component mean
    pub mean: [f64; 2],
    /// Component covariance
    pub covariance: Covariance,
    /// Mixing weight, weights of a model sum to one
    pub weight: f64,
}

/// Fitted mixture density over a board
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterModel {
    components: Vec<GaussianComponent>,
}

/// Draw one covariance exponent per cluster, each in `(0, 1]`
pub fn random_exponents<R: Rng + ?Sized>(clusters: usize, rng: &mut R) -> Vec<f64> {
    (0..clusters).map(|_| 1.0 - rng.random::<f64>()).collect()
}

impl ClusterModel {
    /// Fit a model whose component count matches `covariance_exponents`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No exponents are given or one lies outside `(0, 1]`
    /// - The envelope has no vertices
    /// - The expectation-maximisation fit degenerates numerically
    pub fn fit<R: Rng + ?Sized>(
        covariance_exponents: &[f64],
        envelope: &Polygon<f64>,
        rng: &mut R,
    ) -> Result<Self> {
        if covariance_exponents.is_empty() {
            return Err(invalid_parameter(
                "covariance_exponents",
                &0,
                &"at least one mixture component is required",
            ));
        }
        if let Some(exponent) = covariance_exponents
            .iter()
            .find(|e| e.is_nan() || **e <= 0.0 || **e > 1.0)
        {
            return Err(invalid_parameter(
                "covariance_exponents",
                exponent,
                &"exponents must lie in (0, 1]",
            ));
        }

        let bounds = envelope
            .bounding_rect()
            .ok_or_else(|| invalid_parameter("envelope", &"empty", &"envelope has no vertices"))?;
        let (min, max) = (bounds.min(), bounds.max());
        let area = envelope.unsigned_area();
        let count = covariance_exponents.len();

        let means: Vec<[f64; 2]> = (0..count)
            .map(|_| {
                [
                    (max.x - min.x).mul_add(rng.random::<f64>(), min.x),
                    (max.y - min.y).mul_add(rng.random::<f64>(), min.y),
                ]
            })
            .collect();

        let mut weights: Vec<f64> = (0..count).map(|_| rng.random::<f64>()).collect();
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(computation_error(
                "mixture weights",
                &"all component weights were drawn as zero",
            ));
        }
        for weight in &mut weights {
            *weight /= total;
        }

        let analytic: Vec<GaussianComponent> = means
            .into_iter()
            .zip(weights)
            .zip(covariance_exponents)
            .map(|((mean, weight), exponent)| GaussianComponent {
                mean,
                covariance: Covariance::isotropic(area.powf(*exponent)),
                weight,
            })
            .collect();

        let synthetic = draw_points(&analytic, MIXTURE_SYNTHETIC_SAMPLES, rng)?;
        let components = fit_mixture(&synthetic, count, rng)?;

        log::debug!(
            "Fitted {count} mixture components to {} synthetic draws",
            synthetic.len()
        );

        Ok(Self { components })
    }

    /// Build a model from known components
    ///
    /// # Errors
    ///
    /// Returns an error if no components are given or the weights do not sum to one
    pub fn from_components(components: Vec<GaussianComponent>) -> Result<Self> {
        let total: f64 = components.iter().map(|c| c.weight).sum();
        if components.is_empty() || (total - 1.0).abs() > 1e-9 {
            return Err(invalid_parameter(
                "components",
                &total,
                &"component weights must sum to one",
            ));
        }
        Ok(Self { components })
    }

    /// Components of the fitted density
    pub fn components(&self) -> &[GaussianComponent] {
        &self.components
    }

    /// Draw `count` points directly from the fitted density
    ///
    /// # Errors
    ///
    /// Returns an error if a component covariance is not positive definite
    pub fn sample<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Result<Vec<Coord<f64>>> {
        Ok(draw_points(&self.components, count, rng)?
            .into_iter()
            .map(|[x, y]| Coord { x, y })
            .collect())
    }

    /// Draw batches of `count` points until `count` of them fall inside `envelope`
    ///
    /// There is no iteration cap: a density with near-disjoint support from the
    /// envelope keeps drawing.
    ///
    /// # Errors
    ///
    /// Returns an error if a component covariance is not positive definite
    pub fn sample_within_envelope<R: Rng + ?Sized>(
        &self,
        envelope: &Polygon<f64>,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Coord<f64>>> {
        let mut accepted = Vec::with_capacity(count);

        while accepted.len() < count {
            for point in self.sample(count, rng)? {
                if envelope.contains(&Point::from(point)) {
                    accepted.push(point);
                    if accepted.len() >= count {
                        break;
                    }
                }
            }
            log::trace!("Accepted {}/{count} envelope samples", accepted.len());
        }

        Ok(accepted)
    }
}

fn draw_points<R: Rng + ?Sized>(
    components: &[GaussianComponent],
    count: usize,
    rng: &mut R,
) -> Result<Vec<[f64; 2]>> {
    let factors = components
        .iter()
        .map(|component| {
            component.covariance.cholesky().ok_or_else(|| {
                computation_error(
                    "mixture sampling",
                    &format!("covariance {:?} is not positive definite", component.covariance),
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let weights: Vec<f64> = components.iter().map(|c| c.weight).collect();

    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        let index = select_weighted(&weights, rng.random::<f64>());
        if let (Some(component), Some(factor)) = (components.get(index), factors.get(index)) {
            let z0: f64 = rng.sample(StandardNormal);
            let z1: f64 = rng.sample(StandardNormal);
            let [[l11, _], [l21, l22]] = *factor;
            points.push([
                l11.mul_add(z0, component.mean[0]),
                l21.mul_add(z0, l22.mul_add(z1, component.mean[1])),
            ]);
        }
    }

    Ok(points)
}

fn squared_distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx.mul_add(dx, dy * dy)
}

fn nearest_center(point: [f64; 2], centers: &[[f64; 2]]) -> (usize, f64) {
    centers
        .iter()
        .enumerate()
        .map(|(index, &center)| (index, squared_distance(point, center)))
        .fold((0, f64::INFINITY), |best, candidate| {
            if candidate.1 < best.1 { candidate } else { best }
        })
}

// k-means++ seeding followed by Lloyd iterations
fn kmeans_labels<R: Rng + ?Sized>(points: &[[f64; 2]], clusters: usize, rng: &mut R) -> Vec<usize> {
    let mut centers = Vec::with_capacity(clusters);
    if let Some(&first) = points.get(rng.random_range(0..points.len().max(1))) {
        centers.push(first);
    }
    while centers.len() < clusters {
        let distances: Vec<f64> = points
            .iter()
            .map(|&point| nearest_center(point, &centers).1)
            .collect();
        let index = select_weighted(&distances, rng.random::<f64>());
        match points.get(index) {
            Some(&point) => centers.push(point),
            None => break,
        }
    }

    let mut labels = vec![0; points.len()];
    for _ in 0..KMEANS_ITERATIONS {
        let mut changed = false;
        for (label, &point) in labels.iter_mut().zip(points) {
            let (nearest, _) = nearest_center(point, &centers);
            if *label != nearest {
                *label = nearest;
                changed = true;
            }
        }

        let mut sums = vec![[0.0, 0.0, 0.0]; centers.len()];
        for (&label, &point) in labels.iter().zip(points) {
            if let Some(sum) = sums.get_mut(label) {
                sum[0] += point[0];
                sum[1] += point[1];
                sum[2] += 1.0;
            }
        }
        for (center, sum) in centers.iter_mut().zip(&sums) {
            // Empty clusters keep their previous center
            if sum[2] > 0.0 {
                *center = [sum[0] / sum[2], sum[1] / sum[2]];
            }
        }

        if !changed {
            break;
        }
    }

    labels
}

fn fit_mixture<R: Rng + ?Sized>(
    points: &[[f64; 2]],
    clusters: usize,
    rng: &mut R,
) -> Result<Vec<GaussianComponent>> {
    let labels = kmeans_labels(points, clusters, rng);
    let mut responsibilities = Array2::<f64>::zeros((points.len(), clusters));
    for (row, &label) in labels.iter().enumerate() {
        if let Some(cell) = responsibilities.get_mut([row, label]) {
            *cell = 1.0;
        }
    }

    let mut components = maximization(points, &responsibilities)?;
    let mut previous_bound = f64::NEG_INFINITY;

    for iteration in 0..MIXTURE_MAX_ITERATIONS {
        let lower_bound = expectation(points, &components, &mut responsibilities)?;
        components = maximization(points, &responsibilities)?;

        if (lower_bound - previous_bound).abs() < MIXTURE_TOLERANCE {
            log::trace!("Mixture fit converged after {} iterations", iteration + 1);
            break;
        }
        previous_bound = lower_bound;
    }

    Ok(components)
}

// Fills responsibilities and returns the mean log-likelihood
fn expectation(
    points: &[[f64; 2]],
    components: &[GaussianComponent],
    responsibilities: &mut Array2<f64>,
) -> Result<f64> {
    let mut weighted = vec![0.0; components.len()];
    let mut total = 0.0;

    for (&point, mut row) in points.iter().zip(responsibilities.outer_iter_mut()) {
        for (value, component) in weighted.iter_mut().zip(components) {
            let density = gaussian_log_density(point, component.mean, &component.covariance)
                .ok_or_else(|| computation_error("mixture expectation", &"singular covariance"))?;
            *value = component.weight.ln() + density;
        }

        let normalizer = log_sum_exp(&weighted);
        if !normalizer.is_finite() {
            return Err(computation_error(
                "mixture expectation",
                &"log-likelihood is not finite",
            ));
        }

        for (cell, value) in row.iter_mut().zip(&weighted) {
            *cell = (value - normalizer).exp();
        }
        total += normalizer;
    }

    Ok(total / points.len().max(1) as f64)
}

fn maximization(
    points: &[[f64; 2]],
    responsibilities: &Array2<f64>,
) -> Result<Vec<GaussianComponent>> {
    let sample_count = points.len().max(1) as f64;
    let masses = responsibilities.sum_axis(Axis(0));

    responsibilities
        .axis_iter(Axis(1))
        .zip(masses.iter())
        .map(|(column, &raw_mass)| {
            let mass = 10.0f64.mul_add(f64::EPSILON, raw_mass);

            let mut mean = [0.0, 0.0];
            for (&weight, point) in column.iter().zip(points) {
                mean[0] += weight * point[0];
                mean[1] += weight * point[1];
            }
            mean = [mean[0] / mass, mean[1] / mass];

            let mut covariance = Covariance {
                xx: 0.0,
                xy: 0.0,
                yy: 0.0,
            };
            for (&weight, point) in column.iter().zip(points) {
                let dx = point[0] - mean[0];
                let dy = point[1] - mean[1];
                covariance.xx += weight * dx * dx;
                covariance.xy += weight * dx * dy;
                covariance.yy += weight * dy * dy;
            }
            let covariance = Covariance {
                xx: covariance.xx / mass,
                xy: covariance.xy / mass,
                yy: covariance.yy / mass,
            }
            .regularized(MIXTURE_REGULARIZATION);

            if !covariance.is_finite() || !mean[0].is_finite() || !mean[1].is_finite() {
                return Err(computation_error(
                    "mixture maximization",
                    &"component parameters are not finite",
                ));
            }

            Ok(GaussianComponent {
                mean,
                covariance,
                weight: mass / sample_count,
            })
        })
        .collect()
}
