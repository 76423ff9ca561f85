//! Tests for cluster model fitting and sampling

#[cfg(test)]
mod tests {
    use dazzle::GenerationError;
    use dazzle::math::covariance::Covariance;
    use dazzle::math::mixture::{ClusterModel, GaussianComponent, random_exponents};
    use geo::{Contains, Coord, LineString, Point, Polygon};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn square(side: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![(0.0, 0.0), (side, 0.0), (side, side), (0.0, side)]),
            vec![],
        )
    }

    fn mean_of(points: &[Coord<f64>]) -> Coord<f64> {
        let sum = points
            .iter()
            .fold(Coord { x: 0.0, y: 0.0 }, |acc, &point| acc + point);
        sum / points.len() as f64
    }

    // Tests exponents are drawn in the half-open unit interval (0, 1]
    #[test]
    fn test_random_exponents_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let exponents = random_exponents(64, &mut rng);

        assert_eq!(exponents.len(), 64);
        assert!(exponents.iter().all(|&e| e > 0.0 && e <= 1.0));
    }

    // Tests invalid exponent lists are rejected before fitting
    #[test]
    fn test_fit_rejects_invalid_exponents() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let envelope = square(10.0);

        for exponents in [vec![], vec![0.5, 0.0], vec![1.5], vec![f64::NAN]] {
            let result = ClusterModel::fit(&exponents, &envelope, &mut rng);
            assert!(
                matches!(result, Err(GenerationError::InvalidParameter { .. })),
                "exponents {exponents:?} should be rejected"
            );
        }
    }

    // Tests a fitted model has one normalised component per exponent
    #[test]
    fn test_fit_component_count_and_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let model = ClusterModel::fit(&[0.5, 0.6, 0.7], &square(100.0), &mut rng)
            .expect("fit on a square succeeds");

        let components = model.components();
        assert_eq!(components.len(), 3);

        let total: f64 = components.iter().map(|c| c.weight).sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert!(
            components
                .iter()
                .all(|c| c.covariance.is_finite() && c.covariance.cholesky().is_some())
        );
    }

    // Tests fitting and sampling are reproducible for a seed
    #[test]
    fn test_fit_and_sample_deterministic() {
        let envelope = square(50.0);
        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let model = ClusterModel::fit(&[0.4, 0.8], &envelope, &mut rng).expect("fit succeeds");
            let points = model.sample(20, &mut rng).expect("sampling succeeds");
            (model, points)
        };

        assert_eq!(run(11), run(11));
        assert_ne!(run(11).1, run(12).1);
    }

    // Tests direct sampling concentrates around a known component mean
    #[test]
    fn test_sample_known_component() {
        let model = ClusterModel::from_components(vec![GaussianComponent {
            mean: [5.0, -3.0],
            covariance: Covariance::isotropic(1.0),
            weight: 1.0,
        }])
        .expect("single unit-weight component is valid");
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        assert!(model.sample(0, &mut rng).expect("empty draw").is_empty());

        let points = model.sample(2000, &mut rng).expect("sampling succeeds");
        let mean = mean_of(&points);
        assert_eq!(points.len(), 2000);
        assert!((mean.x - 5.0).abs() < 0.2, "mean x {}", mean.x);
        assert!((mean.y + 3.0).abs() < 0.2, "mean y {}", mean.y);
    }

    // Tests components whose weights do not sum to one are rejected
    #[test]
    fn test_from_components_requires_normalised_weights() {
        let component = GaussianComponent {
            mean: [0.0, 0.0],
            covariance: Covariance::isotropic(1.0),
            weight: 0.5,
        };

        assert!(ClusterModel::from_components(vec![component.clone()]).is_err());
        assert!(ClusterModel::from_components(vec![]).is_err());
        assert!(ClusterModel::from_components(vec![component.clone(), component]).is_ok());
    }

    // Tests envelope-constrained sampling keeps exactly the requested inside points
    #[test]
    fn test_sample_within_envelope() {
        let envelope = square(4.0);
        let model = ClusterModel::from_components(vec![GaussianComponent {
            mean: [2.0, 2.0],
            covariance: Covariance::isotropic(9.0),
            weight: 1.0,
        }])
        .expect("valid component");
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let points = model
            .sample_within_envelope(&envelope, 100, &mut rng)
            .expect("sampling succeeds");

        assert_eq!(points.len(), 100);
        assert!(points.iter().all(|&p| envelope.contains(&Point::from(p))));
    }
}
