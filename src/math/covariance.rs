//! Symmetric 2x2 covariance matrices for bivariate Gaussians

/// Symmetric positive definite 2x2 matrix stored by its three distinct entries
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Covariance {
    /// Variance along x
    pub xx: f64,
    /// Covariance between x and y
    pub xy: f64,
    /// Variance along y
    pub yy: f64,
}

impl Covariance {
    /// Covariance with equal variance on both axes and no correlation
    pub const fn isotropic(variance: f64) -> Self {
        Self {
            xx: variance,
            xy: 0.0,
            yy: variance,
        }
    }

    /// Determinant of the matrix
    pub fn determinant(&self) -> f64 {
        self.xx.mul_add(self.yy, -(self.xy * self.xy))
    }

    /// Inverse of the matrix, `None` when it is singular or not finite
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if !det.is_finite() || det <= 0.0 {
            return None;
        }
        Some(Self {
            xx: self.yy / det,
            xy: -self.xy / det,
            yy: self.xx / det,
        })
    }

    /// Lower triangular Cholesky factor `[[l11, 0], [l21, l22]]`
    ///
    /// Returns `None` when the matrix is not positive definite.
    pub fn cholesky(&self) -> Option<[[f64; 2]; 2]> {
        if self.xx.is_nan() || self.xx <= 0.0 {
            return None;
        }
        let l11 = self.xx.sqrt();
        let l21 = self.xy / l11;
        let remainder = l21.mul_add(-l21, self.yy);
        if remainder.is_nan() || remainder <= 0.0 {
            return None;
        }
        Some([[l11, 0.0], [l21, remainder.sqrt()]])
    }

    /// Squared Mahalanobis length of `(dx, dy)` under this inverse covariance
    ///
    /// Call on the result of [`Covariance::inverse`].
    pub fn quadratic_form(&self, dx: f64, dy: f64) -> f64 {
        (self.xx * dx).mul_add(dx, (2.0 * self.xy * dx).mul_add(dy, self.yy * dy * dy))
    }

    /// Copy with `amount` added to both diagonal entries
    pub fn regularized(&self, amount: f64) -> Self {
        Self {
            xx: self.xx + amount,
            xy: self.xy,
            yy: self.yy + amount,
        }
    }

    /// Whether every entry is finite
    pub const fn is_finite(&self) -> bool {
        self.xx.is_finite() && self.xy.is_finite() && self.yy.is_finite()
    }
}
