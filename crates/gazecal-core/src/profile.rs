//! Calibration profile: the owned point collection for one user/device
//! plus the cached fitted mapping derived from it.
//!
//! Invariant: the cached fit is `Some` only while it was produced from the
//! *current* point sequence. Every mutation of the points clears the cache;
//! recomputation is explicit (see `CalibrationAgent::fit` in
//! `gazecal-engine`) so fitting cost stays out of the per-sample path.

use serde::{Deserialize, Serialize};

use crate::mapping::PolynomialMapping;
use crate::math::Real;
use crate::types::CalibrationPoint;

/// Stable identifier for one user/device combination.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ProfileId(String);

impl ProfileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProfileId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Calibration data and derived mapping for one user/device.
///
/// Points are kept in insertion order for reproducibility; the fitter does
/// not depend on order for correctness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProfile {
    profile_id: ProfileId,
    points: Vec<CalibrationPoint>,
    fitted_mapping: Option<PolynomialMapping>,
    fit_quality: Option<Real>,
}

impl CalibrationProfile {
    /// Create an empty profile for `profile_id`.
    pub fn new(profile_id: ProfileId) -> Self {
        Self {
            profile_id,
            points: Vec::new(),
            fitted_mapping: None,
            fit_quality: None,
        }
    }

    pub fn profile_id(&self) -> &ProfileId {
        &self.profile_id
    }

    /// The calibration points, in insertion order.
    pub fn points(&self) -> &[CalibrationPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append a point and invalidate any cached fit.
    pub fn add_point(&mut self, point: CalibrationPoint) {
        self.points.push(point);
        self.invalidate_fit();
    }

    /// Remove all points and invalidate any cached fit.
    pub fn clear_points(&mut self) {
        self.points.clear();
        self.invalidate_fit();
    }

    /// The cached mapping, if the current points have been fitted.
    pub fn fitted_mapping(&self) -> Option<&PolynomialMapping> {
        self.fitted_mapping.as_ref()
    }

    /// RMS residual of the cached mapping over its training points.
    pub fn fit_quality(&self) -> Option<Real> {
        self.fit_quality
    }

    /// True when a usable mapping is cached.
    pub fn is_calibrated(&self) -> bool {
        self.fitted_mapping.is_some()
    }

    /// Install a mapping fitted from the current points.
    ///
    /// The caller must have produced `mapping`/`quality` from
    /// [`points()`](Self::points) as they currently stand.
    pub fn set_fit(&mut self, mapping: PolynomialMapping, quality: Real) {
        self.fitted_mapping = Some(mapping);
        self.fit_quality = Some(quality);
    }

    fn invalidate_fit(&mut self) {
        self.fitted_mapping = None;
        self.fit_quality = None;
    }
}
