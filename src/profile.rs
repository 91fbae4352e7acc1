//! Electron-density profile input container.
//!
//! A [`DensityProfile`] carries the two parallel arrays a sounder or an
//! empirical model produces — heights and either plasma frequencies or
//! electron densities — validated once at construction so the model builder
//! can walk them without re-checking.

use itertools::izip;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{Kilometer, MegaHertz};
use crate::geometry::{height_to_radial, ne_to_plasma_frequency};
use crate::skywave_errors::SkywaveError;

/// Unit of the profile value array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProfileUnit {
    /// Values are plasma frequencies in MHz.
    PlasmaFrequencyMhz,
    /// Values are electron densities in m⁻³.
    ElectronDensityPerM3,
}

/// A validated height/density profile, ordered bottom-to-top.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DensityProfile {
    heights: Vec<Kilometer>,
    values: Vec<f64>,
    unit: ProfileUnit,
}

impl DensityProfile {
    /// Build a profile from parallel height and value arrays.
    ///
    /// Arguments
    /// -----------------
    /// * `heights`: sample heights in km, strictly ascending.
    /// * `values`: matching plasma frequencies or electron densities; fill
    ///   values (negative densities, sub-0.1 MHz frequencies) are tolerated
    ///   and neutralized during conversion.
    /// * `unit`: unit tag for `values`.
    ///
    /// Return
    /// ----------
    /// * The validated profile, or a [`SkywaveError`] describing the first
    ///   violated constraint.
    pub fn new(
        heights: Vec<Kilometer>,
        values: Vec<f64>,
        unit: ProfileUnit,
    ) -> Result<Self, SkywaveError> {
        if heights.len() != values.len() {
            return Err(SkywaveError::ProfileLengthMismatch {
                heights: heights.len(),
                values: values.len(),
            });
        }
        if let Some(idx) = heights.windows(2).position(|w| w[1] <= w[0]) {
            return Err(SkywaveError::ProfileNotAscending(idx + 1));
        }
        Ok(Self {
            heights,
            values,
            unit,
        })
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn heights(&self) -> &[Kilometer] {
        &self.heights
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn unit(&self) -> ProfileUnit {
        self.unit
    }

    /// Convert to the working arrays the fit loop consumes: radial distances,
    /// plasma frequencies (MHz, floored at 0.1 for frequency inputs) and their
    /// squares.
    pub(crate) fn working_arrays(&self) -> (Vec<Kilometer>, Vec<MegaHertz>, Vec<f64>) {
        let mut radials = Vec::with_capacity(self.len());
        let mut fp = Vec::with_capacity(self.len());
        let mut fp2 = Vec::with_capacity(self.len());

        for (&height, &value) in izip!(&self.heights, &self.values) {
            let freq = match self.unit {
                ProfileUnit::PlasmaFrequencyMhz => value.max(0.1),
                ProfileUnit::ElectronDensityPerM3 => ne_to_plasma_frequency(value),
            };
            radials.push(height_to_radial(height));
            fp.push(freq);
            fp2.push(freq * freq);
        }
        (radials, fp, fp2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_lengths() {
        let err = DensityProfile::new(vec![100.0, 110.0], vec![1.0], ProfileUnit::PlasmaFrequencyMhz)
            .unwrap_err();
        assert_eq!(
            err,
            SkywaveError::ProfileLengthMismatch {
                heights: 2,
                values: 1
            }
        );
    }

    #[test]
    fn rejects_unsorted_heights() {
        let err = DensityProfile::new(
            vec![100.0, 120.0, 110.0],
            vec![1.0, 2.0, 3.0],
            ProfileUnit::PlasmaFrequencyMhz,
        )
        .unwrap_err();
        assert_eq!(err, SkywaveError::ProfileNotAscending(2));
    }

    #[test]
    fn frequency_floor_applies_to_frequency_inputs_only() {
        let profile = DensityProfile::new(
            vec![60.0, 70.0],
            vec![0.02, 3.0],
            ProfileUnit::PlasmaFrequencyMhz,
        )
        .expect("valid profile");
        let (radials, fp, fp2) = profile.working_arrays();
        assert_eq!(radials[0], 6430.0);
        assert_eq!(fp[0], 0.1);
        assert_eq!(fp2[1], 9.0);
    }

    #[test]
    fn density_fill_values_convert_to_zero() {
        let profile = DensityProfile::new(
            vec![60.0, 70.0],
            vec![-1.0, 4.0832e7],
            ProfileUnit::ElectronDensityPerM3,
        )
        .expect("valid profile");
        let (_, fp, _) = profile.working_arrays();
        assert_eq!(fp[0], 0.0);
        assert!(fp[1] > 0.05 && fp[1] < 0.06);
    }
}
