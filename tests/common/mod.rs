//! Shared ionosphere fixture: a mid-latitude daytime electron-density
//! profile with an E-region ledge near 105 km and an F2 peak near 250 km,
//! sampled every 10 km from 60 to 600 km. The first sample is a
//! below-ionosphere fill value.

use skywave::profile::{DensityProfile, ProfileUnit};
use skywave::qp_model::{QpFitParams, QpModel};

const DENSITY_PER_M3: [f64; 55] = [
    -1.0000e+00,
    4.0832e+07,
    3.3141e+08,
    3.0278e+09,
    1.3428e+10,
    1.4140e+10,
    1.0666e+10,
    1.0703e+10,
    1.4163e+10,
    1.7500e+10,
    2.2089e+10,
    2.8963e+10,
    4.2184e+10,
    7.1019e+10,
    1.0656e+11,
    1.4410e+11,
    1.7807e+11,
    2.0393e+11,
    2.1960e+11,
    2.2585e+11,
    2.2571e+11,
    2.2190e+11,
    2.1520e+11,
    2.0634e+11,
    1.9598e+11,
    1.8472e+11,
    1.7304e+11,
    1.6133e+11,
    1.4987e+11,
    1.3885e+11,
    1.2840e+11,
    1.1860e+11,
    1.0948e+11,
    1.0105e+11,
    9.3284e+10,
    8.6160e+10,
    7.9638e+10,
    7.3679e+10,
    6.8239e+10,
    6.3275e+10,
    5.8747e+10,
    5.4615e+10,
    5.0843e+10,
    4.7398e+10,
    4.4249e+10,
    4.1367e+10,
    3.8728e+10,
    3.6308e+10,
    3.4085e+10,
    3.2043e+10,
    3.0163e+10,
    2.8431e+10,
    2.6833e+10,
    2.5356e+10,
    2.3990e+10,
];

pub fn fixture_profile() -> DensityProfile {
    let heights: Vec<f64> = (0..DENSITY_PER_M3.len())
        .map(|i| 60.0 + 10.0 * i as f64)
        .collect();
    DensityProfile::new(
        heights,
        DENSITY_PER_M3.to_vec(),
        ProfileUnit::ElectronDensityPerM3,
    )
    .expect("fixture profile is well formed")
}

pub fn fixture_model() -> QpModel {
    QpModel::from_profile(&fixture_profile(), &QpFitParams::default()).expect("fixture fits")
}
