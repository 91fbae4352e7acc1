mod common;

use approx::assert_relative_eq;

use crate::common::{fixture_model, fixture_profile};

#[test]
fn fixture_profile_fits_contiguously() {
    assert_eq!(fixture_profile().len(), 55);

    let model = fixture_model();
    let segments = model.segments();
    assert!(!segments.is_empty());
    assert_eq!(model.top_radial(), 6370.0 + 600.0);
    // The walk reaches well below the E region even when windows shrink.
    assert!(model.bottom_radial() < 6370.0 + 150.0);

    for pair in segments.windows(2) {
        assert_eq!(pair[0].radial_lower, pair[1].radial_upper);
        assert!(pair[0].radial_upper > pair[1].radial_upper);
    }
}

#[test]
fn joins_carry_value_and_gradient_on_the_real_profile() {
    let model = fixture_model();
    for pair in model.segments().windows(2) {
        let join = pair[0].radial_lower;
        assert_relative_eq!(
            pair[0].plasma_freq_squared(join),
            pair[1].plasma_freq_squared(join),
            max_relative = 1e-8
        );
        assert_relative_eq!(
            pair[0].gradient(join),
            pair[1].gradient(join),
            epsilon = 1e-8
        );
    }
}

#[test]
fn critical_scan_finds_both_layers_at_5_mhz() {
    let model = fixture_model();
    let layers = model.critical_layers(5.0);

    let e = layers.e.expect("E ledge reflects near 105 km");
    assert!(e.height() > 90.0 && e.height() < 110.0);
    assert!(
        e.critical_frequency > 0.8 && e.critical_frequency < 1.3,
        "foE {:.3} MHz",
        e.critical_frequency
    );

    let f2 = layers.f2.expect("F2 peak reflects near 250 km");
    assert!(f2.height() > 200.0 && f2.height() < 320.0);
    assert!(
        f2.critical_frequency > 3.9 && f2.critical_frequency < 4.7,
        "foF2 {:.3} MHz",
        f2.critical_frequency
    );
}
