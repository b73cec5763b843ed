mod common;

use common::{lock, Bus};
use dc1394::feature::{Mode, Range};
use dc1394::{Camera, Feature, Result};

#[test]
fn normalized_value_roundtrips() -> Result<()> {
    let bus = Bus::mono_camera();
    let ctx = common::context(&bus);
    let mut camera = Camera::new(&ctx)?;
    camera.open(0usize)?;

    let range = camera.brightness_range()?;
    assert_eq!(range, Range::new(16, 1023));
    let unit = 1.0 / (range.max - range.min) as f32;

    for step in 0..=20 {
        let x = step as f32 / 20.0;
        camera.set_brightness_norm(x)?;
        assert!((camera.brightness_norm()? - x).abs() <= unit);
    }

    camera.set_gain_norm(1.0)?;
    assert_eq!(camera.gain()?, 1023);
    camera.set_gain_norm(0.0)?;
    assert_eq!(camera.gain()?, 16);
    Ok(())
}

#[test]
fn setting_switches_feature_to_manual() -> Result<()> {
    let bus = Bus::mono_camera();
    let ctx = common::context(&bus);
    let mut camera = Camera::new(&ctx)?;
    camera.open(0usize)?;
    let mark = lock(&bus).calls.len();

    camera.set_gamma(300)?;
    assert_eq!(camera.gamma()?, 300);

    let bus = lock(&bus);
    assert_eq!(
        &bus.calls[mark..],
        [
            "set_feature_power(Gamma, true)",
            "set_feature_mode(Gamma, Manual)",
            "set_feature_value(Gamma, 300)",
        ]
    );
    let state = bus.features[&Feature::Gamma];
    assert!(state.on);
    assert_eq!(state.mode, Some(Mode::Manual));
    Ok(())
}

#[test]
fn absolute_values_enable_absolute_control() -> Result<()> {
    let bus = Bus::mono_camera();
    let ctx = common::context(&bus);
    let mut camera = Camera::new(&ctx)?;
    camera.open(0usize)?;

    camera.set_shutter_abs(0.004)?;
    assert_eq!(camera.shutter_abs()?, 0.004);

    let state = lock(&bus).features[&Feature::Shutter];
    assert!(state.absolute_control);
    assert_eq!(state.mode, Some(Mode::Manual));
    Ok(())
}

#[test]
fn closed_session_reports_neutral_values() -> Result<()> {
    let bus = Bus::mono_camera();
    let ctx = common::context(&bus);
    let mut camera = Camera::new(&ctx)?;

    assert_eq!(camera.exposure()?, 0);
    assert_eq!(camera.exposure_norm()?, 0.0);
    assert_eq!(camera.shutter_abs()?, 0.0);
    assert_eq!(camera.gain_range()?, Range::default());
    assert!(camera.features()?.is_empty());

    camera.set_exposure(100)?;
    camera.set_brightness_norm(0.5)?;
    camera.set_shutter_abs(0.01)?;
    assert!(lock(&bus).calls.is_empty());
    Ok(())
}

#[test]
fn feature_report_lists_camera_features() -> Result<()> {
    let bus = Bus::mono_camera();
    let ctx = common::context(&bus);
    let mut camera = Camera::new(&ctx)?;
    camera.open(0usize)?;

    let features = camera.features()?;
    let ids: Vec<_> = features.iter().map(|info| info.feature).collect();
    assert_eq!(
        ids,
        [
            Feature::Brightness,
            Feature::Exposure,
            Feature::Gamma,
            Feature::Shutter,
            Feature::Gain,
        ]
    );
    assert!(features[0].to_string().contains("Range      : [16, 1023]"));
    Ok(())
}
