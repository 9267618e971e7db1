//! Assertions shared by the integration tests.

/// Assert that `actual` lies within `tolerance` of `expected`.
///
/// Accepts `f32` field values as well as `f64` metadata values.
pub fn assert_close(actual: impl Into<f64>, expected: f64, tolerance: f64) {
    let actual = actual.into();
    assert!(
        (actual - expected).abs() <= tolerance,
        "{} is not within {} of {}",
        actual,
        tolerance,
        expected
    );
}

/// Assert that two rainfall fields match pixel by pixel within `tolerance`
pub fn assert_field_close(actual: &[f32], expected: &[f32], tolerance: f32) {
    assert_eq!(actual.len(), expected.len(), "Field sizes differ");

    let worst = actual
        .iter()
        .zip(expected)
        .enumerate()
        .map(|(pixel, (a, e))| (pixel, (a - e).abs()))
        .fold((0, 0.0f32), |acc, cur| if cur.1 > acc.1 { cur } else { acc });
    assert!(
        worst.1 <= tolerance,
        "Pixel {} differs by {} (tolerance {}): {:?} vs {:?}",
        worst.0,
        worst.1,
        tolerance,
        actual,
        expected
    );
}

/// Keys every metadata record must carry
pub const METADATA_KEYS: [&str; 16] = [
    "accutime",
    "cartesian_unit",
    "institution",
    "projection",
    "threshold",
    "time_stamps",
    "transform",
    "unit",
    "x1",
    "x2",
    "xpixelsize",
    "y1",
    "y2",
    "yorigin",
    "ypixelsize",
    "zerovalue",
];

/// Assert that a serialized metadata record holds exactly the expected keys.
///
/// # Panics
///
/// Panics if `json` is not an object or if a key is missing or unexpected.
pub fn assert_metadata_keys(json: &serde_json::Value) {
    let object = json
        .as_object()
        .unwrap_or_else(|| panic!("Metadata is not a JSON object: {}", json));

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, METADATA_KEYS.to_vec(), "Unexpected metadata keys");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_close() {
        assert_close(1300.0f32, 1300.0, 0.0);
        assert_close(0.1f32 * 23.0, 2.3, 1e-5);
        assert_field_close(&[0.1, 0.2], &[0.1, 0.2000001], 1e-5);
    }

    #[test]
    #[should_panic(expected = "Pixel 1 differs")]
    fn test_assert_field_close_reports_pixel() {
        assert_field_close(&[0.0, 1.0, 2.0], &[0.0, 1.5, 2.0], 0.1);
    }

    #[test]
    fn test_assert_metadata_keys() {
        let json = serde_json::Value::Object(
            METADATA_KEYS
                .iter()
                .map(|key| (key.to_string(), serde_json::Value::Null))
                .collect(),
        );
        assert_metadata_keys(&json);
    }
}
