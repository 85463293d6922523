use super::*;

#[test]
fn defaults_match_documented_values() {
    let opts = RasterOpts::default();
    assert_eq!(opts.supersample, SupersampleFactor::X3);
    assert_eq!(opts.max_aa_surface_size, 4096);
    assert_eq!(opts.pool, PoolOpts::default());
}

#[test]
fn partial_json_keeps_defaults() {
    let opts = RasterOpts::from_json_str(r#"{ "supersample": 2, "pool": { "max_surfaces_per_domain": 2 } }"#)
        .unwrap();
    assert_eq!(opts.supersample, SupersampleFactor::X2);
    assert_eq!(opts.max_aa_surface_size, 4096);
    assert_eq!(opts.pool.max_surfaces_per_domain, 2);
    assert_eq!(opts.pool.max_pool_bytes, PoolOpts::default().max_pool_bytes);
}

#[test]
fn bad_json_is_a_config_error() {
    let err = RasterOpts::from_json_str(r#"{ "supersample": 4 }"#).unwrap_err();
    assert!(matches!(err, RasterError::Config(_)));
    let err = RasterOpts::from_json_str(r#"{ "max_aa_surface_size": 0 }"#).unwrap_err();
    assert!(matches!(err, RasterError::Config(_)));
}

#[test]
fn env_overrides_apply_valid_values_only() {
    let opts = RasterOpts::default().with_overrides_from(|k| match k {
        ENV_SUPERSAMPLE => Some("1".to_string()),
        ENV_MAX_SURFACE_SIZE => Some(" 512 ".to_string()),
        _ => None,
    });
    assert_eq!(opts.supersample, SupersampleFactor::X1);
    assert_eq!(opts.max_aa_surface_size, 512);

    let untouched = RasterOpts::default().with_overrides_from(|k| match k {
        ENV_SUPERSAMPLE => Some("9".to_string()),
        ENV_MAX_SURFACE_SIZE => Some("0".to_string()),
        _ => None,
    });
    assert_eq!(untouched, RasterOpts::default());
}

#[test]
fn serializes_supersample_as_a_number() {
    let json = serde_json::to_value(RasterOpts::default()).unwrap();
    assert_eq!(json["supersample"], 3);
    assert_eq!(json["max_aa_surface_size"], 4096);
}
