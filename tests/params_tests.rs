#![allow(missing_docs)]

use trackevo::simulation::error::Error;
use trackevo::simulation::params::Params;

#[test]
fn test_default_params_are_valid() {
    let params = Params::default();
    assert!(params.validate().is_ok());
    assert_eq!(params.sensor_angles.len(), 3);
    assert_eq!(params.pop_size, 10);
}

#[test]
fn test_invalid_params() {
    let cases = [
        Params {
            world_width: 0.0,
            ..Params::default()
        },
        Params {
            grid_size: 0,
            ..Params::default()
        },
        Params {
            min_speed: 8.0,
            ..Params::default()
        },
        Params {
            sensor_angles: Vec::new(),
            ..Params::default()
        },
        Params {
            num_parents: 11,
            ..Params::default()
        },
        Params {
            mut_rate: 1.5,
            ..Params::default()
        },
        Params {
            max_ticks_per_generation: Some(0),
            ..Params::default()
        },
    ];

    for params in cases {
        assert!(
            matches!(params.validate(), Err(Error::InvalidParams(_))),
            "{params:?} should be rejected"
        );
    }
}

#[test]
fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.json");

    let params = Params {
        pop_size: 24,
        sensor_angles: vec![-60.0, -20.0, 0.0, 20.0, 60.0],
        max_ticks_per_generation: None,
        ..Params::default()
    };
    params.save_to_file(&path).unwrap();

    let loaded = Params::load_from_file(&path).unwrap();
    assert_eq!(loaded, params);
}

#[test]
fn test_partial_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.json");
    std::fs::write(&path, r#"{"pop_size": 4}"#).unwrap();

    let loaded = Params::load_from_file(&path).unwrap();
    assert_eq!(loaded.pop_size, 4);
    assert_eq!(loaded.hidden_size, Params::default().hidden_size);
}

#[test]
fn test_load_rejects_invalid_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.json");
    std::fs::write(&path, r#"{"pop_size": 1}"#).unwrap();

    assert!(matches!(
        Params::load_from_file(&path),
        Err(Error::InvalidParams(_))
    ));
}

#[test]
fn test_load_missing_file() {
    assert!(matches!(
        Params::load_from_file("/definitely/not/params.json"),
        Err(Error::Io(_))
    ));
}
