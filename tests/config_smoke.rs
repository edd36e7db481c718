use toaster_physics::{ParticleManager, SimError, SimulationConfig, Vec2};

#[test]
fn config_json_round_trips_through_the_manager() {
    let json = r#"{
        "maxParticles": 64,
        "cellSpacing": 4.0,
        "worldExtent": 120,
        "gravity": [0.0, -3.0]
    }"#;

    let world = ParticleManager::from_config_json(json).expect("config should parse");
    let config = world.config();
    assert_eq!(world.capacity(), 64);
    assert_eq!(config.cell_spacing, 4.0);
    // Unspecified fields keep their defaults
    assert_eq!(config.world_margin, 10.0);
    assert_eq!(config.combined_radius, 2.0);
    assert_eq!(world.gravity(), Vec2::new(0.0, -3.0));
    assert_eq!(world.bounds().max, 119.0);

    let reparsed = SimulationConfig::from_json(&config.to_json()).unwrap();
    assert_eq!(&reparsed, config);
}

#[test]
fn out_of_range_config_is_rejected() {
    let tight = r#"{ "worldExtent": 12, "worldMargin": 10, "particleRadius": 2 }"#;
    assert!(matches!(
        ParticleManager::from_config_json(tight),
        Err(SimError::InvalidConfiguration { .. })
    ));

    let typo = r#"{ "maxParticles": "lots" }"#;
    let err = ParticleManager::from_config_json(typo).err().unwrap();
    assert!(matches!(err, SimError::ConfigParse(_)));
    assert!(!err.to_string().is_empty());
}

#[test]
fn gravity_setter_updates_effective_config() {
    let mut world = ParticleManager::new(4, 2.0).unwrap();
    world.set_gravity(1.0, 0.0);
    assert_eq!(world.config().gravity, [1.0, 0.0]);
    assert!(world.config().to_json().contains("\"gravity\":[1.0,0.0]"));
}
