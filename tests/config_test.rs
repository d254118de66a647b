use flow_folio::config::{CONFIG_FILE, FolioConfig};

#[test]
fn defaults_match_the_shipped_showcase() {
    let config = FolioConfig::default();

    assert_eq!(config.scene_file, "Portfolio_3.glb");
    assert_eq!(config.collision_group, "Collision");
    assert_eq!(config.character.node_name, "Character");
    assert_eq!(config.character.move_distance, 5.0);
    assert_eq!(config.character.ray_heights, vec![1.0, 3.0, 5.0, 10.0]);
    assert_eq!(config.sky.len(), 4);
    assert_eq!(
        config.interactive_names(),
        vec!["Project_1", "Project_2", "Project_3"]
    );
}

#[test]
fn partial_json_keeps_the_other_defaults() {
    let config = FolioConfig::from_json(
        r#"{
            "character": { "move_distance": 2.5 },
            "camera": { "zoom": 1.5 }
        }"#,
    )
    .expect("valid config");

    let defaults = FolioConfig::default();
    assert_eq!(config.character.move_distance, 2.5);
    assert_eq!(config.character.node_name, defaults.character.node_name);
    assert_eq!(config.camera.zoom, 1.5);
    assert_eq!(config.camera.follow_offset, defaults.camera.follow_offset);
    assert_eq!(config.projects, defaults.projects);
    assert_eq!(config.lighting, defaults.lighting);
}

#[test]
fn projects_are_replaced_as_a_whole() {
    let config = FolioConfig::from_json(
        r#"{
            "projects": {
                "Arcade": { "title": "Arcade", "content": "a cabinet" }
            }
        }"#,
    )
    .expect("valid config");

    assert_eq!(config.interactive_names(), vec!["Arcade"]);
    let arcade = &config.projects["Arcade"];
    assert_eq!(arcade.link, None);
}

#[test]
fn broken_json_is_an_error() {
    assert!(FolioConfig::from_json("{ not json").is_err());
    assert!(FolioConfig::from_json(r#"{ "scene_file": 3 }"#).is_err());
}

#[test]
fn serialised_config_reads_back() {
    let config = FolioConfig::default();
    let json = serde_json::to_string(&config).expect("serialisable");

    assert_eq!(FolioConfig::from_json(&json).expect("valid"), config);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    assert_ne!(CONFIG_FILE, "no-such-folio.json");
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let config = runtime.block_on(FolioConfig::load("no-such-folio.json"));

    assert_eq!(config, FolioConfig::default());
}
