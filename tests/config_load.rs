use drone_swarm::{FormationKind, RhythmKind, Swarm, SwarmConfig, SwarmError};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_toml() {
    let file = write_config(
        ".toml",
        r#"
agent_count = 12
formation = "spiral"
rhythm = "Polyrhythm"
scale = "Dorian"
root_note = 48
seed = 99
"#,
    );
    let config = SwarmConfig::load(file.path()).unwrap();
    assert_eq!(config.agent_count, 12);
    assert_eq!(config.root_note, 48);
    assert_eq!(config.seed, Some(99));
    // Unset fields keep their defaults
    assert_eq!(config.chaos, SwarmConfig::default().chaos);

    let swarm = Swarm::new(config);
    assert_eq!(swarm.formation_kind(), FormationKind::Spiral);
    assert_eq!(swarm.rhythm_kind(), RhythmKind::Polyrhythm);
    assert_eq!(swarm.agents().len(), 12);
    assert_eq!(&swarm.scale_notes()[..3], &[48u8, 50, 51]);
}

#[test]
fn test_load_json() {
    let file = write_config(".json", r#"{ "agent_count": 3, "chaos": 0.9 }"#);
    let config = SwarmConfig::load(file.path()).unwrap();
    assert_eq!(config.agent_count, 3);
    assert!((config.chaos - 0.9).abs() < 1e-6);
}

#[test]
fn test_out_of_range_values_are_clamped() {
    let file = write_config(".toml", "chaos = 4.0\nformation_strength = -1.0\nroot_note = 300\n");
    let config = SwarmConfig::load(file.path()).unwrap().normalized();
    assert_eq!(config.chaos, 1.0);
    assert_eq!(config.formation_strength, 0.0);
    assert_eq!(config.root_pitch(), 127);
}

#[test]
fn test_garbage_is_a_parse_error() {
    let file = write_config(".toml", "this is = = not a config");
    match SwarmConfig::load(file.path()) {
        Err(SwarmError::ConfigParse(_)) => {}
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = SwarmConfig::load(&dir.path().join("missing.toml"));
    assert!(matches!(result, Err(SwarmError::Io(_))));
}

#[test]
fn test_default_round_trips_through_toml() {
    let text = SwarmConfig::default().to_toml().unwrap();
    let parsed = SwarmConfig::parse(&text).unwrap();
    assert_eq!(parsed.agent_count, SwarmConfig::default().agent_count);
    assert_eq!(parsed.formation, "Circle");
}
