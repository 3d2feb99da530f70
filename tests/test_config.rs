use boss_fight::config::*;
use boss_fight::error::ConfigError;
use boss_fight::projectile::ProjectileKind;

use pretty_assertions::assert_eq;

#[test]
fn defaults_are_valid() {
    let config = MatchConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.player.lives, 3);
    assert_eq!(config.boss.lives, 5);
    assert_eq!(config.world.ground_y, 148.0);
    assert_eq!(config.world.platforms.len(), 1);
    assert_eq!(config.ground_top(48.0), 100.0);
}

#[test]
fn shipped_config_matches_the_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/match.ron");
    let loaded = MatchConfig::load(path).unwrap();
    assert_eq!(loaded, MatchConfig::default());
}

#[test]
fn partial_file_keeps_the_other_defaults() {
    let config = MatchConfig::from_ron(
        "inline",
        "(player: (lives: 5, jump: (v_i: -12.0, g: 1.0)), boss: (ammo: Carrot))",
    )
    .unwrap();

    assert_eq!(config.player.lives, 5);
    assert_eq!(config.player.jump, ArcParams::new(-12.0, 1.0));
    assert_eq!(config.player.walk_speed, 1.0);
    assert_eq!(config.boss.ammo, ProjectileKind::Carrot);
    assert_eq!(config.boss.lives, 5);
    assert_eq!(config.timing, MatchTimings::default());
}

#[test]
fn zero_lives_are_rejected() {
    let err = MatchConfig::from_ron("inline", "(boss: (lives: 0))").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn non_positive_gravity_is_rejected() {
    let err = MatchConfig::from_ron("inline", "(projectile: (throw_arc: (v_i: -4.0, g: 0.0)))")
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("gravity")));
}

#[test]
fn ground_outside_the_world_is_rejected() {
    let mut config = MatchConfig::default();
    config.world.ground_y = 500.0;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn malformed_ron_reports_the_source() {
    let err = MatchConfig::from_ron("match.ron", "(player: (lives: \"many\"))").unwrap_err();
    match &err {
        ConfigError::Parse { path, .. } => assert_eq!(path, "match.ron"),
        other => panic!("expected a parse error, got {other:?}"),
    }
    assert!(err.to_string().starts_with("Parse error in 'match.ron'"));
}

#[test]
fn missing_file_is_a_read_error_but_falls_back_to_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/does-not-exist.ron");
    assert!(matches!(MatchConfig::load(path), Err(ConfigError::Read { .. })));
    assert_eq!(MatchConfig::load_or_default(path), MatchConfig::default());
}
