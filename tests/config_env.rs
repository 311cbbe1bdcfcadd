// tests/config_env.rs
use std::{env, fs};

use spotbot::config::BotConfig;
use spotbot::BotError;

const TOML: &str = r#"
[discord]
token = "ENV"
bot_user_id = "42"
pota_channel_id = "100"
sota_channel_id = "200"

[roster]
csv_url = "https://docs.google.com/spreadsheets/d/abc/edit"

[poll]
interval_secs = 30
peak_map_path = "config/summits.csv"
"#;

#[serial_test::serial]
#[test]
fn token_is_read_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("spotbot.toml");
    fs::write(&p, TOML).unwrap();

    env::set_var("DISCORD_BOT_TOKEN", "from-env");
    let cfg = BotConfig::load_from_file(&p).unwrap();
    env::remove_var("DISCORD_BOT_TOKEN");

    assert_eq!(cfg.discord.token, "from-env");
    assert_eq!(cfg.poll_interval().as_secs(), 30);
    assert_eq!(cfg.poll.throttle_secs, 4 * 3600);
    assert!(cfg.roster_source().file.is_none());
}

#[serial_test::serial]
#[test]
fn missing_env_token_is_config_error() {
    env::remove_var("DISCORD_BOT_TOKEN");
    let err = BotConfig::from_toml_str(TOML).unwrap_err();
    assert!(matches!(err, BotError::Config(ref m) if m.contains("DISCORD_BOT_TOKEN")));
}

#[test]
fn missing_file_is_config_error() {
    assert!(matches!(
        BotConfig::load_from_file("nope/spotbot.toml"),
        Err(BotError::Config(_))
    ));
}
