use overlay_kit::config::{BehaviorConfig, Config, NotificationConfig, OverlayConfig, ThemeConfig};
use overlay_kit::{OverlaySize, Position};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_config_default_has_expected_values() {
    let config = Config::default();

    // Overlay defaults
    assert_eq!(config.overlay.exit_delay_ms, 300);
    assert_eq!(config.overlay.size, OverlaySize::Md);
    assert!(config.overlay.close_on_backdrop);
    assert!(config.overlay.show_close_button);

    // Notification defaults
    assert_eq!(config.notification.duration_ms, 3000);
    assert_eq!(config.notification.position, Position::TopRight);
    assert!(config.notification.dismissible);
    assert!(config.notification.icon);

    // Behavior defaults
    assert_eq!(config.behavior.idle_poll_ms, 50);
    assert_eq!(config.behavior.scroll_page_size, 10);
}

#[test]
fn test_overlay_config_exit_delay() {
    let overlay = OverlayConfig::default();
    assert_eq!(overlay.exit_delay(), Duration::from_millis(300));
}

#[test]
fn test_notification_config_durations() {
    let notification = NotificationConfig::default();
    assert_eq!(notification.duration(), Duration::from_millis(3000));
    assert_eq!(notification.exit_delay(), Duration::from_millis(300));
    assert_eq!(notification.max_visible, 5);
}

#[test]
fn test_behavior_config_default() {
    let behavior = BehaviorConfig::default();
    assert_eq!(behavior.idle_poll_ms, 50);
    assert_eq!(behavior.scroll_page_size, 10);
}

#[test]
fn test_theme_to_color() {
    let theme = ThemeConfig::default();
    assert_eq!(
        ThemeConfig::to_color(&theme.info),
        ratatui::style::Color::Rgb(0, 255, 255)
    );
}

#[test]
fn test_config_parse_partial_toml() {
    let toml_str = r#"
[notification]
duration_ms = 5000
position = "bottom-center"

[overlay]
size = "lg"
"#;

    let config: Config = toml::from_str(toml_str).unwrap();

    // Overridden values
    assert_eq!(config.notification.duration_ms, 5000);
    assert_eq!(config.notification.position, Position::BottomCenter);
    assert_eq!(config.overlay.size, OverlaySize::Lg);

    // Defaults for unspecified values
    assert!(config.notification.dismissible);
    assert_eq!(config.overlay.exit_delay_ms, 300);
    assert_eq!(config.behavior.idle_poll_ms, 50);
}

#[test]
fn test_config_parse_empty_toml() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config.notification.duration_ms, 3000);
    assert_eq!(config.overlay.size, OverlaySize::Md);
}

#[test]
fn test_config_rejects_unknown_position() {
    let toml_str = r#"
[notification]
position = "upside-down"
"#;
    assert!(toml::from_str::<Config>(toml_str).is_err());
}

#[test]
fn test_config_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.notification.position = Position::MiddleLeft;
    config.overlay.exit_delay_ms = 150;
    config.theme.info = [1, 2, 3];

    config.save_to_path(&config_path).unwrap();
    assert!(config_path.exists());

    let loaded = Config::load_from_path(&config_path).unwrap();
    assert_eq!(loaded.notification.position, Position::MiddleLeft);
    assert_eq!(loaded.overlay.exit_delay_ms, 150);
    assert_eq!(loaded.theme.info, [1, 2, 3]);
}

#[test]
fn test_config_load_invalid_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "this is not [valid toml").unwrap();

    assert!(Config::load_from_path(&config_path).is_err());
}

#[test]
fn test_config_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    assert!(Config::load_from_path(temp_dir.path().join("missing.toml")).is_err());
}

#[test]
fn test_default_path_ends_with_expected_components() {
    if let Some(path) = Config::default_path() {
        assert!(path.ends_with("overlay-kit/config.toml"));
    }
}
