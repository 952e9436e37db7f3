use std::io::Cursor;
use std::time::Duration;

use image::RgbaImage;
use pretty_assertions::assert_eq;
use qrstudio::core::app::{App, ContentField, ControlEvent};
use qrstudio::core::config::AppConfig;
use qrstudio::core::models::{Notification, NotificationKind, QrKind};
use qrstudio::render::orchestrator::UiEvent;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

const SETTLE: Duration = Duration::from_secs(5);

fn config_with_output(dir: &TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.output.directory = Some(dir.path().to_path_buf());
    config
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, image::Rgba([50, 100, 150, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .unwrap();
    bytes
}

/// Collects UI events until the next completed render.
async fn wait_rendered(ui: &mut UnboundedReceiver<UiEvent>) -> (Vec<UiEvent>, (u32, u32)) {
    let mut seen = Vec::new();
    loop {
        let event = tokio::time::timeout(SETTLE, ui.recv())
            .await
            .expect("timed out waiting for a render")
            .expect("UI stream closed");
        match event {
            UiEvent::Rendered { primary, secondary } => return (seen, (primary, secondary)),
            other => seen.push(other),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_initial_render_uses_config_defaults() {
    let mut app = App::new(AppConfig::default());
    let mut ui = app.ui_events();

    let (_, sizes) = wait_rendered(&mut ui).await;
    assert_eq!(sizes, (200, 180));

    app.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_debounce_coalesces_rapid_mutations() {
    let mut app = App::new(AppConfig::default());
    let mut ui = app.ui_events();
    wait_rendered(&mut ui).await;

    // Five mutations in the same tick: one render, final state only.
    app.apply(ControlEvent::SelectKind(QrKind::Text));
    app.apply(ControlEvent::Edit(ContentField::Text, "draft".to_string()));
    app.apply(ControlEvent::Edit(ContentField::Text, "final".to_string()));
    app.apply(ControlEvent::SelectSize(250));
    app.apply(ControlEvent::SelectSize(300));

    let (_, sizes) = wait_rendered(&mut ui).await;
    assert_eq!(sizes, (300, 180));
    assert_eq!(app.state().snapshot().text, "final");

    // The window produced exactly one render.
    assert!(app.settle(&mut ui, Duration::from_secs(1)).await.is_none());

    app.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_mutations_inside_window_restart_the_timer() {
    let mut app = App::new(AppConfig::default());
    let mut ui = app.ui_events();
    wait_rendered(&mut ui).await;

    // Each write lands 50ms after the previous one, always inside the
    // 150ms window: still a single render.
    app.apply(ControlEvent::SelectSize(150));
    tokio::time::sleep(Duration::from_millis(50)).await;
    app.apply(ControlEvent::SelectSize(250));
    tokio::time::sleep(Duration::from_millis(50)).await;
    app.apply(ControlEvent::SelectSize(300));

    let (_, sizes) = wait_rendered(&mut ui).await;
    assert_eq!(sizes, (300, 180));
    assert!(app.settle(&mut ui, Duration::from_secs(1)).await.is_none());

    app.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_color_preset_applies_both_colors_in_one_render() {
    let mut app = App::new(AppConfig::default());
    let mut ui = app.ui_events();
    wait_rendered(&mut ui).await;

    app.apply(ControlEvent::ApplyPreset {
        foreground: "#1E3A8A".parse().unwrap(),
        background: "#F0F9FF".parse().unwrap(),
    });

    let (_, sizes) = wait_rendered(&mut ui).await;
    assert_eq!(sizes, (200, 180));
    assert!(app.settle(&mut ui, Duration::from_secs(1)).await.is_none());

    let state = app.state().snapshot();
    assert_eq!(state.color_fg, "#1E3A8A".parse().unwrap());
    assert_eq!(state.color_bg, "#F0F9FF".parse().unwrap());

    app.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_equal_writes_do_not_render() {
    let mut app = App::new(AppConfig::default());
    let mut ui = app.ui_events();
    wait_rendered(&mut ui).await;

    // Defaults re-applied verbatim: no change events, no render.
    app.apply(ControlEvent::SelectKind(QrKind::Url));
    app.apply(ControlEvent::SelectSize(200));
    app.apply(ControlEvent::Edit(
        ContentField::Url,
        "https://example.com".to_string(),
    ));

    assert!(app.settle(&mut ui, Duration::from_secs(1)).await.is_none());

    app.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_oversized_upload_rejected_without_render() {
    let mut app = App::new(AppConfig::default());
    let mut ui = app.ui_events();
    wait_rendered(&mut ui).await;

    app.apply(ControlEvent::UploadLogo(vec![0u8; 3 * 1024 * 1024]));

    let event = tokio::time::timeout(SETTLE, ui.recv()).await.unwrap().unwrap();
    assert_eq!(
        event,
        UiEvent::Toast(Notification::error("File too large (max 2MB)"))
    );

    // State untouched, no render triggered.
    assert!(app.state().snapshot().logo_image.is_none());
    assert!(app.settle(&mut ui, Duration::from_secs(1)).await.is_none());

    app.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_logo_upload_renders_and_warns_past_safe_zone() {
    let mut app = App::new(AppConfig::default());
    let mut ui = app.ui_events();
    wait_rendered(&mut ui).await;

    app.apply(ControlEvent::UploadLogo(png_bytes(32, 32)));
    let (events, _) = wait_rendered(&mut ui).await;
    assert!(events.contains(&UiEvent::Toast(Notification::success("Logo added!"))));
    assert!(app.state().snapshot().logo_image.is_some());

    // Default 25% stays safe.
    assert!(events.iter().any(|e| matches!(
        e,
        UiEvent::Status(status) if !status.is_unsafe
    )));

    // Pushing past the safe zone renders anyway and flips the status.
    app.apply(ControlEvent::SetLogoSize(40));
    let (events, _) = wait_rendered(&mut ui).await;
    let warning = events
        .iter()
        .find_map(|e| match e {
            UiEvent::Status(status) if status.is_unsafe => status.message.clone(),
            _ => None,
        })
        .expect("expected an unsafe status");
    assert_eq!(
        warning,
        "Logo size 40% exceeds safe zone (25%). QR may not scan reliably."
    );

    app.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_removing_logo_returns_to_ready() {
    let mut app = App::new(AppConfig::default());
    let mut ui = app.ui_events();
    wait_rendered(&mut ui).await;

    app.apply(ControlEvent::UploadLogo(png_bytes(16, 16)));
    app.apply(ControlEvent::SetLogoSize(60));
    let (events, _) = wait_rendered(&mut ui).await;
    assert!(events.iter().any(|e| matches!(
        e,
        UiEvent::Status(status) if status.is_unsafe
    )));

    app.apply(ControlEvent::RemoveLogo);
    let (events, _) = wait_rendered(&mut ui).await;
    // Oversized slider without a logo is safe again.
    assert!(events.iter().any(|e| matches!(
        e,
        UiEvent::Status(status) if !status.is_unsafe
    )));

    app.shutdown().await;
}

#[tokio::test]
async fn test_download_before_any_render_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let app = App::new(config_with_output(&dir));

    // The render task has not been polled yet on this current-thread
    // runtime, so no raster exists.
    assert!(app.actions().download().unwrap().is_none());
    assert!(!app.actions().copy().unwrap());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    app.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_download_writes_decodable_png() {
    let dir = TempDir::new().unwrap();
    let mut app = App::new(config_with_output(&dir));
    let mut ui = app.ui_events();

    app.apply(ControlEvent::SelectSize(250));
    wait_rendered(&mut ui).await;
    wait_rendered(&mut ui).await;

    let path = app.actions().download().unwrap().expect("raster rendered");
    let decoded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (250, 250));

    let toast = tokio::time::timeout(SETTLE, ui.recv()).await.unwrap().unwrap();
    assert!(matches!(
        toast,
        UiEvent::Toast(Notification {
            kind: NotificationKind::Success,
            ..
        })
    ));

    app.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_session_restating_defaults_finishes_without_extra_wait() {
    let dir = TempDir::new().unwrap();
    let app = App::new(config_with_output(&dir));

    // Flags that match the configured defaults fire no change events; the
    // session must not sit out a render wait that will never be satisfied.
    let events = vec![
        ControlEvent::SelectKind(QrKind::Url),
        ControlEvent::SelectSize(200),
        ControlEvent::Edit(ContentField::Url, "https://example.com".to_string()),
    ];

    let start = tokio::time::Instant::now();
    let saved = app.run_session(events, true, false).await.unwrap();
    assert!(saved.is_some());
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_wifi_session_end_to_end() {
    let dir = TempDir::new().unwrap();
    let app = App::new(config_with_output(&dir));

    let events = vec![
        ControlEvent::SelectKind(QrKind::Wifi),
        ControlEvent::Edit(ContentField::Ssid, "Net1".to_string()),
        ControlEvent::Edit(ContentField::WifiPass, "pw".to_string()),
        ControlEvent::SelectWifiSecurity(qrstudio::WifiSecurity::Wep),
    ];

    let saved = app.run_session(events, true, false).await.unwrap();
    let path = saved.expect("session saved a file");
    assert!(path.starts_with(dir.path()));

    let decoded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (200, 200));
}
