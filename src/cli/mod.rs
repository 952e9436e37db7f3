use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use crate::core::app::{App, ContentField, ControlEvent};
use crate::core::config::AppConfig;
use crate::core::models::{Color, QrKind, WifiSecurity, SIZE_PRESETS};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Payload kind (url, text, email, phone, sms, wifi)
    #[arg(short, long)]
    kind: Option<QrKind>,

    /// URL payload
    #[arg(long)]
    url: Option<String>,

    /// Plain text payload
    #[arg(long)]
    text: Option<String>,

    /// Email recipient
    #[arg(long)]
    email: Option<String>,

    /// Email subject line
    #[arg(long)]
    subject: Option<String>,

    /// Email body
    #[arg(long)]
    body: Option<String>,

    /// Phone number for tel: payloads
    #[arg(long)]
    phone: Option<String>,

    /// SMS recipient number
    #[arg(long)]
    sms_to: Option<String>,

    /// SMS message text
    #[arg(long)]
    sms_message: Option<String>,

    /// Wi-Fi network name
    #[arg(long)]
    ssid: Option<String>,

    /// Wi-Fi password
    #[arg(long)]
    wifi_pass: Option<String>,

    /// Wi-Fi security (WPA, WEP, nopass)
    #[arg(long)]
    wifi_security: Option<WifiSecurity>,

    /// QR edge length in pixels (one of the preset sizes)
    #[arg(short, long)]
    size: Option<u32>,

    /// Foreground color as #RRGGBB
    #[arg(long)]
    foreground: Option<Color>,

    /// Background color as #RRGGBB
    #[arg(long)]
    background: Option<Color>,

    /// Logo image file to overlay
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Logo size as percent of the QR edge (0-100)
    #[arg(long)]
    logo_size: Option<u8>,

    /// Directory to save the image into
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Copy the image to the clipboard instead of saving it
    #[arg(short, long)]
    copy: bool,

    /// Generate example configuration file
    #[arg(long)]
    generate_config: bool,
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        // Generate config file if requested
        if self.generate_config {
            AppConfig::save_example()?;
            println!("Generated example configuration file: qrstudio.example.toml");
            return Ok(());
        }

        // Load configuration
        let mut config = AppConfig::load().unwrap_or_else(|e| {
            info!("Using default configuration ({})", e);
            AppConfig::default()
        });

        // Override config with CLI arguments
        if let Some(ref output) = self.output {
            config.output.directory = Some(output.clone());
        }

        let events = self.control_events()?;
        let app = App::new(config);
        let saved = app.run_session(events, !self.copy, self.copy).await?;
        if let Some(path) = saved {
            println!("Saved {}", path.display());
        }
        Ok(())
    }

    /// Translates the flags into the same control events an interactive
    /// front end would emit.
    fn control_events(&self) -> Result<Vec<ControlEvent>> {
        let mut events = Vec::new();

        if let Some(kind) = self.kind {
            events.push(ControlEvent::SelectKind(kind));
        }
        if let Some(size) = self.size {
            anyhow::ensure!(
                SIZE_PRESETS.contains(&size),
                "size must be one of {:?}",
                SIZE_PRESETS
            );
            events.push(ControlEvent::SelectSize(size));
        }
        if let Some(color) = self.foreground {
            events.push(ControlEvent::PickForeground(color));
        }
        if let Some(color) = self.background {
            events.push(ControlEvent::PickBackground(color));
        }

        let edits: [(ContentField, &Option<String>); 10] = [
            (ContentField::Url, &self.url),
            (ContentField::Text, &self.text),
            (ContentField::Email, &self.email),
            (ContentField::EmailSubject, &self.subject),
            (ContentField::EmailBody, &self.body),
            (ContentField::Phone, &self.phone),
            (ContentField::SmsPhone, &self.sms_to),
            (ContentField::SmsMsg, &self.sms_message),
            (ContentField::Ssid, &self.ssid),
            (ContentField::WifiPass, &self.wifi_pass),
        ];
        for (field, value) in edits {
            if let Some(value) = value {
                events.push(ControlEvent::Edit(field, value.clone()));
            }
        }

        if let Some(security) = self.wifi_security {
            events.push(ControlEvent::SelectWifiSecurity(security));
        }
        if let Some(ref path) = self.logo {
            let bytes = std::fs::read(path)
                .with_context(|| format!("reading logo file {}", path.display()))?;
            events.push(ControlEvent::UploadLogo(bytes));
        }
        if let Some(percent) = self.logo_size {
            anyhow::ensure!(percent <= 100, "logo size must be 0-100");
            events.push(ControlEvent::SetLogoSize(percent));
        }

        Ok(events)
    }
}
