//! Terminal implementations of the detail view's media and link ports.

use std::process::{Command, Stdio};

use tracing::{debug, info};

use tphub_core::{
    application::{LinkOpener, MediaElement},
    error::{HubError, HubResult},
};

/// Stands in for a video element. A terminal cannot play video, so the
/// `show` command prints the preview URL once playback starts.
#[derive(Debug, Default)]
pub struct TerminalPlayer {
    playing: bool,
}

impl TerminalPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl MediaElement for TerminalPlayer {
    fn play(&mut self) -> HubResult<()> {
        info!("Preview started");
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        debug!("Preview paused");
        self.playing = false;
    }
}

/// Opens links with the platform's default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserOpener;

impl BrowserOpener {
    fn command(url: &str) -> Command {
        if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            cmd
        } else if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", "", url]);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            cmd
        }
    }
}

impl LinkOpener for BrowserOpener {
    fn open_in_new_context(&self, url: &str) -> HubResult<()> {
        info!(url, "Opening editor link");
        launch(Self::command(url), url)
    }
}

/// Run an opener to completion. `open`, `xdg-open` and `start` hand the
/// URL to the desktop and return, so the wait is short.
fn launch(mut cmd: Command, url: &str) -> HubResult<()> {
    let status = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| HubError::Configuration {
            message: format!("no program available to open '{url}': {e}"),
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(HubError::Configuration {
            message: format!("could not open '{url}': opener exited with {status}"),
        })
    }
}
