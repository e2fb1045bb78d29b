use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use scholar_core::config::SoundConfig;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::NotifyError;

/// Capability invoked once per fired reminder to alert the user.
///
/// Implementations must be `Send + Sync` so the engine can hold one behind an
/// `Arc` and call it from its background task. Errors are reported back to
/// the engine, which logs them and carries on; they never stop the loop.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Stable lowercase identifier used in log lines.
    fn name(&self) -> &str;

    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError>;
}

/// Plays the platform chime configured in [`SoundConfig`].
pub struct SoundNotifier {
    config: SoundConfig,
}

impl SoundNotifier {
    pub fn new(config: SoundConfig) -> Self {
        Self { config }
    }

    /// Program and arguments for the current target, if the platform has a chime.
    fn command(&self) -> Option<(&'static str, Vec<String>)> {
        if cfg!(target_os = "windows") {
            Some((
                "powershell",
                vec![
                    "-NoProfile".to_string(),
                    "-Command".to_string(),
                    self.config.windows.clone(),
                ],
            ))
        } else if cfg!(target_os = "macos") {
            Some(("sh", vec!["-c".to_string(), self.config.macos.clone()]))
        } else if cfg!(target_os = "linux") {
            Some(("sh", vec!["-c".to_string(), self.config.linux.clone()]))
        } else {
            None
        }
    }
}

#[async_trait]
impl Notifier for SoundNotifier {
    fn name(&self) -> &str {
        "sound"
    }

    async fn notify(&self, _title: &str, _message: &str) -> Result<(), NotifyError> {
        if !self.config.enabled {
            return Ok(());
        }
        let (program, args) = self
            .command()
            .ok_or_else(|| NotifyError::Unsupported(std::env::consts::OS.to_string()))?;

        let status = Command::new(program)
            .args(&args)
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| NotifyError::Command(format!("{program}: {e}")))?;

        if status.success() {
            Ok(())
        } else {
            Err(NotifyError::Command(format!("{program} exited with {status}")))
        }
    }
}

/// Shows the reminder as a banner on standard output.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn name(&self) -> &str {
        "console"
    }

    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        let mut out = std::io::stdout().lock();
        let banner = if message.is_empty() {
            format!("\n*** Reminder: {title} ***\n")
        } else {
            format!("\n*** Reminder: {title} ***\n{message}\n")
        };
        out.write_all(banner.as_bytes())
            .and_then(|_| out.flush())
            .map_err(|e| NotifyError::Command(format!("stdout: {e}")))
    }
}

/// Sound followed by the message. A failed or stalled chime is logged and the
/// message is still shown; only a display failure is reported.
pub struct DesktopNotifier {
    sound: Option<Box<dyn Notifier>>,
    display: ConsoleNotifier,
}

impl DesktopNotifier {
    /// `chime_limit` bounds the sound command only. `None` lets it run to
    /// completion.
    pub fn new(sound: SoundConfig, chime_limit: Option<Duration>) -> Self {
        let sound = sound.enabled.then(|| {
            let chime = SoundNotifier::new(sound);
            match chime_limit {
                Some(limit) => Box::new(TimeoutNotifier::new(chime, limit)) as Box<dyn Notifier>,
                None => Box::new(chime),
            }
        });
        Self {
            sound,
            display: ConsoleNotifier,
        }
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    fn name(&self) -> &str {
        "desktop"
    }

    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        if let Some(sound) = &self.sound {
            if let Err(e) = sound.notify(title, message).await {
                warn!(notifier = sound.name(), code = e.code(), error = %e, "notification sound failed");
            }
        }
        self.display.notify(title, message).await
    }
}

/// Bounds every call to the wrapped notifier.
pub struct TimeoutNotifier<N> {
    inner: N,
    limit: Duration,
}

impl<N: Notifier> TimeoutNotifier<N> {
    pub fn new(inner: N, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

#[async_trait]
impl<N: Notifier> Notifier for TimeoutNotifier<N> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        match tokio::time::timeout(self.limit, self.inner.notify(title, message)).await {
            Ok(result) => result,
            Err(_) => {
                debug!(notifier = self.inner.name(), "notifier call abandoned");
                Err(NotifyError::Timeout {
                    ms: self.limit.as_millis() as u64,
                })
            }
        }
    }
}
