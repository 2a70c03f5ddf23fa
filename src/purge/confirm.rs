use super::PurgeError;

/// Asks the operator whether a purge should go ahead.
pub trait Confirmer: Send + Sync {
    /// Returns `Ok(false)` when the operator declines.
    fn confirm(&self, prompt: &str) -> Result<bool, PurgeError>;
}

/// Answers yes without asking (`--yes`, or confirmation disabled in config).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirmer for AssumeYes {
    fn confirm(&self, prompt: &str) -> Result<bool, PurgeError> {
        tracing::debug!(prompt, "Confirmation skipped");
        Ok(true)
    }
}

/// Interactive yes/no prompt on the controlling terminal. Defaults to no.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirmer;

#[cfg(feature = "cli")]
impl Confirmer for TerminalConfirmer {
    fn confirm(&self, prompt: &str) -> Result<bool, PurgeError> {
        let theme = dialoguer::theme::ColorfulTheme::default();
        dialoguer::Confirm::with_theme(&theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| PurgeError::Prompt(e.to_string()))
    }
}
