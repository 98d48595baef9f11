//! Prompt requests raised while starting monitoring.
//!
//! The service never renders anything. When monitoring is blocked it asks
//! its [`PermissionPromptHost`] for a surface and names the prompt kind;
//! wording, layout, and buttons belong entirely to the host.

use std::sync::Arc;

/// The prompt kinds the service can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionPrompt {
    /// The user denied location access. Hosts typically offer a way into
    /// the system settings next to a plain dismissal.
    Denied,
    /// Location access is blocked by device policy. Informational; a
    /// single acknowledgement is the only choice.
    Restricted,
}

/// How the user resolved a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOutcome {
    /// The prompt was dismissed or acknowledged without further action.
    Dismissed,
    /// The user asked to be taken to the system settings.
    OpenSettings,
}

/// One-shot callback through which a surface reports the user's choice.
pub type PromptResponder = Box<dyn FnOnce(PromptOutcome) + Send>;

/// A place a prompt can be presented: a window, a view controller, the
/// top-most route of a navigation stack.
pub trait PromptSurface: Send + Sync {
    /// Present `prompt` and hand the user's choice to `responder`.
    ///
    /// The responder must be invoked at most once.
    fn present(&self, prompt: PermissionPrompt, responder: PromptResponder);
}

/// Supplies presentation surfaces to the service on demand.
pub trait PermissionPromptHost: Send + Sync {
    /// A surface to present the next prompt on, or `None` when nothing can
    /// be presented right now, in which case the prompt is skipped.
    fn presentation_surface(&self) -> Option<Arc<dyn PromptSurface>>;

    /// Route the user to the system's location settings page.
    ///
    /// Called when a prompt resolves to [`PromptOutcome::OpenSettings`].
    /// Hosts on platforms without a settings deep link can keep the
    /// default no-op.
    fn open_settings(&self) {}
}
