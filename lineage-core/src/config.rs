//! Registry configuration.

/// Options for a [`DispatchRegistry`](crate::DispatchRegistry).
///
/// # Example
///
/// ```rust,ignore
/// let config = RegistryConfig::new()
///     .with_label("hash-strategies")
///     .with_late_registration(false);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Name used in logs and diagnostics.
    pub label: &'static str,
    /// Whether `register` is accepted once bootstrap reached `Ready`.
    pub allow_late_registration: bool,
    /// Whether direct registrations may be removed.
    pub allow_removal: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryConfig {
    /// Default options: late registration allowed, removal disabled.
    pub const fn new() -> Self {
        Self {
            label: "dispatch",
            allow_late_registration: true,
            allow_removal: false,
        }
    }

    /// Set the label.
    pub const fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    /// Allow or forbid registration after bootstrap.
    pub const fn with_late_registration(mut self, allow: bool) -> Self {
        self.allow_late_registration = allow;
        self
    }

    /// Allow or forbid removal of direct registrations.
    pub const fn with_removal(mut self, allow: bool) -> Self {
        self.allow_removal = allow;
        self
    }
}
