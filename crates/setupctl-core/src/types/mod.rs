//! Shared operation types passed between the orchestrator and its collaborators.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What an operation asks the installer to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Install a package from a path.
    Install,
    /// Apply an update package to an installed product.
    Patch,
    /// Remove an installed product by identifier.
    Uninstall,
}

impl OperationKind {
    /// Installer switch selecting this mode.
    pub fn mode_flag(self) -> &'static str {
        match self {
            OperationKind::Install => "/i",
            OperationKind::Patch => "/update",
            OperationKind::Uninstall => "/x",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Install => "install",
            OperationKind::Patch => "patch",
            OperationKind::Uninstall => "uninstall",
        };
        f.write_str(name)
    }
}

/// A single installer invocation request.
///
/// Built once per call and never mutated by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Operation mode
    pub kind: OperationKind,
    /// Package path or product identifier
    pub target: String,
    /// Arguments appended after the canonical ones, in order
    pub extra_args: Vec<String>,
    /// Return a failed report instead of aborting
    pub allow_continue_on_failure: bool,
}

impl Operation {
    /// Create an install operation for a package path
    pub fn install(target: impl Into<String>) -> Self {
        Self::new(OperationKind::Install, target)
    }

    /// Create a patch operation for an update package path
    pub fn patch(target: impl Into<String>) -> Self {
        Self::new(OperationKind::Patch, target)
    }

    /// Create an uninstall operation for a product identifier
    pub fn uninstall(target: impl Into<String>) -> Self {
        Self::new(OperationKind::Uninstall, target)
    }

    fn new(kind: OperationKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            extra_args: Vec::new(),
            allow_continue_on_failure: false,
        }
    }

    /// Append extra installer arguments
    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set whether a classified failure returns control instead of aborting
    pub fn with_continue_on_failure(mut self, allow: bool) -> Self {
        self.allow_continue_on_failure = allow;
        self
    }
}
