//! Inspection error types and diagnostics.

use thiserror::Error;

use crate::core::descriptor::DescriptorError;
use crate::core::mode::{Mode, Target};
use crate::ops::resolve::ResolverStage;
use crate::util::diagnostic::Diagnostic;

/// Error during an inspection.
///
/// Every variant is fatal for the invocation. Missing paths and values the
/// printer cannot classify are not errors.
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("requested mode `{mode}` is not installed")]
    ModeUnavailable { mode: Mode },

    #[error(transparent)]
    DescriptorEvaluation(#[from] DescriptorError),

    #[error("extension `{id}` failed to register")]
    ExtensionRegistration {
        id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("config hook from extension `{extension}` failed on the {target} config")]
    ConfigHook {
        extension: String,
        target: Target,
        #[source]
        source: anyhow::Error,
    },

    #[error("configuration is not ready: expected {expected}, found {found}")]
    NotReady {
        expected: ResolverStage,
        found: ResolverStage,
    },

    #[error("no bundler configuration attached for mode `{mode}`")]
    ConfigNotReady { mode: Mode },

    #[error("failed to build legacy ssr directives")]
    LegacyDirectives {
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to write inspection output")]
    Output(#[from] std::io::Error),
}

impl InspectError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            InspectError::ModeUnavailable { mode } => Diagnostic::error(format!(
                "requested mode for inspection is NOT installed: `{}`",
                mode
            ))
            .hint(format!("Add the mode with `marina mode add {}`", mode)),

            InspectError::DescriptorEvaluation(err) => {
                Diagnostic::error(format!("{} has errors", err.file))
                    .in_file(err.file.clone())
                    .caused_by(err.reason.clone())
                    .hint("Fix the configuration file and run the command again")
            }

            InspectError::ExtensionRegistration { id, source } => {
                Diagnostic::error(format!("extension `{}` failed to register", id))
                    .caused_by(format!("{:#}", source))
                    .hint(format!(
                        "Check the options for `{}` in marina.extensions.json",
                        id
                    ))
            }

            InspectError::ConfigHook {
                extension,
                target,
                source,
            } => Diagnostic::error(format!(
                "extension `{}` could not extend the {} config",
                extension, target
            ))
            .caused_by(format!("{:#}", source))
            .hint(format!(
                "Check the `chain` paths for `{}` in marina.extensions.json",
                extension
            )),

            InspectError::NotReady { expected, found } => Diagnostic::error(
                "configuration was used before it was ready",
            )
            .caused_by(format!("expected stage: {}", expected))
            .caused_by(format!("found stage: {}", found)),

            InspectError::ConfigNotReady { mode } => Diagnostic::error(format!(
                "no bundler configuration was attached for mode `{}`",
                mode
            ))
            .caused_by("the attach step was skipped or produced no targets"),

            InspectError::LegacyDirectives { source } => {
                let mut diag = Diagnostic::error("failed to build legacy ssr directives")
                    .caused_by(source.to_string());
                if let Some(path) = source.path() {
                    diag = diag.in_file(path);
                }
                diag.hint("Upgrade @marina/app to 3.4.0 or later")
            }

            InspectError::Output(err) => {
                Diagnostic::error(format!("failed to write inspection output: {}", err))
            }
        }
    }
}
