use confset_model::{AttrPath, Diagnostic, DiagnosticKind};
use thiserror::Error;

/// Failure raised while building set lines from a resolved tree.
///
/// Every variant carries the path of the offending field or block. A build
/// error on resolved state means the validator let an invariant through; it
/// is surfaced as a normal located error, never a panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("{path}: entry `{tuple}` appears more than once")]
    Duplicate { path: AttrPath, tuple: String },
    #[error("{path}: block is empty")]
    EmptyBlock { path: AttrPath },
    #[error("{path}: requires `{companion}` to be set")]
    MissingCompanion { path: AttrPath, companion: String },
    #[error("{path}: identity value is missing")]
    MissingIdentity { path: AttrPath },
    #[error("{path}: cannot be combined with `{other}`")]
    Conflict { path: AttrPath, other: String },
    #[error("{path}: only valid while `{discriminator}` is `{expected}`")]
    VariantGate {
        path: AttrPath,
        discriminator: String,
        expected: String,
    },
    #[error("{path}: value is unresolved")]
    Unresolved { path: AttrPath },
    #[error("{path}: expected a {expected} value")]
    TypeMismatch {
        path: AttrPath,
        expected: &'static str,
    },
}

impl BuildError {
    /// Location of the offending field or block.
    pub fn path(&self) -> &AttrPath {
        match self {
            BuildError::Duplicate { path, .. }
            | BuildError::EmptyBlock { path }
            | BuildError::MissingCompanion { path, .. }
            | BuildError::MissingIdentity { path }
            | BuildError::Conflict { path, .. }
            | BuildError::VariantGate { path, .. }
            | BuildError::Unresolved { path }
            | BuildError::TypeMismatch { path, .. } => path,
        }
    }

    /// Taxonomy bucket shared with validation diagnostics.
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            BuildError::Duplicate { .. } => DiagnosticKind::Duplicate,
            BuildError::EmptyBlock { .. } => DiagnosticKind::EmptyBlock,
            BuildError::MissingCompanion { .. } | BuildError::MissingIdentity { .. } => {
                DiagnosticKind::Missing
            }
            BuildError::Conflict { .. } => DiagnosticKind::Conflict,
            BuildError::VariantGate { .. } => DiagnosticKind::VariantGate,
            BuildError::Unresolved { .. } | BuildError::TypeMismatch { .. } => {
                DiagnosticKind::Invalid
            }
        }
    }

    /// Convert into the diagnostics taxonomy used by validation.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.kind(), self.path().clone(), self.to_string())
    }
}

/// Fatal failure while parsing a configuration dump.
///
/// A read error aborts the whole read; no partial tree is reported as
/// complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("`{keyword}`: invalid numeric value `{token}`")]
    InvalidNumber {
        keyword: String,
        token: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("`{keyword}`: line carries no value")]
    MissingValue { keyword: String },
    #[error("`{keyword}`: line is missing identity tokens")]
    TruncatedEntry { keyword: String },
}
