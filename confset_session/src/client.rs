use confset_engine::{BuildError, Envelope, ReadError, build, read_with_envelope, validate};
use confset_model::{
    AttrPath, ConfigNode, Diagnostic, DiagnosticKind, Diagnostics, ResourceSchema,
};
use thiserror::Error;

use crate::{Session, SessionError};

/// Failure from a lifecycle operation.
///
/// Pre-check and post-check failures are distinct diagnostic categories:
/// they indicate divergence between intended and observed device state, not
/// a malformed configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("configuration is invalid")]
    Invalid { diagnostics: Vec<Diagnostic> },
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("{0}")]
    Check(Diagnostic),
    #[error("{0}")]
    NotFound(Diagnostic),
}

/// Lifecycle orchestration for one resource schema over a [`Session`].
///
/// Each operation runs to completion on the calling thread; the client holds
/// no state beyond its borrows, so independent resources can use independent
/// clients without aliasing.
pub struct ResourceClient<'a, S: Session> {
    session: &'a mut S,
    schema: &'a ResourceSchema,
    envelope: Envelope,
}

impl<'a, S: Session> ResourceClient<'a, S> {
    pub fn new(session: &'a mut S, schema: &'a ResourceSchema) -> Self {
        Self {
            session,
            schema,
            envelope: Envelope::relative(),
        }
    }

    /// Override the dump envelope, for transports that frame differently.
    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = envelope;
        self
    }

    /// Whether the resource currently exists on the device.
    pub fn exists(&mut self, name: &str) -> Result<bool, SessionError> {
        let raw = self.session.command(&self.schema.show_command(name))?;
        Ok(has_interior_lines(&raw, &self.envelope))
    }

    /// Validate, pre-check, apply, post-check.
    pub fn create(&mut self, name: &str, node: &ConfigNode) -> Result<(), ApplyError> {
        self.ensure_valid(node)?;

        if self.exists(name)? {
            return Err(ApplyError::Check(Diagnostic::error(
                DiagnosticKind::PreCheck,
                AttrPath::root(),
                format!(
                    "{} `{name}` already exists on the device",
                    self.schema.type_name
                ),
            )));
        }

        let lines = build(self.schema, name, node)?;
        tracing::info!(
            target: "confset::session",
            resource = self.schema.type_name,
            name,
            lines = lines.len(),
            "applying configuration"
        );
        self.session.config_set(&lines)?;

        if !self.exists(name)? {
            return Err(ApplyError::Check(Diagnostic::error(
                DiagnosticKind::PostCheck,
                AttrPath::root(),
                format!(
                    "{} `{name}` not found on the device after commit",
                    self.schema.type_name
                ),
            )));
        }
        Ok(())
    }

    /// Query the device and parse the resource into a fresh tree.
    pub fn read(&mut self, name: &str) -> Result<ConfigNode, ApplyError> {
        let raw = self.session.command(&self.schema.show_command(name))?;
        if !has_interior_lines(&raw, &self.envelope) {
            return Err(ApplyError::NotFound(Diagnostic::error(
                DiagnosticKind::NotFound,
                AttrPath::root(),
                format!("{} `{name}` not found on the device", self.schema.type_name),
            )));
        }

        let mut node = ConfigNode::new();
        read_with_envelope(self.schema, &raw, &self.envelope, &mut node)?;
        Ok(node)
    }

    /// Validate, then replace the resource in one delete-and-set batch.
    pub fn update(&mut self, name: &str, node: &ConfigNode) -> Result<(), ApplyError> {
        self.ensure_valid(node)?;

        let mut lines = vec![self.schema.delete_line(name)];
        lines.extend(build(self.schema, name, node)?);
        tracing::info!(
            target: "confset::session",
            resource = self.schema.type_name,
            name,
            lines = lines.len(),
            "replacing configuration"
        );
        self.session.config_set(&lines)?;

        if !self.exists(name)? {
            return Err(ApplyError::Check(Diagnostic::error(
                DiagnosticKind::PostCheck,
                AttrPath::root(),
                format!(
                    "{} `{name}` not found on the device after commit",
                    self.schema.type_name
                ),
            )));
        }
        Ok(())
    }

    /// Remove the resource and post-check its absence.
    pub fn delete(&mut self, name: &str) -> Result<(), ApplyError> {
        self.session
            .config_set(std::slice::from_ref(&self.schema.delete_line(name)))?;

        if self.exists(name)? {
            return Err(ApplyError::Check(Diagnostic::error(
                DiagnosticKind::PostCheck,
                AttrPath::root(),
                format!(
                    "{} `{name}` still present on the device after delete",
                    self.schema.type_name
                ),
            )));
        }
        Ok(())
    }

    fn ensure_valid(&self, node: &ConfigNode) -> Result<(), ApplyError> {
        let mut diags = Diagnostics::new();
        validate(self.schema, node, &mut diags);
        if diags.has_errors() {
            return Err(ApplyError::Invalid {
                diagnostics: diags.into_inner(),
            });
        }
        Ok(())
    }
}

fn has_interior_lines(raw: &str, envelope: &Envelope) -> bool {
    let mut started = !raw
        .lines()
        .any(|line| line.trim() == envelope.start.as_str());

    for line in raw.lines() {
        let line = line.trim_end_matches('\r');
        if !started {
            if line.trim() == envelope.start.as_str() {
                started = true;
            }
            continue;
        }
        if line.trim() == envelope.end.as_str() {
            break;
        }
        if line.starts_with(envelope.line_prefix.as_str()) {
            return true;
        }
    }
    false
}
