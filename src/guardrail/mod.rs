//! Guardrail validation chains.
//!
//! Two independent ordered chains run per turn: input guardrails before the
//! agent call, output guardrails after. A guardrail either passes content
//! through (possibly transformed) or rejects it; the first rejection
//! short-circuits the chain and aborts the whole run.

use std::sync::Arc;

use crate::error::{GuardrailError, GuardrailStage};

/// Reason a guardrail rejected content.
#[derive(Debug, Clone)]
pub struct GuardrailViolation {
    pub reason: String,
}

impl GuardrailViolation {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A content validator.
pub trait Guardrail: Send + Sync {
    /// Name used when classifying a rejection.
    fn name(&self) -> &str;

    /// Validate content, returning the (possibly transformed) content or a
    /// violation.
    fn validate(&self, content: &str) -> Result<String, GuardrailViolation>;
}

/// Type alias for a closure guardrail body.
type GuardFn = dyn Fn(&str) -> Result<String, GuardrailViolation> + Send + Sync;

/// Closure-based guardrail for quick registration.
pub struct FnGuardrail {
    name: String,
    check: Arc<GuardFn>,
}

impl FnGuardrail {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str) -> Result<String, GuardrailViolation> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }
}

impl Guardrail for FnGuardrail {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, content: &str) -> Result<String, GuardrailViolation> {
        (self.check)(content)
    }
}

impl std::fmt::Debug for FnGuardrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnGuardrail").field("name", &self.name).finish()
    }
}

/// Apply a chain in registration order.
///
/// The first violation is classified with its stage and guard name; the
/// remaining validators in the chain do not run.
pub fn run_chain(
    stage: GuardrailStage,
    guards: &[Arc<dyn Guardrail>],
    content: String,
) -> Result<String, GuardrailError> {
    let mut current = content;
    for guard in guards {
        match guard.validate(&current) {
            Ok(next) => current = next,
            Err(violation) => {
                return Err(GuardrailError {
                    stage,
                    guard: guard.name().to_string(),
                    reason: violation.reason,
                });
            }
        }
    }
    Ok(current)
}
