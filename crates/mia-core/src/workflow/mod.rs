//! Sequential workflow runner.
//!
//! A [`Workflow`] owns an ordered list of module instances and runs them one
//! at a time against a single [`Workspace`]. It is the smallest host loop
//! that honours every [`Status`] a module can return.

use tracing::{error, info, warn};

use crate::error::WorkflowError;
use crate::module::{CancellationToken, Module, Status};
use crate::workspace::Workspace;

/// How a workflow run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every module ran and passed.
    Completed,
    /// A module returned [`Status::Fail`].
    Failed {
        /// Nickname of the failing module.
        module: String,
    },
    /// A module returned [`Status::Terminate`].
    Terminated {
        /// Nickname of the terminating module.
        module: String,
    },
    /// The cancellation token was triggered.
    Cancelled,
}

/// An ordered list of modules sharing a cancellation token.
#[derive(Debug, Default)]
pub struct Workflow {
    modules: Vec<Box<dyn Module>>,
    cancellation: CancellationToken,
}

impl Workflow {
    /// Creates an empty workflow.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a module and attaches it to the workflow's cancellation
    /// token.
    pub fn add(&mut self, mut module: Box<dyn Module>) {
        module.base_mut().set_cancellation(self.cancellation.clone());
        self.modules.push(module);
    }

    /// Returns the modules in execution order.
    #[must_use]
    pub fn modules(&self) -> &[Box<dyn Module>] {
        &self.modules
    }

    /// Finds a module by nickname.
    pub fn module_mut(&mut self, nickname: &str) -> Option<&mut (dyn Module + 'static)> {
        self.modules
            .iter_mut()
            .find(|m| m.nickname() == nickname)
            .map(|m| &mut **m)
    }

    /// Returns the token that cancels this workflow's runs.
    #[must_use]
    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Checks every enabled module.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Verification`] naming the first module whose
    /// `verify` fails.
    pub fn verify(&self) -> Result<(), WorkflowError> {
        self.modules
            .iter()
            .filter(|m| m.base().is_enabled())
            .find(|m| !m.verify())
            .map_or(Ok(()), |module| {
                Err(WorkflowError::Verification {
                    module: module.nickname().to_owned(),
                })
            })
    }

    /// Runs the workflow against `workspace`.
    ///
    /// Disabled modules are skipped. Cancellation is checked before each
    /// module.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Verification`] before anything runs if a
    /// module fails verification, [`WorkflowError::Module`] if a module
    /// raises a programming error, and [`WorkflowError::RedirectTarget`] if
    /// a redirect names no module in this workflow.
    pub fn run(&mut self, workspace: &mut Workspace) -> Result<RunOutcome, WorkflowError> {
        self.verify()?;
        let mut index = 0;
        while let Some(module) = self.modules.get_mut(index) {
            if self.cancellation.is_cancelled() {
                warn!(target: "mia::workflow", workspace = workspace.id(), "run cancelled");
                return Ok(RunOutcome::Cancelled);
            }
            if !module.base().is_enabled() {
                index += 1;
                continue;
            }
            let nickname = module.nickname().to_owned();
            info!(target: "mia::workflow", module = %nickname, "processing");
            let status = module.process(workspace).map_err(|source| {
                error!(target: "mia::workflow", module = %nickname, error = %source, "module aborted");
                WorkflowError::Module {
                    module: nickname.clone(),
                    source,
                }
            })?;
            match status {
                Status::Pass => index += 1,
                Status::Fail => {
                    warn!(target: "mia::workflow", module = %nickname, "module failed");
                    return Ok(RunOutcome::Failed { module: nickname });
                }
                Status::Terminate => {
                    info!(target: "mia::workflow", module = %nickname, "workflow terminated");
                    return Ok(RunOutcome::Terminated { module: nickname });
                }
                Status::Redirect(target) => {
                    index = self
                        .position(&target)
                        .ok_or_else(|| WorkflowError::RedirectTarget {
                            target: target.clone(),
                        })?;
                    info!(target: "mia::workflow", module = %nickname, redirect = %target, "redirecting");
                }
            }
        }
        info!(target: "mia::workflow", workspace = workspace.id(), "workflow complete");
        Ok(RunOutcome::Completed)
    }

    /// Lists the measurement names that modules declare for the collection
    /// `objects_name`, in workflow order without duplicates.
    ///
    /// A module returning `None` and a module returning an empty list are
    /// treated alike.
    pub fn available_object_measurements(&mut self, objects_name: &str) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for module in &mut self.modules {
            let declared = module
                .update_and_get_object_measurement_refs()
                .unwrap_or_default();
            for reference in declared {
                if reference.objects_name() == objects_name
                    && !names.iter().any(|n| n == reference.name())
                {
                    names.push(reference.name().to_owned());
                }
            }
        }
        names
    }

    fn position(&self, nickname: &str) -> Option<usize> {
        self.modules.iter().position(|m| m.nickname() == nickname)
    }
}

#[cfg(test)]
mod tests;
