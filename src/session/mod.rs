// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The workflow session shell.
//!
//! Owns the [`Editor`] and the collaborators. Save, Run, Deploy and spec fetches run as tokio
//! tasks that may overlap freely. Their results come back through a channel and are applied on
//! the owner's thread by [`WorkflowSession::drain_outcomes`] / [`WorkflowSession::next_outcome`],
//! so the document is only ever touched from one place. Dropping or shutting down the session
//! cancels every task still in flight; late results are never applied.

mod notify;

pub use notify::{ErrorPanel, Notification, NotificationLevel};

use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::collab::{
    CollabError, ContentFetcher, ExecutionReport, FetchError, FetchedContent, SaveReceipt,
    WorkflowDeployer, WorkflowRunner, WorkflowStore,
};
use crate::editor::{Editor, EditorNotice, PanelError, PanelField};
use crate::model::{AttrValue, DetailField, NodeId, WorkflowRecord};

/// Tracing target for session lifecycle actions.
pub const TRACING_TARGET: &str = "flowstudio::session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionAction {
    Save,
    Run,
    Deploy,
    Fetch,
}

impl SessionAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::Run => "run",
            Self::Deploy => "deploy",
            Self::Fetch => "fetch",
        }
    }
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input validation failures for Save. Nothing is sent to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SaveRejected {
    #[error("give the workflow a name before saving")]
    BlankName,
    #[error("add at least one node before saving")]
    EmptyGraph,
}

/// The external collaborators a session delegates to.
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn WorkflowStore>,
    pub runner: Arc<dyn WorkflowRunner>,
    pub deployer: Arc<dyn WorkflowDeployer>,
    pub fetcher: Arc<dyn ContentFetcher>,
}

#[derive(Debug)]
enum TaskOutcome {
    Saved {
        rev: u64,
        result: Result<SaveReceipt, CollabError>,
    },
    Ran(Result<ExecutionReport, CollabError>),
    Deployed(Result<ExecutionReport, CollabError>),
    Fetched {
        node_id: NodeId,
        uri: String,
        result: Result<FetchedContent, FetchError>,
    },
    Panicked {
        action: SessionAction,
        message: String,
    },
}

pub struct WorkflowSession {
    editor: Editor,
    collaborators: Collaborators,
    runtime: Handle,
    cancel: CancellationToken,
    outcome_tx: mpsc::UnboundedSender<TaskOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<TaskOutcome>,
    in_flight: Vec<SessionAction>,
    notifications: VecDeque<Notification>,
    error_panel: Option<ErrorPanel>,
    saved_rev: Option<u64>,
}

impl fmt::Debug for WorkflowSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowSession")
            .field("name", &self.name())
            .field("rev", &self.editor.document().rev())
            .field("in_flight", &self.in_flight)
            .field("saved_rev", &self.saved_rev)
            .finish_non_exhaustive()
    }
}

impl WorkflowSession {
    /// Must be called from within a tokio runtime. The editor's current document counts as
    /// saved.
    pub fn new(editor: Editor, collaborators: Collaborators) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let saved_rev = Some(editor.document().rev());
        Self {
            editor,
            collaborators,
            runtime: Handle::current(),
            cancel: CancellationToken::new(),
            outcome_tx,
            outcome_rx,
            in_flight: Vec::new(),
            notifications: VecDeque::new(),
            error_panel: None,
            saved_rev,
        }
    }

    /// Marks the current document as never saved.
    pub fn with_unsaved_document(mut self) -> Self {
        self.saved_rev = None;
        self
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn name(&self) -> &str {
        &self.editor.document().meta().name
    }

    pub fn description(&self) -> &str {
        &self.editor.document().meta().description
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.editor.document_mut().set_name(name);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.editor.document_mut().set_description(description);
    }

    /// Whether the document changed since the last successful save.
    pub fn is_modified(&self) -> bool {
        self.saved_rev != Some(self.editor.document().rev())
    }

    pub fn in_flight(&self) -> &[SessionAction] {
        &self.in_flight
    }

    pub fn notifications(&self) -> impl Iterator<Item = &Notification> + '_ {
        self.notifications.iter()
    }

    pub fn latest_notification(&self) -> Option<&Notification> {
        self.notifications.back()
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    pub fn notify(&mut self, notification: Notification) {
        const MAX_NOTIFICATIONS: usize = 32;
        if self.notifications.len() == MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
        self.notifications.push_back(notification);
    }

    pub fn error_panel(&self) -> Option<&ErrorPanel> {
        self.error_panel.as_ref()
    }

    /// Dismisses the error panel. The document is left as it was.
    pub fn reset_error_panel(&mut self) {
        self.error_panel = None;
    }

    pub fn validate_save(&self) -> Result<(), SaveRejected> {
        let doc = self.editor.document();
        if doc.meta().name.trim().is_empty() {
            return Err(SaveRejected::BlankName);
        }
        if doc.is_empty() {
            return Err(SaveRejected::EmptyGraph);
        }
        Ok(())
    }

    /// Validates and hands the serialized document to the store. Rejections are also posted as
    /// notifications.
    pub fn save(&mut self) -> Result<(), SaveRejected> {
        if let Err(rejected) = self.validate_save() {
            tracing::info!(target: TRACING_TARGET, reason = %rejected, "save rejected");
            self.notify(Notification::error(rejected.to_string()));
            return Err(rejected);
        }
        let record = self.editor.document().to_record();
        let rev = self.editor.document().rev();
        let store = Arc::clone(&self.collaborators.store);
        self.spawn(
            SessionAction::Save,
            async move { store.save(record).await },
            move |result| TaskOutcome::Saved { rev, result },
        );
        Ok(())
    }

    pub fn run(&mut self) {
        let record = self.editor.document().to_record();
        let runner = Arc::clone(&self.collaborators.runner);
        self.spawn(
            SessionAction::Run,
            async move { runner.run(record).await },
            TaskOutcome::Ran,
        );
    }

    pub fn deploy(&mut self) {
        let record = self.editor.document().to_record();
        let deployer = Arc::clone(&self.collaborators.deployer);
        self.spawn(
            SessionAction::Deploy,
            async move { deployer.deploy(record).await },
            TaskOutcome::Deployed,
        );
    }

    /// Saves the configuration panel draft. A successful save is acknowledged with a
    /// notification; `Ok(false)` means there was nothing to save.
    pub fn save_panel(&mut self) -> Result<bool, PanelError> {
        match self.editor.save_panel() {
            Ok(Some(EditorNotice::PanelSaved { label })) => {
                self.notify(Notification::success(format!("Saved settings for \"{label}\"")));
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(err) => {
                self.notify(Notification::error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Fetches the spec URI of the tool node shown in the panel. Returns `false` when the panel
    /// shows no tool node or the URI is blank.
    pub fn fetch_spec(&mut self) -> bool {
        let Some(panel) = self.editor.panel() else {
            return false;
        };
        let Some(AttrValue::Text(uri)) =
            panel.value(&PanelField::Detail(DetailField::SpecUri))
        else {
            return false;
        };
        if uri.trim().is_empty() {
            return false;
        }
        let node_id = panel.node_id().clone();
        let fetcher = Arc::clone(&self.collaborators.fetcher);
        let task_uri = uri.clone();
        self.spawn(
            SessionAction::Fetch,
            async move { fetcher.fetch(&task_uri).await },
            move |result| TaskOutcome::Fetched {
                node_id,
                uri,
                result,
            },
        );
        true
    }

    fn spawn<T, Fut, Wrap>(&mut self, action: SessionAction, task: Fut, wrap: Wrap)
    where
        T: Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        Wrap: FnOnce(T) -> TaskOutcome + Send + 'static,
    {
        tracing::info!(target: TRACING_TARGET, %action, "task started");
        self.in_flight.push(action);

        let cancel = self.cancel.clone();
        let tx = self.outcome_tx.clone();
        let runtime = self.runtime.clone();
        self.runtime.spawn(async move {
            let mut handle = runtime.spawn(task);
            let outcome = tokio::select! {
                _ = cancel.cancelled() => {
                    handle.abort();
                    tracing::debug!(target: TRACING_TARGET, %action, "task cancelled");
                    return;
                }
                joined = &mut handle => match joined {
                    Ok(value) => wrap(value),
                    Err(err) if err.is_panic() => TaskOutcome::Panicked {
                        action,
                        message: panic_message(err.into_panic()),
                    },
                    Err(err) => TaskOutcome::Panicked {
                        action,
                        message: err.to_string(),
                    },
                },
            };
            // The receiver is gone once the session is dropped.
            let _ = tx.send(outcome);
        });
    }

    /// Applies every outcome that has already arrived. Returns how many were applied.
    pub fn drain_outcomes(&mut self) -> usize {
        if self.cancel.is_cancelled() {
            return 0;
        }
        let mut applied = 0;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply_outcome(outcome);
            applied += 1;
        }
        applied
    }

    /// Waits for the next outcome and applies it. Returns `false` when nothing is in flight.
    pub async fn next_outcome(&mut self) -> bool {
        if self.in_flight.is_empty() || self.cancel.is_cancelled() {
            return false;
        }
        match self.outcome_rx.recv().await {
            Some(outcome) => {
                self.apply_outcome(outcome);
                true
            }
            None => false,
        }
    }

    fn finish(&mut self, action: SessionAction) {
        if let Some(idx) = self.in_flight.iter().position(|a| *a == action) {
            self.in_flight.remove(idx);
        }
    }

    fn apply_outcome(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::Saved { rev, result } => {
                self.finish(SessionAction::Save);
                match result {
                    Ok(receipt) => {
                        tracing::info!(target: TRACING_TARGET, rev, location = %receipt.location, "workflow saved");
                        self.saved_rev = Some(rev);
                        self.notify(Notification::success(format!(
                            "Saved \"{}\"",
                            self.name()
                        )));
                    }
                    Err(err) => {
                        tracing::warn!(target: TRACING_TARGET, error = %err, "save failed");
                        self.notify(Notification::error(format!("Save failed: {err}")));
                    }
                }
            }
            TaskOutcome::Ran(result) => {
                self.finish(SessionAction::Run);
                self.report(SessionAction::Run, result);
            }
            TaskOutcome::Deployed(result) => {
                self.finish(SessionAction::Deploy);
                self.report(SessionAction::Deploy, result);
            }
            TaskOutcome::Fetched {
                node_id,
                uri,
                result,
            } => {
                self.finish(SessionAction::Fetch);
                match result {
                    Ok(fetched) => {
                        let format = fetched.format;
                        let applied = self
                            .editor
                            .panel_mut()
                            .is_some_and(|panel| panel.apply_fetched(&node_id, &uri, &fetched));
                        if applied {
                            self.notify(Notification::info(format!("Loaded {format} spec")));
                        } else {
                            tracing::trace!(target: TRACING_TARGET, node_id = %node_id, "stale fetch result dropped");
                        }
                    }
                    Err(err) => {
                        self.notify(Notification::error(format!("Could not load spec: {err}")));
                    }
                }
            }
            TaskOutcome::Panicked { action, message } => {
                self.finish(action);
                tracing::warn!(target: TRACING_TARGET, %action, panic = %message, "task panicked");
                if action == SessionAction::Run {
                    self.error_panel = Some(ErrorPanel::new(message));
                } else {
                    self.notify(Notification::error(format!("{action} crashed: {message}")));
                }
            }
        }
    }

    fn report(&mut self, action: SessionAction, result: Result<ExecutionReport, CollabError>) {
        match result {
            Ok(report) => {
                tracing::info!(target: TRACING_TARGET, %action, summary = %report.summary, "task succeeded");
                self.notify(Notification::success(report.summary));
            }
            Err(err) => {
                tracing::warn!(target: TRACING_TARGET, %action, error = %err, "task failed");
                self.notify(Notification::error(format!("{action} failed: {err}")));
            }
        }
    }

    /// Cancels every in-flight task.
    pub fn shutdown(&mut self) {
        self.cancel.cancel();
        self.in_flight.clear();
    }

    /// Serialized snapshot of the current document.
    pub fn record(&self) -> WorkflowRecord {
        self.editor.document().to_record()
    }
}

impl Drop for WorkflowSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "task panicked".to_owned()
    }
}
