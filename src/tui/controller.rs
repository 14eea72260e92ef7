use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use crate::io::recovery::{RecoveryEntry, log_recovery};
use crate::model::{GestureConfig, ItemAction, ItemId};
use crate::ops::confirm::{ConfirmGate, Resolved};
use crate::ops::item_store::{ItemError, ItemStore};
use crate::ops::reconcile::{EditField, Reconciler};
use crate::util::line_buffer::LineBuffer;

pub const CONFIRM_EDIT: &str = "confirm edit";
pub const CONFIRM_DELETE: &str = "confirm delete";

/// A mutation parked in the confirmation gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingMutation {
    Edit { id: ItemId, text: String },
    Delete { id: ItemId },
}

/// What ended an in-place edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitTrigger {
    Enter,
    Blur,
}

/// Discrete user intents reported by the front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Clicked { id: ItemId, action: ItemAction },
    DragStarted { id: ItemId, pointer_x: i32 },
    DragMoved { pointer_y: i32 },
    Dropped,
    DragEnded { pointer_x: i32 },
    SearchChanged(String),
    AddRequested(String),
    AddCancelled,
    EditCommit { id: ItemId, trigger: CommitTrigger },
    EditCancelled { id: ItemId },
    ConfirmAccepted,
    ConfirmDeclined,
}

/// Which input receives typed keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    AddInput,
    Search,
    List,
    Edit(ItemId),
}

/// Runs the add/edit/toggle/delete/search/reorder workflows against the
/// store, the confirmation gate and the visual node list.
pub struct Controller {
    pub store: ItemStore,
    pub view: Reconciler,
    pub gate: ConfirmGate<PendingMutation>,
    pub add_input: LineBuffer,
    pub search_input: LineBuffer,
    pub focus: Focus,
    /// Empty-input alert is visible until this instant
    pub alert_until: Option<Instant>,
    pub status_message: Option<String>,
    gestures: GestureConfig,
    /// Where unsaved snapshots are logged after a failed write
    recovery_dir: Option<PathBuf>,
    /// Blob most recently copied to the recovery log
    last_logged: Option<String>,
}

impl Controller {
    pub fn new(store: ItemStore, gestures: GestureConfig) -> Self {
        let mut view = Reconciler::new();
        view.project(store.all());
        Controller {
            store,
            view,
            gate: ConfirmGate::new(),
            add_input: LineBuffer::default(),
            search_input: LineBuffer::default(),
            focus: Focus::AddInput,
            alert_until: None,
            status_message: None,
            gestures,
            recovery_dir: None,
            last_logged: None,
        }
    }

    pub fn with_recovery_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.recovery_dir = Some(dir.into());
        self
    }

    pub fn gestures(&self) -> &GestureConfig {
        &self.gestures
    }

    pub fn alert_visible(&self) -> bool {
        self.alert_until.is_some()
    }

    pub fn dispatch(&mut self, intent: Intent) {
        self.dispatch_at(intent, Instant::now());
    }

    /// Handle one intent. `now` timestamps the empty-input alert.
    pub fn dispatch_at(&mut self, intent: Intent, now: Instant) {
        match intent {
            Intent::Clicked { id, action } => match action {
                ItemAction::Complete => self.toggle(id),
                ItemAction::Edit => self.start_edit(id),
                ItemAction::Delete => self.request_delete(id),
            },
            Intent::DragStarted { id, pointer_x } => {
                self.view.begin_drag(id, pointer_x);
            }
            Intent::DragMoved { pointer_y } => self.view.drag_to(pointer_y),
            Intent::Dropped => {
                if self.view.dragging().is_some() {
                    self.commit_order();
                }
            }
            Intent::DragEnded { pointer_x } => self.end_drag(pointer_x),
            Intent::SearchChanged(query) => {
                self.view.apply_filter(self.store.all(), &query);
            }
            Intent::AddRequested(text) => self.add(&text, now),
            Intent::AddCancelled => self.add_input.clear(),
            Intent::EditCommit { id, trigger } => self.commit_edit(id, trigger),
            Intent::EditCancelled { id } => self.cancel_edit(id),
            Intent::ConfirmAccepted => {
                if let Some(resolved) = self.gate.accept() {
                    self.resolve(resolved);
                }
            }
            Intent::ConfirmDeclined => {
                if let Some(resolved) = self.gate.decline() {
                    self.resolve(resolved);
                }
            }
        }
        self.report_save_failure();
    }

    /// Route a key to the open confirmation. Returns false if no gate is open.
    pub fn confirm_key(&mut self, code: KeyCode) -> bool {
        if !self.gate.is_open() {
            return false;
        }
        if let Some(resolved) = self.gate.resolve_key(code) {
            self.resolve(resolved);
            self.report_save_failure();
        }
        true
    }

    /// Hide the empty-input alert once its time is up and hand focus back
    /// to the add input.
    pub fn expire_alert(&mut self, now: Instant) {
        if self.alert_until.is_some_and(|until| now >= until) {
            self.alert_until = None;
            self.focus = Focus::AddInput;
        }
    }

    /// Move focus, blurring any field being edited
    pub fn set_focus(&mut self, focus: Focus) {
        if let Focus::Edit(current) = self.focus
            && focus != Focus::Edit(current)
        {
            self.commit_edit(current, CommitTrigger::Blur);
            self.report_save_failure();
        }
        self.focus = focus;
    }

    // -----------------------------------------------------------------------
    // Workflows
    // -----------------------------------------------------------------------

    fn add(&mut self, text: &str, now: Instant) {
        match self.store.add(text) {
            Ok(item) => {
                tracing::debug!(id = item.id, "item added");
                self.view.project(self.store.all());
                self.add_input.clear();
                self.alert_until = None;
            }
            Err(ItemError::EmptyText) => {
                self.alert_until = Some(now + Duration::from_millis(self.gestures.alert_ms));
                self.focus = Focus::AddInput;
            }
            Err(e) => tracing::debug!(error = %e, "add ignored"),
        }
    }

    fn toggle(&mut self, id: ItemId) {
        match self.store.toggle_done(id) {
            Ok(done) => tracing::debug!(id, done, "item toggled"),
            Err(e) => tracing::debug!(error = %e, "toggle ignored"),
        }
    }

    fn start_edit(&mut self, id: ItemId) {
        let Some(text) = self.store.get(id).map(|i| i.text.clone()) else {
            tracing::debug!(id, "edit of missing item ignored");
            return;
        };
        if self.view.node(id).is_none_or(|n| n.editor.is_some()) {
            return;
        }
        self.set_focus(Focus::Edit(id));
        if let Some(node) = self.view.node_mut(id) {
            node.editor = Some(EditField::new(&text));
        }
    }

    fn commit_edit(&mut self, id: ItemId, trigger: CommitTrigger) {
        let Some(node) = self.view.node_mut(id) else {
            return;
        };
        let Some(editor) = node.editor.as_mut() else {
            return;
        };
        if !editor.settle() {
            return;
        }
        tracing::debug!(id, ?trigger, "edit committed");
        let new_text = editor.input.text().trim().to_string();
        if self.focus == Focus::Edit(id) {
            self.focus = Focus::List;
        }
        if new_text.is_empty() {
            node.editor = None;
            return;
        }
        let pending = PendingMutation::Edit { id, text: new_text };
        if let Err(busy) = self.gate.open(CONFIRM_EDIT, pending) {
            node.editor = None;
            self.status_message = Some(format!("edit dropped: {}", busy));
        }
    }

    fn cancel_edit(&mut self, id: ItemId) {
        let Some(node) = self.view.node_mut(id) else {
            return;
        };
        if node.editor.as_mut().is_some_and(|e| e.settle()) {
            node.editor = None;
            if self.focus == Focus::Edit(id) {
                self.focus = Focus::List;
            }
        }
    }

    fn request_delete(&mut self, id: ItemId) {
        if self.store.get(id).is_none() {
            tracing::debug!(id, "delete of missing item ignored");
            return;
        }
        if let Err(busy) = self.gate.open(CONFIRM_DELETE, PendingMutation::Delete { id }) {
            self.status_message = Some(format!("delete dropped: {}", busy));
        }
    }

    fn resolve(&mut self, resolved: Resolved<PendingMutation>) {
        match resolved.pending {
            PendingMutation::Edit { id, text } => {
                if resolved.accepted
                    && let Err(e) = self.store.update(id, &text)
                {
                    tracing::debug!(error = %e, "edit ignored");
                }
                if let Some(node) = self.view.node_mut(id) {
                    node.editor = None;
                }
                self.view.project(self.store.all());
            }
            PendingMutation::Delete { id } => {
                if !resolved.accepted {
                    return;
                }
                match self.store.remove(id) {
                    Ok(item) => {
                        self.status_message = Some(format!("deleted \"{}\"", item.text));
                        if self.focus == Focus::Edit(id) {
                            self.focus = Focus::List;
                        }
                    }
                    Err(e) => tracing::debug!(error = %e, "delete ignored"),
                }
                self.view.project(self.store.all());
            }
        }
    }

    fn end_drag(&mut self, pointer_x: i32) {
        let Some((id, start_x)) = self.view.end_drag() else {
            return;
        };
        self.commit_order();

        let dx = pointer_x - start_x;
        let threshold = self.gestures.swipe_threshold_px;
        if dx > threshold {
            self.start_edit(id);
        } else if dx < -threshold {
            self.request_delete(id);
        }
    }

    fn commit_order(&mut self) {
        self.store.reorder(&self.view.read_order());
        self.view.project(self.store.all());
    }

    fn report_save_failure(&mut self) {
        let Some(failure) = self.store.take_save_failure() else {
            return;
        };
        self.status_message = Some(format!("warning: changes not saved ({})", failure.error));
        // One snapshot per run of failures; the latest state is logged at exit
        if !failure.first_in_run {
            return;
        }
        if let Some(dir) = &self.recovery_dir {
            let entry = RecoveryEntry::failed_save(&failure.error.to_string(), failure.blob);
            log_recovery(dir, &entry);
            self.last_logged = Some(entry.body);
        }
    }

    /// Copy the list to the recovery log if it is still unsaved and differs
    /// from the last snapshot logged
    pub fn log_unsaved_on_exit(&mut self) {
        let Some(blob) = self.store.unsaved_blob() else {
            return;
        };
        if self.last_logged.as_deref() == Some(blob.as_str()) {
            return;
        }
        if let Some(dir) = &self.recovery_dir {
            log_recovery(dir, &RecoveryEntry::unsaved_at_exit(blob.clone()));
            self.last_logged = Some(blob);
        }
    }
}
