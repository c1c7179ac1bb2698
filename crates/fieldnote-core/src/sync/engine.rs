//! Note synchronization engine.
//!
//! One engine instance exists per open note. It owns the edit buffer,
//! debounces local edits into remote writes, watches the shared
//! collection and a poll timer for externally-made changes, and merges
//! those changes back into the buffer under the grace-window rules.
//!
//! The two trigger sources (collection update, poll tick) converge on
//! one `try_reconcile` step; the last-synced fingerprint guard makes
//! overlapping triggers a natural no-op. Dropping the [`run`] driver
//! (or signalling shutdown) cancels every timer for the note, so
//! switching notes cannot leave a stale timer behind.
//!
//! [`run`]: NoteSyncEngine::run

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{watch, Notify};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::collection::SharedNoteCollection;
use crate::models::{Note, NoteId};
use crate::session::Session;
use crate::store::NoteStore;
use crate::sync::{DebounceSlot, EditBuffer, NoteChange, SyncConfig, SyncFingerprint};

/// Observable autosave state for UI feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveState {
    /// Nothing pending
    Idle,
    /// A write is in flight
    Saving,
    /// The last write succeeded
    Saved,
    /// The last write failed; the buffer is intact and will retry
    Failed(String),
}

struct EngineState {
    buffer: EditBuffer,
    /// Snapshot of the last successfully written note state
    last_saved: Option<Note>,
    /// Fingerprint of the last remote state folded into the buffer
    last_synced: Option<SyncFingerprint>,
    debounce: DebounceSlot,
    saving: bool,
    is_new: bool,
    visible: bool,
}

struct PendingWrite {
    snapshot: Note,
    is_new: bool,
}

/// Synchronization engine for one open note.
///
/// Cheaply cloneable; clones share state, so the UI keeps one handle
/// for `edit` calls while the driver clone runs the timers.
pub struct NoteSyncEngine<S> {
    store: Arc<S>,
    collection: SharedNoteCollection,
    session: Session,
    config: SyncConfig,
    state: Arc<Mutex<EngineState>>,
    status: Arc<watch::Sender<SaveState>>,
    rearmed: Arc<Notify>,
}

impl<S> Clone for NoteSyncEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            collection: self.collection.clone(),
            session: self.session.clone(),
            config: self.config.clone(),
            state: Arc::clone(&self.state),
            status: Arc::clone(&self.status),
            rearmed: Arc::clone(&self.rearmed),
        }
    }
}

impl<S: NoteStore> NoteSyncEngine<S> {
    /// Open a note for editing.
    ///
    /// The buffer loads directly from the passed-in note and the
    /// last-synced fingerprint starts empty, so the next comparison
    /// establishes the baseline.
    #[must_use]
    pub fn open(
        note: Note,
        store: Arc<S>,
        collection: SharedNoteCollection,
        session: Session,
        config: SyncConfig,
    ) -> Self {
        let is_new = note.id.is_none();
        let buffer = EditBuffer::load(note);
        let last_saved = if is_new { None } else { Some(buffer.snapshot()) };
        let (status, _) = watch::channel(SaveState::Idle);

        Self {
            store,
            collection,
            session,
            config,
            state: Arc::new(Mutex::new(EngineState {
                buffer,
                last_saved,
                last_synced: None,
                debounce: DebounceSlot::new(),
                saving: false,
                is_new,
                visible: true,
            })),
            status: Arc::new(status),
            rearmed: Arc::new(Notify::new()),
        }
    }

    /// Apply a user edit to the buffer and (re)arm the autosave timer.
    ///
    /// Synchronous and free of I/O; the driver picks the write up once
    /// the quiet period elapses. Edits to archived notes are ignored.
    pub fn edit(&self, change: NoteChange) {
        let mut state = self.lock();
        if state.buffer.note().is_archived {
            tracing::debug!("Ignoring edit to archived note");
            return;
        }

        state.buffer.apply(change);
        let delay = if state.is_new {
            self.config.create_debounce
        } else {
            self.config.update_debounce
        };
        state.debounce.reset(delay);
        drop(state);
        self.rearmed.notify_one();
    }

    /// Snapshot of the note as the user currently sees it.
    #[must_use]
    pub fn buffer(&self) -> Note {
        self.lock().buffer.snapshot()
    }

    /// Whether a write is currently in flight.
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.lock().saving
    }

    /// Subscribe to autosave state changes.
    #[must_use]
    pub fn subscribe_status(&self) -> watch::Receiver<SaveState> {
        self.status.subscribe()
    }

    /// Update the page-foregrounded signal; polling pauses while
    /// hidden and resumes on visibility return.
    pub fn set_visible(&self, visible: bool) {
        self.lock().visible = visible;
    }

    /// Persist immediately (blur/shortcut path), bypassing the
    /// debounce window. All autosave gates still apply.
    pub async fn save_now(&self) {
        let pending = {
            let mut state = self.lock();
            state.debounce.cancel();
            self.prepare_write(&mut state)
        };
        self.complete_write(pending).await;
    }

    /// Drive the timers until `shutdown` signals or its sender drops.
    ///
    /// This is the only place timers live; stopping it stops all
    /// autosave and polling activity for the note.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut updates = self.collection.subscribe();
        let mut poll = time::interval(self.config.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let deadline = self.lock().debounce.deadline();

            tokio::select! {
                () = sleep_until_deadline(deadline) => {
                    self.flush_autosave().await;
                }
                () = self.rearmed.notified() => {
                    // deadline moved; recompute on the next iteration
                }
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    self.try_reconcile();
                }
                _ = poll.tick() => {
                    self.poll_tick();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::debug!("Sync driver stopped; timers cancelled");
    }

    /// One poll cycle: reconcile only while the page is foregrounded.
    pub(crate) fn poll_tick(&self) {
        if self.lock().visible {
            self.try_reconcile();
        }
    }

    /// Fire the debounced autosave if its deadline has passed.
    pub(crate) async fn flush_autosave(&self) {
        let pending = {
            let mut state = self.lock();
            if !state.debounce.take_if_due(Instant::now()) {
                // re-armed or cancelled since the wakeup
                return;
            }
            self.prepare_write(&mut state)
        };
        self.complete_write(pending).await;
    }

    /// Evaluate the autosave gates and claim the in-flight slot.
    fn prepare_write(&self, state: &mut EngineState) -> Option<PendingWrite> {
        if state.saving {
            // One write in flight at a time; pick this change up on
            // the next cycle once the current write resolves.
            state.debounce.reset(self.config.update_debounce);
            self.rearmed.notify_one();
            return None;
        }

        let snapshot = state.buffer.snapshot();
        if snapshot.is_archived {
            return None;
        }
        if !snapshot.has_content() {
            tracing::debug!("Skipping autosave: no meaningful content");
            return None;
        }
        if !self.session.can_edit(&snapshot) {
            // read-only/review mode never reaches the store
            tracing::debug!("Skipping autosave: session may not edit this note");
            return None;
        }
        if state.last_saved.as_ref() == Some(&snapshot) {
            return None;
        }

        state.saving = true;
        let _ = self.status.send(SaveState::Saving);
        Some(PendingWrite {
            snapshot,
            is_new: state.is_new,
        })
    }

    /// Issue the write and fold the outcome back into engine state.
    async fn complete_write(&self, pending: Option<PendingWrite>) {
        let Some(pending) = pending else { return };

        let result = if pending.is_new {
            self.store.create(&pending.snapshot).await.map(Some)
        } else {
            self.store.overwrite(&pending.snapshot).await.map(|()| None)
        };

        match result {
            Ok(created_id) => self.finish_write(pending, created_id),
            Err(error) => {
                // The last-saved snapshot stays put, so the next edit
                // cycle retries; the buffer is never rolled back.
                let mut state = self.lock();
                state.saving = false;
                drop(state);
                tracing::warn!("Autosave failed: {error}");
                let _ = self.status.send(SaveState::Failed(error.to_string()));
            }
        }
    }

    fn finish_write(&self, pending: PendingWrite, created_id: Option<NoteId>) {
        let mut saved = pending.snapshot;
        {
            let mut state = self.lock();
            state.saving = false;
            if let Some(id) = created_id {
                saved.id = Some(id.clone());
                state.is_new = false;
                state.buffer.set_id(id);
            }
            state.last_saved = Some(saved.clone());
            // Our own write must not read back as an external change.
            state.last_synced = Some(SyncFingerprint::of(&saved));
        }

        // Publish the saved state for the other open views.
        if pending.is_new {
            tracing::debug!(
                "Created note {}",
                saved.id.as_ref().map_or("?", NoteId::as_str)
            );
            self.collection.append(saved);
        } else if let Some(id) = saved.id.clone() {
            tracing::debug!("Auto-saved note {id}");
            let pushed = self.collection.upsert(&id, |note| *note = saved.clone());
            if !pushed {
                self.collection.append(saved);
            }
        }

        let _ = self.status.send(SaveState::Saved);
    }

    /// Single check-and-merge step shared by both trigger sources.
    ///
    /// Reads only from the already-fetched shared collection, so it
    /// has no failure mode of its own.
    pub(crate) fn try_reconcile(&self) {
        let open_id = self.lock().buffer.note().id.clone();
        let Some(id) = open_id else {
            // drafts have nothing to compare against
            return;
        };
        let Some(remote) = self.collection.get(&id) else {
            // not in the collection this tick; nothing to reconcile
            return;
        };

        let mut state = self.lock();
        let remote_fingerprint = SyncFingerprint::of(&remote);
        if state.last_synced.as_ref() == Some(&remote_fingerprint) {
            return;
        }

        // First comparison after open: when local and remote already
        // agree, just establish the baseline marker.
        if state.last_synced.is_none()
            && SyncFingerprint::of(state.buffer.note()) == remote_fingerprint
        {
            state.last_synced = Some(remote_fingerprint);
            return;
        }

        let idle = state.buffer.idle_for();
        if idle.is_some_and(|idle| idle <= self.config.short_grace) {
            // The local edit is too fresh. Deferred, not dropped: the
            // stale marker keeps this change eligible for the next
            // trigger.
            tracing::debug!("Deferring remote change: local edit within short grace");
            return;
        }

        state.buffer.apply_remote_metadata(&remote);

        let text_settled = idle.map_or(true, |idle| idle > self.config.long_grace);
        if text_settled {
            state.buffer.apply_remote_text(&remote);
            state.last_synced = Some(remote_fingerprint);
            tracing::debug!("Applied remote change for note {id}");
        } else {
            // Partial apply: the marker stays stale so the deferred
            // title/body are retried once past the long grace.
            tracing::debug!("Applied remote metadata for note {id}; text deferred");
        }
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
