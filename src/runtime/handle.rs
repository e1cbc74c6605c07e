use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};

use crate::{
    auth::Identity,
    core::{
        session::{FormField, SessionMode},
        state::PantryState,
    },
    record::InventoryRecord,
    store::RecordStore,
    sync::{SyncError, Synchronizer},
    types::{CollectionScope, RecordId, ScopePolicy},
};

use super::events::PantryEvent;

#[derive(Debug)]
pub enum ControllerError {
    Sync(SyncError),
    NotSignedIn,
    ChannelClosed,
}

impl From<SyncError> for ControllerError {
    fn from(value: SyncError) -> Self {
        Self::Sync(value)
    }
}

/// Read-only snapshot of the add/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    pub mode: SessionMode,
    pub name: String,
    pub quantity: String,
    pub expiration: String,
    pub editing_id: Option<RecordId>,
}

pub struct PantryHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<PantryEvent>,
}

impl Clone for PantryHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    EditField {
        field: FormField,
        value: String,
        resp: oneshot::Sender<()>,
    },
    BeginEdit {
        id: RecordId,
        resp: oneshot::Sender<Result<(), ControllerError>>,
    },
    CancelEdit {
        resp: oneshot::Sender<()>,
    },
    Submit {
        resp: oneshot::Sender<Result<RecordId, ControllerError>>,
    },
    Remove {
        id: RecordId,
        resp: oneshot::Sender<Result<(), ControllerError>>,
    },
    Search {
        query: String,
        resp: oneshot::Sender<()>,
    },
    Refresh {
        resp: oneshot::Sender<Result<bool, ControllerError>>,
    },
    View {
        resp: oneshot::Sender<Vec<InventoryRecord>>,
    },
    Form {
        resp: oneshot::Sender<FormSnapshot>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Spawns the controller loop for one pantry screen.
///
/// The loop owns the [`PantryState`] and serializes every command, so local
/// state only ever changes on one logical thread. The auth subscription lives
/// exactly as long as the loop: it is taken here and dropped when the loop
/// exits on shutdown.
pub fn spawn_pantry<S: RecordStore + 'static>(
    store: Arc<S>,
    policy: ScopePolicy,
    mut auth_rx: watch::Receiver<Option<Identity>>,
) -> PantryHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(64);
    let (events_tx, _) = broadcast::channel::<PantryEvent>(256);

    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut state = PantryState::new();
        let mut sync: Option<Synchronizer<S>> = match policy {
            ScopePolicy::Global => Some(Synchronizer::new(
                Arc::clone(&store),
                CollectionScope::Global,
            )),
            ScopePolicy::PerUser => None,
        };

        // The provider's subscription reports the current identity at mount;
        // mounting while already signed out changes nothing.
        let initial = auth_rx.borrow_and_update().clone();
        if initial.is_some() || matches!(policy, ScopePolicy::Global) {
            handle_auth_change(
                initial,
                policy,
                &store,
                &mut sync,
                &mut state,
                &events_tx_loop,
            )
            .await;
        }

        let mut auth_alive = true;
        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    let Some(cmd) = cmd else { break; };
                    let done = handle_command(cmd, sync.as_ref(), &mut state, &events_tx_loop).await;
                    if done {
                        break;
                    }
                }
                changed = auth_rx.changed(), if auth_alive => {
                    if changed.is_err() {
                        // Provider dropped; keep serving local commands.
                        auth_alive = false;
                        continue;
                    }
                    let identity = auth_rx.borrow_and_update().clone();
                    handle_auth_change(
                        identity,
                        policy,
                        &store,
                        &mut sync,
                        &mut state,
                        &events_tx_loop,
                    )
                    .await;
                }
            }
        }
    });

    PantryHandle { cmd_tx, events_tx }
}

impl PantryHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<PantryEvent> {
        self.events_tx.subscribe()
    }

    pub async fn edit_field(
        &self,
        field: FormField,
        value: impl Into<String>,
    ) -> Result<(), ControllerError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::EditField {
                field,
                value: value.into(),
                resp: tx,
            })
            .await
            .map_err(|_| ControllerError::ChannelClosed)?;
        rx.await.map_err(|_| ControllerError::ChannelClosed)
    }

    pub async fn begin_edit(&self, id: impl Into<RecordId>) -> Result<(), ControllerError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::BeginEdit {
                id: id.into(),
                resp: tx,
            })
            .await
            .map_err(|_| ControllerError::ChannelClosed)?;
        rx.await.map_err(|_| ControllerError::ChannelClosed)?
    }

    pub async fn cancel_edit(&self) -> Result<(), ControllerError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::CancelEdit { resp: tx })
            .await
            .map_err(|_| ControllerError::ChannelClosed)?;
        rx.await.map_err(|_| ControllerError::ChannelClosed)
    }

    pub async fn submit(&self) -> Result<RecordId, ControllerError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Submit { resp: tx })
            .await
            .map_err(|_| ControllerError::ChannelClosed)?;
        rx.await.map_err(|_| ControllerError::ChannelClosed)?
    }

    pub async fn remove(&self, id: impl Into<RecordId>) -> Result<(), ControllerError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Remove {
                id: id.into(),
                resp: tx,
            })
            .await
            .map_err(|_| ControllerError::ChannelClosed)?;
        rx.await.map_err(|_| ControllerError::ChannelClosed)?
    }

    pub async fn search(&self, query: impl Into<String>) -> Result<(), ControllerError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Search {
                query: query.into(),
                resp: tx,
            })
            .await
            .map_err(|_| ControllerError::ChannelClosed)?;
        rx.await.map_err(|_| ControllerError::ChannelClosed)
    }

    pub async fn refresh(&self) -> Result<bool, ControllerError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Refresh { resp: tx })
            .await
            .map_err(|_| ControllerError::ChannelClosed)?;
        rx.await.map_err(|_| ControllerError::ChannelClosed)?
    }

    pub async fn view(&self) -> Result<Vec<InventoryRecord>, ControllerError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::View { resp: tx })
            .await
            .map_err(|_| ControllerError::ChannelClosed)?;
        rx.await.map_err(|_| ControllerError::ChannelClosed)
    }

    pub async fn form(&self) -> Result<FormSnapshot, ControllerError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Form { resp: tx })
            .await
            .map_err(|_| ControllerError::ChannelClosed)?;
        rx.await.map_err(|_| ControllerError::ChannelClosed)
    }

    pub async fn shutdown(&self) -> Result<(), ControllerError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| ControllerError::ChannelClosed)?;
        rx.await.map_err(|_| ControllerError::ChannelClosed)
    }
}

async fn handle_auth_change<S: RecordStore>(
    identity: Option<Identity>,
    policy: ScopePolicy,
    store: &Arc<S>,
    sync: &mut Option<Synchronizer<S>>,
    state: &mut PantryState,
    events_tx: &broadcast::Sender<PantryEvent>,
) {
    match (policy, identity) {
        (ScopePolicy::PerUser, Some(identity)) => {
            *sync = Some(Synchronizer::new(
                Arc::clone(store),
                CollectionScope::User(identity.user_id),
            ));
            state.clear();
            refresh_into(sync.as_ref(), state, events_tx).await;
        }
        (ScopePolicy::PerUser, None) => {
            *sync = None;
            state.clear();
            let _ = events_tx.send(PantryEvent::SignedOut);
        }
        // The shared collection is not tied to a session; any auth
        // notification just triggers a refresh.
        (ScopePolicy::Global, _) => {
            refresh_into(sync.as_ref(), state, events_tx).await;
        }
    }
}

async fn handle_command<S: RecordStore>(
    cmd: Command,
    sync: Option<&Synchronizer<S>>,
    state: &mut PantryState,
    events_tx: &broadcast::Sender<PantryEvent>,
) -> bool {
    match cmd {
        Command::EditField { field, value, resp } => {
            state.session.set_field(field, value);
            let _ = resp.send(());
        }
        Command::BeginEdit { id, resp } => {
            let res = match state.find(&id).cloned() {
                Some(record) => {
                    state.session.begin_edit(record);
                    Ok(())
                }
                None => Err(ControllerError::Sync(SyncError::UnknownRecord(id))),
            };
            let _ = resp.send(res);
        }
        Command::CancelEdit { resp } => {
            state.session.cancel();
            let _ = resp.send(());
        }
        Command::Submit { resp } => {
            let res = submit(sync, state, events_tx).await;
            let _ = resp.send(res);
        }
        Command::Remove { id, resp } => {
            let res = match sync {
                Some(sync) => match sync.remove_record(&id).await {
                    Ok(()) => {
                        let _ = events_tx.send(PantryEvent::Removed { id });
                        refresh_into(Some(sync), state, events_tx).await;
                        Ok(())
                    }
                    Err(err) => {
                        log::warn!("record delete failed: {err:?}");
                        Err(ControllerError::Sync(err))
                    }
                },
                None => Err(ControllerError::NotSignedIn),
            };
            let _ = resp.send(res);
        }
        Command::Search { query, resp } => {
            state.set_search_query(query);
            let _ = resp.send(());
        }
        Command::Refresh { resp } => {
            let res = match sync {
                Some(sync) => match sync.refresh(state).await {
                    Ok(applied) => {
                        if applied {
                            let _ = events_tx.send(PantryEvent::Refreshed {
                                count: state.inventory().len(),
                            });
                        }
                        Ok(applied)
                    }
                    Err(err) => Err(ControllerError::Sync(err)),
                },
                None => Err(ControllerError::NotSignedIn),
            };
            let _ = resp.send(res);
        }
        Command::View { resp } => {
            let visible = state.visible().into_iter().cloned().collect();
            let _ = resp.send(visible);
        }
        Command::Form { resp } => {
            let session = &state.session;
            let _ = resp.send(FormSnapshot {
                mode: session.mode(),
                name: session.name().to_string(),
                quantity: session.quantity().to_string(),
                expiration: session.expiration().to_string(),
                editing_id: session.editing().map(|rec| rec.id.clone()),
            });
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(());
            return true;
        }
    }

    false
}

async fn submit<S: RecordStore>(
    sync: Option<&Synchronizer<S>>,
    state: &mut PantryState,
    events_tx: &broadcast::Sender<PantryEvent>,
) -> Result<RecordId, ControllerError> {
    let Some(sync) = sync else {
        return Err(ControllerError::NotSignedIn);
    };

    match state.session.editing().map(|rec| rec.id.clone()) {
        Some(id) => {
            let quantity = state.session.quantity().to_string();
            let expiration = state.session.expiration().to_string();
            if let Err(err) = sync.update_record(state, &id, &quantity, &expiration).await {
                log::warn!("record update failed: {err:?}");
                return Err(err.into());
            }
            state.session.reset();
            let _ = events_tx.send(PantryEvent::Updated { id: id.clone() });
            refresh_into(Some(sync), state, events_tx).await;
            Ok(id)
        }
        None => {
            let draft = state.session.draft();
            let id = match sync.add_record(&draft).await {
                Ok(id) => id,
                Err(err) => {
                    log::warn!("record add failed: {err:?}");
                    return Err(err.into());
                }
            };
            state.session.reset();
            let _ = events_tx.send(PantryEvent::Added { id: id.clone() });
            refresh_into(Some(sync), state, events_tx).await;
            Ok(id)
        }
    }
}

// Refresh leg after an acknowledged write: failures are logged, never
// surfaced; the local list simply does not advance until the next refresh.
async fn refresh_into<S: RecordStore>(
    sync: Option<&Synchronizer<S>>,
    state: &mut PantryState,
    events_tx: &broadcast::Sender<PantryEvent>,
) {
    let Some(sync) = sync else {
        return;
    };

    match sync.refresh(state).await {
        Ok(true) => {
            let _ = events_tx.send(PantryEvent::Refreshed {
                count: state.inventory().len(),
            });
        }
        Ok(false) => {}
        Err(err) => log::error!("inventory refresh failed: {err:?}"),
    }
}
