//! Contents of one folder.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::managers::clip_repository::ClipRepositoryTrait;
use crate::managers::folder_repository::FolderRepositoryTrait;
use crate::reducer::{Binding, Effect, Reducer};
use crate::types::clip::Clip;
use crate::types::errors::DomainError;
use crate::types::folder::Folder;
use crate::types::now_millis;

#[derive(Debug, Clone)]
pub enum FolderViewAction {
    Reload,
    VisitClip(Uuid),
    DeleteFolder(Uuid),
    DeleteClip(Uuid),
}

#[derive(Debug, Clone)]
pub enum FolderViewMutation {
    ReloadStarted,
    Loaded(Folder),
    LoadFailed(DomainError),
    FolderReplaced(Folder),
    ClipReplaced(Clip),
    ActionFailed(DomainError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FolderViewState {
    pub folder: Folder,
    pub is_loading: bool,
    pub alert_message: Option<String>,
}

impl FolderViewState {
    pub fn new(folder: Folder) -> Self {
        Self {
            folder,
            is_loading: false,
            alert_message: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.folder.title
    }

    pub fn folders(&self) -> Vec<&Folder> {
        self.folder.visible_folders().collect()
    }

    pub fn clips(&self) -> Vec<&Clip> {
        self.folder.visible_clips().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.folder.visible_folders().next().is_none() && self.folder.visible_clips().next().is_none()
    }
}

pub struct FolderViewReducer {
    folders: Arc<dyn FolderRepositoryTrait>,
    clips: Arc<dyn ClipRepositoryTrait>,
}

impl FolderViewReducer {
    pub fn new(folders: Arc<dyn FolderRepositoryTrait>, clips: Arc<dyn ClipRepositoryTrait>) -> Self {
        Self { folders, clips }
    }
}

impl Reducer for FolderViewReducer {
    type Action = FolderViewAction;
    type Mutation = FolderViewMutation;
    type State = FolderViewState;

    fn mutate(&self, state: &FolderViewState, action: FolderViewAction) -> Effect<FolderViewMutation> {
        match action {
            FolderViewAction::Reload => {
                let repository = self.folders.clone();
                let id = state.folder.id;
                Effect::future(async move {
                    match repository.fetch_folder(id).await {
                        Ok(folder) => FolderViewMutation::Loaded(folder),
                        Err(e) => {
                            warn!(folder_id = %id, error = %e, "folder reload failed");
                            FolderViewMutation::LoadFailed(e)
                        }
                    }
                })
                .starting_with(FolderViewMutation::ReloadStarted)
            }
            FolderViewAction::VisitClip(id) => {
                let Some(clip) = state.folder.visible_clips().find(|c| c.id == id) else {
                    debug!(clip_id = %id, "visited clip not listed");
                    return Effect::none();
                };
                let visited = clip.visited(now_millis());
                let repository = self.clips.clone();
                Effect::future(async move {
                    match repository.update_clip(&visited).await {
                        Ok(()) => FolderViewMutation::ClipReplaced(visited),
                        Err(e) => FolderViewMutation::ActionFailed(e),
                    }
                })
            }
            FolderViewAction::DeleteFolder(id) => {
                let Some(folder) = state.folder.visible_folders().find(|f| f.id == id) else {
                    debug!(folder_id = %id, "deleted folder not listed");
                    return Effect::none();
                };
                let tombstoned = folder.tombstoned(now_millis());
                let repository = self.folders.clone();
                Effect::future(async move {
                    match repository.delete_folder(&tombstoned).await {
                        Ok(()) => FolderViewMutation::FolderReplaced(tombstoned),
                        Err(e) => FolderViewMutation::ActionFailed(e),
                    }
                })
            }
            FolderViewAction::DeleteClip(id) => {
                let Some(clip) = state.folder.visible_clips().find(|c| c.id == id) else {
                    debug!(clip_id = %id, "deleted clip not listed");
                    return Effect::none();
                };
                let tombstoned = clip.tombstoned(now_millis());
                let repository = self.clips.clone();
                Effect::future(async move {
                    match repository.delete_clip(&tombstoned).await {
                        Ok(()) => FolderViewMutation::ClipReplaced(tombstoned),
                        Err(e) => FolderViewMutation::ActionFailed(e),
                    }
                })
            }
        }
    }

    fn reduce(&self, mut state: FolderViewState, mutation: FolderViewMutation) -> FolderViewState {
        match mutation {
            FolderViewMutation::ReloadStarted => state.is_loading = true,
            FolderViewMutation::Loaded(mut folder) => {
                state.is_loading = false;
                state.alert_message = None;
                keep_tombstones(&mut folder, &state.folder);
                state.folder = folder;
            }
            FolderViewMutation::LoadFailed(e) => {
                state.is_loading = false;
                state.alert_message = Some(e.to_string());
            }
            FolderViewMutation::FolderReplaced(folder) => {
                if let Some(slot) = state.folder.folders.iter_mut().find(|f| f.id == folder.id) {
                    *slot = folder;
                }
            }
            FolderViewMutation::ClipReplaced(clip) => {
                if let Some(slot) = state.folder.clips.iter_mut().find(|c| c.id == clip.id) {
                    *slot = clip;
                }
            }
            FolderViewMutation::ActionFailed(e) => state.alert_message = Some(e.to_string()),
        }
        state
    }

    fn binding(&self, action: &FolderViewAction) -> Binding {
        match action {
            FolderViewAction::Reload => Binding::LatestWins("reload"),
            _ => Binding::Concurrent,
        }
    }
}

/// Copies child tombstones from `current` into a freshly loaded folder.
///
/// Deletes are never undone, so a load read before a delete landed must not
/// bring the deleted child back.
fn keep_tombstones(loaded: &mut Folder, current: &Folder) {
    for gone in current.folders.iter().filter(|f| f.is_deleted()) {
        if let Some(slot) = loaded.folders.iter_mut().find(|f| f.id == gone.id && !f.is_deleted()) {
            *slot = gone.clone();
        }
    }
    for gone in current.clips.iter().filter(|c| c.is_deleted()) {
        if let Some(slot) = loaded.clips.iter_mut().find(|c| c.id == gone.id && !c.is_deleted()) {
            *slot = gone.clone();
        }
    }
}
