//! Create or edit a folder.
//!
//! The form is savable when the trimmed title is non-empty and, when editing,
//! either the title or the parent differs from what the folder had on entry.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::managers::folder_repository::FolderRepositoryTrait;
use crate::reducer::{Effect, Reducer};
use crate::types::errors::DomainError;
use crate::types::folder::Folder;
use crate::types::now_millis;

/// Maximum title length shown next to the title field.
pub const FOLDER_TITLE_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum EditFolderMode {
    Add { parent_folder: Option<Folder> },
    Edit { parent_folder: Option<Folder>, folder: Folder },
}

#[derive(Debug, Clone)]
pub enum EditFolderAction {
    TitleChanged(String),
    SaveTapped,
    FolderViewTapped,
    SelectParent(Option<Folder>),
    FolderSelectorDismissed,
}

#[derive(Debug, Clone)]
pub enum EditFolderMutation {
    SetTitle(String),
    SaveStarted,
    SaveSucceeded(Folder),
    SaveFailed(DomainError),
    SetParent(Option<Folder>),
    SetNavigateToSelector(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditFolderState {
    pub mode: EditFolderMode,
    pub folder_title: String,
    pub initial_folder_title: String,
    pub parent_folder: Option<Folder>,
    pub should_navigate_to_folder_selector: bool,
    pub is_processing: bool,
    pub should_dismiss: bool,
    pub alert_message: Option<String>,
    /// The folder created in add mode, once saved.
    pub did_finish_addition: Option<Folder>,
}

impl EditFolderState {
    pub fn new(mode: EditFolderMode) -> Self {
        let (title, parent_folder) = match &mode {
            EditFolderMode::Add { parent_folder } => (String::new(), parent_folder.clone()),
            EditFolderMode::Edit {
                parent_folder,
                folder,
            } => (folder.title.clone(), parent_folder.clone()),
        };
        Self {
            mode,
            folder_title: title.clone(),
            initial_folder_title: title,
            parent_folder,
            should_navigate_to_folder_selector: false,
            is_processing: false,
            should_dismiss: false,
            alert_message: None,
            did_finish_addition: None,
        }
    }

    /// The folder being edited, if any.
    pub fn folder(&self) -> Option<&Folder> {
        match &self.mode {
            EditFolderMode::Add { .. } => None,
            EditFolderMode::Edit { folder, .. } => Some(folder),
        }
    }

    pub fn navigation_title(&self) -> &'static str {
        match self.mode {
            EditFolderMode::Add { .. } => "Add Folder",
            EditFolderMode::Edit { .. } => "Edit Folder",
        }
    }

    /// e.g. `"3 / 10"`.
    pub fn title_limit(&self) -> String {
        format!("{} / {}", self.folder_title.chars().count(), FOLDER_TITLE_LIMIT)
    }

    pub fn is_savable(&self) -> bool {
        let trimmed = self.folder_title.trim();
        if trimmed.is_empty() {
            return false;
        }
        match &self.mode {
            EditFolderMode::Add { .. } => true,
            EditFolderMode::Edit { folder, .. } => {
                let title_changed = trimmed != self.initial_folder_title;
                let parent_changed =
                    folder.parent_folder_id != self.parent_folder.as_ref().map(|p| p.id);
                title_changed || parent_changed
            }
        }
    }

    /// Builds the folder that a save would write.
    fn pending_folder(&self) -> Folder {
        let title = self.folder_title.trim();
        let parent = self.parent_folder.as_ref();
        match &self.mode {
            EditFolderMode::Add { .. } => Folder::new(title, parent),
            EditFolderMode::Edit { folder, .. } => Folder {
                parent_folder_id: parent.map(|p| p.id),
                title: title.to_string(),
                depth: parent.map_or(0, |p| p.depth + 1),
                updated_at: now_millis(),
                ..folder.clone()
            },
        }
    }
}

pub struct EditFolderReducer {
    folders: Arc<dyn FolderRepositoryTrait>,
}

impl EditFolderReducer {
    pub fn new(folders: Arc<dyn FolderRepositoryTrait>) -> Self {
        Self { folders }
    }
}

impl Reducer for EditFolderReducer {
    type Action = EditFolderAction;
    type Mutation = EditFolderMutation;
    type State = EditFolderState;

    fn mutate(&self, state: &EditFolderState, action: EditFolderAction) -> Effect<EditFolderMutation> {
        match action {
            EditFolderAction::TitleChanged(title) => Effect::just(EditFolderMutation::SetTitle(title)),
            EditFolderAction::FolderViewTapped => {
                Effect::just(EditFolderMutation::SetNavigateToSelector(true))
            }
            EditFolderAction::FolderSelectorDismissed => {
                Effect::just(EditFolderMutation::SetNavigateToSelector(false))
            }
            EditFolderAction::SelectParent(parent) => Effect::just(EditFolderMutation::SetParent(parent)),
            EditFolderAction::SaveTapped => {
                if state.is_processing || !state.is_savable() {
                    debug!(processing = state.is_processing, "save ignored");
                    return Effect::none();
                }
                let folder = state.pending_folder();
                let adding = matches!(state.mode, EditFolderMode::Add { .. });
                let repository = self.folders.clone();
                info!(folder_id = %folder.id, adding, title = %folder.title, "saving folder");

                Effect::future(async move {
                    let result = if adding {
                        repository.insert_folder(&folder).await
                    } else {
                        repository.update_folder(&folder).await
                    };
                    match result {
                        Ok(()) => EditFolderMutation::SaveSucceeded(folder),
                        Err(e) => {
                            warn!(folder_id = %folder.id, error = %e, "folder save failed");
                            EditFolderMutation::SaveFailed(e)
                        }
                    }
                })
                .starting_with(EditFolderMutation::SaveStarted)
            }
        }
    }

    fn reduce(&self, mut state: EditFolderState, mutation: EditFolderMutation) -> EditFolderState {
        match mutation {
            EditFolderMutation::SetTitle(title) => {
                state.folder_title = title;
                state.alert_message = None;
            }
            EditFolderMutation::SaveStarted => {
                state.is_processing = true;
                state.alert_message = None;
            }
            EditFolderMutation::SaveSucceeded(folder) => {
                state.is_processing = false;
                state.should_dismiss = true;
                if matches!(state.mode, EditFolderMode::Add { .. }) {
                    state.did_finish_addition = Some(folder);
                }
            }
            EditFolderMutation::SaveFailed(e) => {
                state.is_processing = false;
                state.alert_message = Some(e.to_string());
            }
            EditFolderMutation::SetParent(parent) => {
                state.parent_folder = parent;
                state.alert_message = None;
            }
            EditFolderMutation::SetNavigateToSelector(flag) => {
                state.should_navigate_to_folder_selector = flag;
            }
        }
        state
    }
}
