//! Folder picker used when moving a clip or a folder.
//!
//! Loading is latest-wins: reopening the picker cancels a fetch still in
//! flight. The breadcrumb is restored to the initial parent once the tree is
//! loaded.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::managers::folder_repository::FolderRepositoryTrait;
use crate::reducer::{Binding, Effect, Reducer};
use crate::services::path_resolver::resolve_path_owned;
use crate::types::errors::DomainError;
use crate::types::folder::Folder;

#[derive(Debug, Clone, PartialEq)]
pub enum FolderSelectorMode {
    /// Picking the folder of a clip. A clip always needs a folder.
    EditClip { parent_folder: Option<Folder> },
    /// Picking the parent of `folder`. The top level is allowed.
    EditFolder {
        folder: Option<Folder>,
        parent_folder: Option<Folder>,
    },
}

impl FolderSelectorMode {
    pub fn folder(&self) -> Option<&Folder> {
        match self {
            FolderSelectorMode::EditClip { .. } => None,
            FolderSelectorMode::EditFolder { folder, .. } => folder.as_ref(),
        }
    }

    pub fn parent_folder(&self) -> Option<&Folder> {
        match self {
            FolderSelectorMode::EditClip { parent_folder }
            | FolderSelectorMode::EditFolder { parent_folder, .. } => parent_folder.as_ref(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum FolderSelectorAction {
    Load,
    OpenSubfolder(Folder),
    NavigateUp,
    SelectTapped,
    FolderAdded(Folder),
}

#[derive(Debug, Clone)]
pub enum FolderSelectorMutation {
    LoadStarted,
    Loaded(Vec<Folder>),
    LoadFailed(DomainError),
    PushFolder(Folder),
    PopFolder,
    FinishSelection(Option<Folder>),
    FolderAdded(Folder),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FolderSelectorState {
    pub mode: FolderSelectorMode,
    pub initial_parent_folder: Option<Folder>,
    /// Top-level folders with their subtrees.
    pub folders: Vec<Folder>,
    /// Breadcrumb from a top-level folder down to the one being shown.
    pub current_path: Vec<Folder>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub did_finish_selection: Option<Folder>,
    pub should_dismiss: bool,
}

impl FolderSelectorState {
    pub fn new(mode: FolderSelectorMode) -> Self {
        let initial_parent_folder = mode.parent_folder().cloned();
        Self {
            mode,
            initial_parent_folder,
            folders: Vec::new(),
            current_path: Vec::new(),
            is_loading: true,
            error_message: None,
            did_finish_selection: None,
            should_dismiss: false,
        }
    }

    /// Folders listed at the current level. Tombstoned folders and the folder
    /// being edited are left out.
    pub fn subfolders(&self) -> Vec<&Folder> {
        let level = match self.current_path.last() {
            Some(folder) => &folder.folders,
            None => &self.folders,
        };
        let editing = self.mode.folder().map(|f| f.id);
        level
            .iter()
            .filter(|f| !f.is_deleted() && Some(f.id) != editing)
            .collect()
    }

    /// `None` means the top level.
    pub fn selected_folder(&self) -> Option<&Folder> {
        self.current_path.last()
    }

    pub fn title(&self) -> &str {
        self.selected_folder().map_or("Home", |f| f.title.as_str())
    }

    pub fn can_navigate_up(&self) -> bool {
        !self.current_path.is_empty()
    }

    pub fn is_add_button_hidden(&self) -> bool {
        matches!(self.mode, FolderSelectorMode::EditFolder { .. })
    }

    pub fn is_selectable(&self) -> bool {
        let selected = self.selected_folder().map(|f| f.id);
        if selected == self.initial_parent_folder.as_ref().map(|f| f.id) {
            return false;
        }
        match self.mode {
            FolderSelectorMode::EditClip { .. } => selected.is_some(),
            FolderSelectorMode::EditFolder { .. } => true,
        }
    }
}

pub struct FolderSelectorReducer {
    folders: Arc<dyn FolderRepositoryTrait>,
}

impl FolderSelectorReducer {
    pub fn new(folders: Arc<dyn FolderRepositoryTrait>) -> Self {
        Self { folders }
    }
}

impl Reducer for FolderSelectorReducer {
    type Action = FolderSelectorAction;
    type Mutation = FolderSelectorMutation;
    type State = FolderSelectorState;

    fn mutate(
        &self,
        state: &FolderSelectorState,
        action: FolderSelectorAction,
    ) -> Effect<FolderSelectorMutation> {
        match action {
            FolderSelectorAction::Load => {
                let repository = self.folders.clone();
                Effect::future(async move {
                    match repository.fetch_top_level_folders().await {
                        Ok(folders) => FolderSelectorMutation::Loaded(folders),
                        Err(e) => {
                            warn!(error = %e, "folder selector load failed");
                            FolderSelectorMutation::LoadFailed(e)
                        }
                    }
                })
                .starting_with(FolderSelectorMutation::LoadStarted)
            }
            FolderSelectorAction::OpenSubfolder(folder) => {
                Effect::just(FolderSelectorMutation::PushFolder(folder))
            }
            FolderSelectorAction::NavigateUp => Effect::just(FolderSelectorMutation::PopFolder),
            FolderSelectorAction::SelectTapped => {
                if !state.is_selectable() {
                    debug!("selection rejected");
                    return Effect::none();
                }
                Effect::just(FolderSelectorMutation::FinishSelection(
                    state.selected_folder().cloned(),
                ))
            }
            FolderSelectorAction::FolderAdded(folder) => {
                Effect::just(FolderSelectorMutation::FolderAdded(folder))
            }
        }
    }

    fn reduce(
        &self,
        mut state: FolderSelectorState,
        mutation: FolderSelectorMutation,
    ) -> FolderSelectorState {
        match mutation {
            // Leaves `error_message` alone so a late start cannot hide a newer failure.
            FolderSelectorMutation::LoadStarted => state.is_loading = true,
            FolderSelectorMutation::Loaded(folders) => {
                state.is_loading = false;
                state.error_message = None;
                if let Some(parent) = &state.initial_parent_folder {
                    match resolve_path_owned(&folders, &parent.id) {
                        Some(path) => {
                            debug!(depth = path.len(), "breadcrumb restored");
                            state.current_path = path;
                        }
                        None => debug!(folder_id = %parent.id, "initial folder not found"),
                    }
                }
                info!(count = folders.len(), "folder selector loaded");
                state.folders = folders;
            }
            FolderSelectorMutation::LoadFailed(e) => {
                state.is_loading = false;
                state.error_message = Some(format!("Failed to load folders: {}", e));
            }
            FolderSelectorMutation::PushFolder(folder) => state.current_path.push(folder),
            FolderSelectorMutation::PopFolder => {
                state.current_path.pop();
            }
            FolderSelectorMutation::FinishSelection(selected) => {
                state.did_finish_selection = selected;
                state.should_dismiss = true;
            }
            FolderSelectorMutation::FolderAdded(folder) => {
                state.did_finish_selection = Some(folder);
            }
        }
        state
    }

    fn binding(&self, action: &FolderSelectorAction) -> Binding {
        match action {
            FolderSelectorAction::Load => Binding::LatestWins("load"),
            _ => Binding::Concurrent,
        }
    }
}
