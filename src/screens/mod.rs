// Clipster Screens
// Business rules of individual screens, each expressed as a Reducer driven by a Store.

pub mod edit_folder;
pub mod folder_selector;
pub mod folder_view;

pub use edit_folder::{EditFolderAction, EditFolderMode, EditFolderReducer, EditFolderState};
pub use folder_selector::{
    FolderSelectorAction, FolderSelectorMode, FolderSelectorReducer, FolderSelectorState,
};
pub use folder_view::{FolderViewAction, FolderViewReducer, FolderViewState};
