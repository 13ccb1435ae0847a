//! Property-based tests for the edit-folder save rule.

use clipster::screens::edit_folder::{EditFolderMode, EditFolderState};
use clipster::types::folder::Folder;
use proptest::prelude::*;

fn arb_blank() -> impl Strategy<Value = String> {
    "[ \t\n\r]{0,12}"
}

fn arb_title() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9 ]{0,9}"
}

fn edit_state(title: &str) -> (EditFolderState, Folder) {
    let parent = Folder::new("Parent", None);
    let folder = Folder::new(title, Some(&parent));
    let state = EditFolderState::new(EditFolderMode::Edit {
        parent_folder: Some(parent),
        folder,
    });
    (state, Folder::new("Elsewhere", None))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn blank_titles_are_never_savable(blank in arb_blank(), original in arb_title()) {
        let mut add = EditFolderState::new(EditFolderMode::Add { parent_folder: None });
        add.folder_title = blank.clone();
        prop_assert!(!add.is_savable());

        let (mut edit, elsewhere) = edit_state(original.trim());
        edit.folder_title = blank;
        edit.parent_folder = Some(elsewhere);
        prop_assert!(!edit.is_savable());
    }

    #[test]
    fn add_mode_accepts_any_non_blank_title(title in arb_title(), pad in arb_blank()) {
        let mut add = EditFolderState::new(EditFolderMode::Add { parent_folder: None });
        add.folder_title = format!("{}{}{}", pad, title, pad);
        prop_assert!(add.is_savable());
    }

    #[test]
    fn unchanged_edit_is_not_savable(title in arb_title(), pad in arb_blank()) {
        let trimmed = title.trim().to_string();
        let (mut edit, _) = edit_state(&trimmed);
        edit.folder_title = format!("{}{}", trimmed, pad);
        prop_assert!(!edit.is_savable());
    }

    #[test]
    fn edit_with_new_parent_is_savable(title in arb_title()) {
        let trimmed = title.trim().to_string();
        let (mut edit, elsewhere) = edit_state(&trimmed);
        edit.parent_folder = Some(elsewhere);
        prop_assert!(edit.is_savable());
    }
}
