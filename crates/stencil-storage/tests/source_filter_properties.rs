//! Property-based tests for template copying
//!
//! Files under ignored paths are never copied; every other file is copied
//! byte for byte.

use std::fs;

use proptest::prelude::*;
use stencil_storage::LocalFolderSource;
use tempfile::TempDir;

/// Strategy for relative file paths one or two levels deep
fn file_path_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,8}\\.txt",
        "[a-z]{1,6}/[a-z]{1,8}\\.rs",
        "(\\.git|node_modules)/[a-z]{1,8}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: a copied tree contains exactly the non-ignored files
    #[test]
    fn prop_copy_respects_default_ignores(
        files in prop::collection::btree_set(file_path_strategy(), 1..8),
        content in prop::collection::vec(any::<u8>(), 0..32),
    ) {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        for file in &files {
            let path = source.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, &content).unwrap();
        }

        let copied = LocalFolderSource::new()
            .copy_filtered(source.path(), output.path())
            .unwrap();

        let mut expected = 0;
        for file in &files {
            let ignored = file.starts_with(".git/") || file.starts_with("node_modules/");
            let target = output.path().join(file);
            if ignored {
                prop_assert!(!target.exists());
            } else {
                expected += 1;
                prop_assert_eq!(fs::read(&target).unwrap(), content.clone());
            }
        }
        prop_assert_eq!(copied, expected);
    }
}
