//! Grouping candidate files into sessions by filename
//!
//! Recording tools name every stream file of one run with the same trailing
//! segments (`sensorlog_pos_20240101_run1.csv`,
//! `sensorlog_accel_20240101_run1.csv`), so the last two underscore separated
//! segments of the stem serve as the group key.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Files sharing one group key, in first-seen order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGroup {
    pub key: String,
    pub files: Vec<PathBuf>,
}

/// Group key of a file
///
/// The stem (file name without its last extension) is split on `_`. Stems with
/// fewer than three segments are used whole; otherwise the last two segments
/// are joined with `_`.
pub fn derive_group_key(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() < 3 {
        stem
    } else {
        format!("{}_{}", parts[parts.len() - 2], parts[parts.len() - 1])
    }
}

/// Partition `paths` by group key, keeping first-seen order of keys and files
pub fn group_by_session(paths: &[PathBuf]) -> Vec<SessionGroup> {
    let mut groups: Vec<SessionGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for path in paths {
        let key = derive_group_key(path);
        match index.get(&key) {
            Some(&i) => groups[i].files.push(path.clone()),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(SessionGroup {
                    key,
                    files: vec![path.clone()],
                });
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_key_from_trailing_segments() {
        assert_eq!(
            derive_group_key(Path::new("sensorlog_accel_20240101_run1.csv")),
            "20240101_run1"
        );
        assert_eq!(
            derive_group_key(Path::new("/x/y/sensor_log_pos_a_1.csv")),
            "a_1"
        );
    }

    #[test]
    fn test_short_stems_are_used_whole() {
        assert_eq!(derive_group_key(Path::new("abc.csv")), "abc");
        assert_eq!(derive_group_key(Path::new("gps_track.csv")), "gps_track");
    }

    #[test]
    fn test_only_last_extension_is_stripped() {
        assert_eq!(derive_group_key(Path::new("a_b_c.d.csv")), "b_c.d");
    }

    #[test]
    fn test_empty_segments_count() {
        assert_eq!(derive_group_key(Path::new("a__b.csv")), "_b");
    }

    #[test]
    fn test_group_order() {
        let paths: Vec<PathBuf> = [
            "sensorlog_accel_b_2.csv",
            "sensorlog_accel_a_1.csv",
            "sensorlog_pos_b_2.csv",
            "abc.csv",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();

        let groups = group_by_session(&paths);
        let keys: Vec<_> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["b_2", "a_1", "abc"]);
        assert_eq!(
            groups[0].files,
            vec![
                PathBuf::from("sensorlog_accel_b_2.csv"),
                PathBuf::from("sensorlog_pos_b_2.csv")
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_grouping_keeps_every_file(names in prop::collection::vec("[a-z]{1,3}(_[a-z0-9]{1,3}){0,4}", 0..20)) {
            let paths: Vec<PathBuf> = names.iter().map(|n| PathBuf::from(format!("{}.csv", n))).collect();
            let groups = group_by_session(&paths);

            let total: usize = groups.iter().map(|g| g.files.len()).sum();
            prop_assert_eq!(total, paths.len());

            for group in &groups {
                for file in &group.files {
                    prop_assert_eq!(&derive_group_key(file), &group.key);
                }
            }
        }

        #[test]
        fn prop_key_is_suffix_of_stem(stem in "[a-z0-9]{1,4}(_[a-z0-9]{1,4}){0,5}") {
            let key = derive_group_key(Path::new(&format!("{}.csv", stem)));
            prop_assert!(stem.ends_with(&key));
            prop_assert!(key.matches('_').count() <= stem.matches('_').count());
        }
    }
}
