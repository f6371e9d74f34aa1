//! Grouping of raw scanner output into logical models

use super::format::format_bytes;
use super::infer::repo_from_snapshot_file_id;
use super::types::{ArtifactFile, GroupType, ModelGroup, ModelSource};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Resolve the repository a file belongs to
///
/// The repository attached by the scanner wins. Snapshot files without one fall
/// back to the repository encoded in the first segment of their id.
fn resolve_repo(file: &ArtifactFile, source: ModelSource) -> Option<String> {
    if let Some(repo) = &file.repo {
        return Some(repo.clone());
    }

    match source {
        ModelSource::HuggingFace => repo_from_snapshot_file_id(&file.id),
        ModelSource::LlamaCpp => None,
    }
}

/// Common type of all files, or `Mixed` when they disagree
fn common_type(files: &[ArtifactFile]) -> GroupType {
    let mut types = files.iter().map(|f| f.file_type);
    let Some(first) = types.next() else {
        return GroupType::Other;
    };

    if types.all(|t| t == first) {
        first.into()
    } else {
        GroupType::Mixed
    }
}

fn latest_modified(files: &[ArtifactFile]) -> DateTime<Utc> {
    files
        .iter()
        .map(|f| f.last_modified)
        .max()
        .unwrap_or_default()
}

fn repo_group(repo: String, files: Vec<ArtifactFile>, source: ModelSource) -> ModelGroup {
    let total_size: u64 = files.iter().map(|f| f.size).sum();
    let subtitle = match files.as_slice() {
        [only] => only.name.clone(),
        _ => format!("{} files", files.len()),
    };
    let tooltip = files
        .iter()
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    ModelGroup {
        id: format!("group-{}", repo),
        repo,
        subtitle: Some(subtitle),
        total_size,
        size_formatted: format_bytes(total_size),
        source,
        group_type: common_type(&files),
        last_modified: latest_modified(&files),
        file_list_tooltip: Some(tooltip),
        files,
    }
}

fn single_file_group(file: ArtifactFile, source: ModelSource) -> ModelGroup {
    ModelGroup {
        id: file.id.clone(),
        repo: file.name.clone(),
        subtitle: None,
        total_size: file.size,
        size_formatted: format_bytes(file.size),
        source,
        group_type: file.file_type.into(),
        last_modified: file.last_modified,
        file_list_tooltip: None,
        files: vec![file],
    }
}

/// Sort groups largest first, keeping encounter order for equal sizes
pub fn sort_by_size(groups: &mut [ModelGroup]) {
    groups.sort_by(|a, b| b.total_size.cmp(&a.total_size));
}

/// Group one scanner's files into models
///
/// Files sharing a repository become one group (in first-seen order); files with
/// no repository each become their own group. The result is sorted by
/// `total_size`, descending.
pub fn group_files(files: Vec<ArtifactFile>, source: ModelSource) -> Vec<ModelGroup> {
    let mut buckets: Vec<(String, Vec<ArtifactFile>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut ungrouped = Vec::new();

    for file in files {
        match resolve_repo(&file, source) {
            Some(repo) => {
                if let Some(&i) = index.get(&repo) {
                    buckets[i].1.push(file);
                } else {
                    index.insert(repo.clone(), buckets.len());
                    buckets.push((repo, vec![file]));
                }
            }
            None => ungrouped.push(file),
        }
    }

    let mut groups: Vec<ModelGroup> = buckets
        .into_iter()
        .map(|(repo, files)| repo_group(repo, files, source))
        .chain(ungrouped.into_iter().map(|f| single_file_group(f, source)))
        .collect();

    sort_by_size(&mut groups);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::ArtifactType;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn file(id: &str, name: &str, size: u64, repo: Option<&str>, secs: i64) -> ArtifactFile {
        ArtifactFile {
            id: id.to_string(),
            name: name.to_string(),
            path: PathBuf::from("/cache").join(name),
            size,
            file_type: ArtifactType::from_file_name(name),
            revision: None,
            last_modified: Utc.timestamp_opt(secs, 0).unwrap(),
            repo: repo.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(group_files(Vec::new(), ModelSource::HuggingFace).is_empty());
    }

    #[test]
    fn test_groups_by_repo() {
        let files = vec![
            file("a/r/model.gguf", "model.gguf", 100, Some("acme/a"), 10),
            file("a/r/config.json", "config.json", 5, Some("acme/a"), 30),
            file("b/r/model.safetensors", "model.safetensors", 40, Some("acme/b"), 20),
        ];

        let groups = group_files(files, ModelSource::HuggingFace);
        assert_eq!(groups.len(), 2);

        let a = &groups[0];
        assert_eq!(a.id, "group-acme/a");
        assert_eq!(a.repo, "acme/a");
        assert_eq!(a.total_size, 105);
        assert_eq!(a.size_formatted, "105 B");
        assert_eq!(a.subtitle.as_deref(), Some("2 files"));
        assert_eq!(a.group_type, GroupType::Mixed);
        assert_eq!(a.last_modified, Utc.timestamp_opt(30, 0).unwrap());
        assert_eq!(a.file_list_tooltip.as_deref(), Some("model.gguf, config.json"));
        assert_eq!(a.source, ModelSource::HuggingFace);

        let b = &groups[1];
        assert_eq!(b.subtitle.as_deref(), Some("model.safetensors"));
        assert_eq!(b.group_type, GroupType::Safetensors);
        assert_eq!(b.file_list_tooltip.as_deref(), Some("model.safetensors"));
    }

    #[test]
    fn test_snapshot_repo_recovered_from_id() {
        let files = vec![file(
            "models--acme--tiny-llm/abc123/model.gguf",
            "model.gguf",
            1,
            None,
            0,
        )];

        let groups = group_files(files, ModelSource::HuggingFace);
        assert_eq!(groups[0].repo, "acme/tiny-llm");
        assert_eq!(groups[0].id, "group-acme/tiny-llm");
    }

    #[test]
    fn test_ungrouped_files_are_singletons() {
        let files = vec![
            file("llamacpp-a.gguf", "a.gguf", 10, None, 0),
            file("llamacpp-b.gguf", "b.gguf", 20, None, 0),
        ];

        let groups = group_files(files, ModelSource::LlamaCpp);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].id, "llamacpp-b.gguf");
        assert_eq!(groups[0].repo, "b.gguf");
        assert_eq!(groups[0].subtitle, None);
        assert_eq!(groups[0].file_list_tooltip, None);
        assert_eq!(groups[0].group_type, GroupType::Gguf);
        assert_eq!(groups[0].files.len(), 1);
    }

    #[test]
    fn test_llamacpp_files_with_same_repo_share_a_group() {
        let files = vec![
            file("llamacpp-q4.gguf", "q4.gguf", 4, Some("org/m-GGUF"), 0),
            file("llamacpp-q8.gguf", "q8.gguf", 8, Some("org/m-GGUF"), 0),
            file("llamacpp-x.gguf", "x.gguf", 1, None, 0),
        ];

        let groups = group_files(files, ModelSource::LlamaCpp);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].repo, "org/m-GGUF");
        assert_eq!(groups[0].total_size, 12);
        assert_eq!(groups[0].group_type, GroupType::Gguf);
    }

    #[test]
    fn test_sorted_largest_first() {
        let files = vec![
            file("llamacpp-a.gguf", "a.gguf", 10, None, 0),
            file("llamacpp-b.gguf", "b.gguf", 10, None, 0),
            file("llamacpp-c.gguf", "c.gguf", 30, None, 0),
        ];

        let groups = group_files(files, ModelSource::LlamaCpp);
        assert_eq!(groups[0].id, "llamacpp-c.gguf");
        assert!(groups.windows(2).all(|w| w[0].total_size >= w[1].total_size));
    }
}
