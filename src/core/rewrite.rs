use crate::domain::model::TransferCandidate;

/// 取最後一個 `/` 之後的 `name:tag`（或 `name@digest`），接到目標倉庫根路徑後
///
/// 多層路徑會被壓縮（`org/team/app` 只剩 `app`），不同命名空間的同名映像會撞在同一個目的地。
pub fn rewrite(source_image: &str, target_registry_root: &str) -> String {
    let suffix = source_image.rsplit('/').next().unwrap_or(source_image);
    format!("{}/{}", target_registry_root, suffix)
}

pub fn rewrite_all(candidates: &mut [TransferCandidate], target_registry_root: &str) {
    for candidate in candidates {
        candidate.destination = Some(rewrite(&candidate.source, target_registry_root));
    }
}
