//! File-based implementation of NoticeRepository

use std::path::Path;
use std::sync::Mutex;

use portal_domain::repository::NoticeRepository;
use portal_store::NoticeStore;
use portal_types::{NewNotice, Notice, NoticeCategory, NoticeUpdate, Result};

use super::lock;

/// Notice repository over `notices.json`
pub struct FileNoticeRepository {
    store: Mutex<NoticeStore>,
}

impl FileNoticeRepository {
    pub fn open(store_dir: &Path) -> Result<Self> {
        Ok(Self {
            store: Mutex::new(NoticeStore::open(store_dir)?),
        })
    }
}

impl NoticeRepository for FileNoticeRepository {
    fn find_by_category(&self, category: NoticeCategory) -> Result<Vec<Notice>> {
        let store = lock(&self.store, "notices")?;
        Ok(store.by_category(category).into_iter().cloned().collect())
    }

    fn find_all(&self) -> Result<Vec<Notice>> {
        let store = lock(&self.store, "notices")?;
        Ok(store.all().into_iter().cloned().collect())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Notice>> {
        Ok(lock(&self.store, "notices")?.get(id).cloned())
    }

    fn create(&self, notice: NewNotice) -> Result<Notice> {
        lock(&self.store, "notices")?.add(notice)
    }

    fn update(&self, id: i64, update: NoticeUpdate) -> Result<Option<Notice>> {
        lock(&self.store, "notices")?.update(id, update)
    }

    fn delete(&self, id: i64) -> Result<bool> {
        lock(&self.store, "notices")?.remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_repository_survives_reopen() {
        let dir = tempdir().unwrap();
        let id = {
            let repo = FileNoticeRepository::open(dir.path()).unwrap();
            repo.create(NewNotice::new(NoticeCategory::Rule, "규정 1", "본문"))
                .unwrap()
                .id
        };
        let repo = FileNoticeRepository::open(dir.path()).unwrap();
        assert_eq!(repo.find_by_id(id).unwrap().unwrap().title, "규정 1");
        assert_eq!(repo.find_by_category(NoticeCategory::Rule).unwrap().len(), 1);
        assert!(repo.find_by_category(NoticeCategory::Edu).unwrap().is_empty());
    }
}
