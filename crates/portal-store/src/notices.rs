//! Notice table shared by every board

use std::path::Path;

use chrono::Utc;

use portal_types::{NewNotice, Notice, NoticeCategory, NoticeUpdate, Result};

use crate::table::{Record, Table};

impl Record for Notice {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Persistent store for notices of all categories
pub struct NoticeStore {
    table: Table<Notice>,
}

impl NoticeStore {
    /// Create or load `notices.json` under `store_dir`
    pub fn open(store_dir: &Path) -> Result<Self> {
        Ok(Self {
            table: Table::open(store_dir, "notices.json")?,
        })
    }

    pub fn add(&mut self, new: NewNotice) -> Result<Notice> {
        self.table.insert_with(|id| Notice {
            id,
            title: new.title,
            content: new.content,
            category: new.category,
            image_url: new.image_url,
            created_at: Utc::now(),
        })
    }

    pub fn get(&self, id: i64) -> Option<&Notice> {
        self.table.get(id)
    }

    /// Notices of one category, newest first
    pub fn by_category(&self, category: NoticeCategory) -> Vec<&Notice> {
        let mut notices: Vec<_> = self.table.iter().filter(|n| n.category == category).collect();
        notices.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        notices
    }

    /// All notices, newest first
    pub fn all(&self) -> Vec<&Notice> {
        let mut notices: Vec<_> = self.table.iter().collect();
        notices.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        notices
    }

    pub fn update(&mut self, id: i64, update: NoticeUpdate) -> Result<Option<Notice>> {
        self.table.update(id, |notice| {
            if let Some(title) = update.title {
                notice.title = title;
            }
            if let Some(content) = update.content {
                notice.content = content;
            }
            if let Some(category) = update.category {
                notice.category = category;
            }
            if update.image_url.is_some() {
                notice.image_url = update.image_url;
            }
        })
    }

    pub fn remove(&mut self, id: i64) -> Result<bool> {
        Ok(self.table.remove(id)?.is_some())
    }

    pub fn count(&self) -> usize {
        self.table.len()
    }
}
