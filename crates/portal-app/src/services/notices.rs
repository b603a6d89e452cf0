//! Notice board use cases
//!
//! Every board of the portal is a notice category. Boards other than
//! `equip_request` are frozen while the portal lock is set.

use std::sync::Arc;

use portal_domain::model::{NoticeContent, RequestContent, RequestStatus};
use portal_domain::repository::NoticeRepository;
use portal_types::{Error, NewNotice, Notice, NoticeCategory, NoticeUpdate, Result};

use super::settings::SettingsService;

#[derive(Clone)]
pub struct NoticeService {
    repo: Arc<dyn NoticeRepository>,
    settings: SettingsService,
}

impl NoticeService {
    pub fn new(repo: Arc<dyn NoticeRepository>, settings: SettingsService) -> Self {
        Self { repo, settings }
    }

    /// Notices newest first, optionally of one category
    pub fn list(&self, category: Option<NoticeCategory>) -> Result<Vec<Notice>> {
        match category {
            Some(category) => self.repo.find_by_category(category),
            None => self.repo.find_all(),
        }
    }

    pub fn get(&self, id: i64) -> Result<Notice> {
        self.repo.find_by_id(id)?.ok_or(Error::not_found("notice", id))
    }

    pub fn create(&self, notice: NewNotice) -> Result<Notice> {
        if notice.title.trim().is_empty() {
            return Err(Error::validation("title must not be empty"));
        }
        self.guard(notice.category)?;
        let created = self.repo.create(notice)?;
        tracing::info!(id = created.id, category = %created.category, "notice created");
        Ok(created)
    }

    pub fn update(&self, id: i64, update: NoticeUpdate) -> Result<Notice> {
        if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(Error::validation("title must not be empty"));
        }
        let current = self.get(id)?;
        self.guard(current.category)?;
        if let Some(category) = update.category {
            self.guard(category)?;
        }
        let updated = self.repo.update(id, update)?.ok_or(Error::not_found("notice", id))?;
        tracing::info!(id, "notice updated");
        Ok(updated)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let current = self.get(id)?;
        self.guard(current.category)?;
        if !self.repo.delete(id)? {
            return Err(Error::not_found("notice", id));
        }
        tracing::info!(id, "notice deleted");
        Ok(())
    }

    /// Change the review state of an equipment request
    pub fn set_request_status(&self, id: i64, status: RequestStatus) -> Result<Notice> {
        let notice = self.get(id)?;
        if notice.category != NoticeCategory::EquipRequest {
            return Err(Error::validation(format!("notice {id} is not an equipment request")));
        }
        let mut request = RequestContent::parse(&notice.content);
        request.status = status;
        let updated = self
            .repo
            .update(id, NoticeUpdate::content(request.to_content()))?
            .ok_or(Error::not_found("notice", id))?;
        tracing::info!(id, status = status.as_str(), "request status changed");
        Ok(updated)
    }

    fn guard(&self, category: NoticeCategory) -> Result<()> {
        if category.is_lockable() {
            self.settings.ensure_unlocked()?;
        }
        Ok(())
    }
}
