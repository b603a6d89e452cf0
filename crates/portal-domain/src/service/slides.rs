//! Digital board slide deck navigation

use std::time::Duration;

use serde::Serialize;

use portal_types::{Notice, NoticeCategory};

use crate::model::{NoticeContent, SlideContent};

/// Time each slide stays on screen while playing
pub const AUTOPLAY_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub notice_id: i64,
    pub title: String,
    pub text: String,
    pub image_url: Option<String>,
}

impl Slide {
    pub fn from_notice(notice: &Notice) -> Self {
        let content = SlideContent::parse(&notice.content);
        Self {
            notice_id: notice.id,
            title: notice.title.clone(),
            text: content.text,
            image_url: notice.image_url.clone().or(content.image_url),
        }
    }
}

/// Ordered slides with a cursor
#[derive(Debug, Clone, Default)]
pub struct SlideDeck {
    slides: Vec<Slide>,
    current: usize,
    playing: bool,
}

impl SlideDeck {
    /// Deck over the `digital_board` notices in the given order, playing
    pub fn from_notices(notices: &[Notice]) -> Self {
        Self {
            slides: notices
                .iter()
                .filter(|n| n.category == NoticeCategory::DigitalBoard)
                .map(Slide::from_notice)
                .collect(),
            current: 0,
            playing: true,
        }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn current(&self) -> Option<&Slide> {
        self.slides.get(self.current)
    }

    pub fn next(&mut self) {
        if !self.slides.is_empty() {
            self.current = (self.current + 1) % self.slides.len();
        }
    }

    pub fn previous(&mut self) {
        if !self.slides.is_empty() {
            self.current = (self.current + self.slides.len() - 1) % self.slides.len();
        }
    }

    /// Jump to slide `index`; out-of-range indices are ignored
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.slides.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn toggle_playing(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    /// Autoplay step: advance when playing
    pub fn tick(&mut self) {
        if self.playing {
            self.next();
        }
    }

    /// Cursor correction for a deck of `len` slides about to lose one.
    /// When the cursor sits on the last slide it moves to the new last one.
    pub fn after_delete(&mut self, len: usize) {
        if self.current + 1 >= len {
            self.current = len.saturating_sub(2);
        }
    }

    /// Remove the slide stored in `notice_id`
    pub fn remove(&mut self, notice_id: i64) -> bool {
        let Some(position) = self.slides.iter().position(|s| s.notice_id == notice_id) else {
            return false;
        };
        self.after_delete(self.slides.len());
        self.slides.remove(position);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn deck(count: i64) -> SlideDeck {
        let notices: Vec<Notice> = (1..=count)
            .map(|id| Notice {
                id,
                title: format!("slide {id}"),
                content: format!(r#"{{"text":"본문 {id}","imageUrl":"/uploads/{id}.png"}}"#),
                category: NoticeCategory::DigitalBoard,
                image_url: None,
                created_at: Utc::now(),
            })
            .collect();
        SlideDeck::from_notices(&notices)
    }

    #[test]
    fn test_navigation_wraps() {
        let mut deck = deck(3);
        deck.previous();
        assert_eq!(deck.index(), 2);
        deck.next();
        assert_eq!(deck.index(), 0);
        assert!(deck.select(1));
        assert!(!deck.select(3));
        assert_eq!(deck.current().unwrap().title, "slide 2");
        assert_eq!(deck.current().unwrap().image_url.as_deref(), Some("/uploads/2.png"));
    }

    #[test]
    fn test_delete_last_moves_back() {
        let mut deck = deck(3);
        deck.select(2);
        assert!(deck.remove(3));
        assert_eq!(deck.index(), 1);
        assert_eq!(deck.len(), 2);

        deck.select(0);
        assert!(deck.remove(2));
        assert_eq!(deck.index(), 0);
    }

    #[test]
    fn test_delete_only_slide() {
        let mut deck = deck(1);
        assert!(deck.remove(1));
        assert!(deck.is_empty());
        assert_eq!(deck.index(), 0);
        assert!(deck.current().is_none());
        deck.next();
        assert_eq!(deck.index(), 0);
    }

    #[test]
    fn test_tick_respects_pause() {
        let mut deck = deck(2);
        deck.tick();
        assert_eq!(deck.index(), 1);
        assert!(!deck.toggle_playing());
        deck.tick();
        assert_eq!(deck.index(), 1);
        assert_eq!(AUTOPLAY_INTERVAL, Duration::from_secs(5));
    }
}
