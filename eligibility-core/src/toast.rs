use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
    pub created_at: Instant,
}

impl Toast {
    pub fn is_destructive(&self) -> bool {
        self.variant == ToastVariant::Destructive
    }
}

/// Bounded queue of transient notifications, newest last.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    limit: usize,
    next_id: u64,
}

impl ToastQueue {
    pub fn new(limit: usize) -> Self {
        Self {
            toasts: VecDeque::new(),
            limit: limit.max(1),
            next_id: 1,
        }
    }

    pub fn success(&mut self, description: impl Into<String>) -> u64 {
        self.push("Success", description, ToastVariant::Default)
    }

    pub fn error(&mut self, description: impl Into<String>) -> u64 {
        self.push("Error", description, ToastVariant::Destructive)
    }

    pub fn push(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        variant: ToastVariant,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.toasts.push_back(Toast {
            id,
            title: title.into(),
            description: description.into(),
            variant,
            created_at: Instant::now(),
        });

        while self.toasts.len() > self.limit {
            self.toasts.pop_front();
        }

        id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// Drops toasts older than `ttl` as of `now`. Returns how many were removed.
    pub fn expire(&mut self, now: Instant, ttl: Duration) -> usize {
        let before = self.toasts.len();
        self.toasts
            .retain(|t| now.saturating_duration_since(t.created_at) < ttl);
        before - self.toasts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(3)
    }
}
