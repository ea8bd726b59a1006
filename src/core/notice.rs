//! Transient notifications ("toasts").
//!
//! A single slot: showing a notice replaces whatever was there. A notice can
//! later be replaced in place by id, which is how a loading notice turns
//! into a success or error notice.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Notices {
    current: Option<Notice>,
    next_id: u64,
}

impl Notices {
    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    pub fn show(&mut self, kind: NoticeKind, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.current = Some(Notice {
            id,
            kind,
            message: message.into(),
        });
        id
    }

    pub fn loading(&mut self, message: impl Into<String>) -> u64 {
        self.show(NoticeKind::Loading, message)
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.show(NoticeKind::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.show(NoticeKind::Error, message)
    }

    /// Whether the notice with `id` is the one on screen.
    pub fn is_showing(&self, id: u64) -> bool {
        self.current.as_ref().is_some_and(|n| n.id == id)
    }

    /// Whether a loading notice is on screen.
    pub fn is_loading(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|n| n.kind == NoticeKind::Loading)
    }

    /// Rewrites the notice with `id` in place. Returns `false` and leaves the
    /// slot untouched if something else has taken it since.
    pub fn replace(&mut self, id: u64, kind: NoticeKind, message: impl Into<String>) -> bool {
        match self.current.as_mut() {
            Some(notice) if notice.id == id => {
                notice.kind = kind;
                notice.message = message.into();
                true
            }
            _ => false,
        }
    }

    /// Removes the notice if `id` is the one on screen.
    pub fn dismiss(&mut self, id: u64) {
        if self.is_showing(id) {
            self.current = None;
        }
    }
}
