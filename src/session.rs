use crate::identity::Identity;
use crate::models::{LoadStatus, Navigation, SaveState, SessionView, Tracker, WEEK_COUNT};
use crate::persistence::{PersistenceGate, SaveMode, SaveSnapshot};
use std::time::Duration;

/// Everything the signed-in view works against: who is signed in, their
/// tracker, the week on screen and the persistence state.
pub struct Session {
    user: Option<Identity>,
    tracker: Tracker,
    current_week: usize,
    load_status: Option<LoadStatus>,
    pub(crate) gate: PersistenceGate,
}

impl Session {
    pub fn new(debounce: Duration) -> Self {
        Self {
            user: None,
            tracker: Tracker::default(),
            current_week: 0,
            load_status: None,
            gate: PersistenceGate::new(debounce),
        }
    }

    pub fn user(&self) -> Option<&Identity> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.id.as_str())
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn current_week(&self) -> usize {
        self.current_week
    }

    pub fn is_dirty(&self) -> bool {
        self.gate.is_dirty()
    }

    pub fn save_state(&self) -> SaveState {
        self.gate.state()
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            user: self.user.clone(),
            current_week: self.current_week,
            dirty: self.is_dirty(),
            state: self.save_state(),
            load: self.load_status.clone(),
            tracker: self.tracker.clone(),
        }
    }

    pub fn navigate(&mut self, navigation: Navigation) -> usize {
        let last = WEEK_COUNT - 1;
        self.current_week = match navigation {
            Navigation::Previous => self.current_week.saturating_sub(1),
            Navigation::Next => (self.current_week + 1).min(last),
            Navigation::Select { week } => week.min(last),
        };
        self.current_week
    }

    /// Starts a session for `identity`; a different user starts from a
    /// blank tracker.
    pub(crate) fn begin(&mut self, identity: Identity) {
        if self.user.as_ref() != Some(&identity) {
            self.tracker = Tracker::default();
            self.current_week = 0;
        }
        self.user = Some(identity);
        self.load_status = None;
        self.gate.reset();
    }

    pub(crate) fn finish_load(&mut self, tracker: Option<Tracker>, status: LoadStatus) {
        if let Some(tracker) = tracker {
            self.tracker = tracker;
        }
        self.load_status = Some(status);
        self.gate.reset();
    }

    pub(crate) fn clear(&mut self) {
        self.user = None;
        self.tracker = Tracker::default();
        self.current_week = 0;
        self.load_status = None;
        self.gate.reset();
    }

    pub(crate) fn replace_tracker(&mut self, tracker: Tracker) {
        self.tracker = tracker;
        self.gate.mark_dirty();
    }

    pub(crate) fn save_snapshot(&self, mode: SaveMode) -> Option<SaveSnapshot> {
        let user = self.user.as_ref()?;
        if mode == SaveMode::IfDirty && !self.is_dirty() {
            return None;
        }
        Some(SaveSnapshot {
            user_id: user.id.clone(),
            tracker: self.tracker.clone(),
            revision: self.gate.revision(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::DayEdit;

    fn session() -> Session {
        Session::new(Duration::from_millis(1000))
    }

    fn identity(id: &str) -> Identity {
        Identity {
            id: id.into(),
            display_name: id.to_uppercase(),
        }
    }

    #[test]
    fn navigation_is_clamped() {
        let mut session = session();
        assert_eq!(session.navigate(Navigation::Previous), 0);
        assert_eq!(session.navigate(Navigation::Select { week: 40 }), 11);
        assert_eq!(session.navigate(Navigation::Next), 11);
        assert_eq!(session.navigate(Navigation::Select { week: 4 }), 4);
        assert_eq!(session.navigate(Navigation::Previous), 3);
    }

    #[test]
    fn snapshot_requires_user_and_edits() {
        let mut session = session();
        assert!(session.save_snapshot(SaveMode::Always).is_none());

        session.begin(identity("alice"));
        assert!(session.save_snapshot(SaveMode::IfDirty).is_none());
        assert!(session.save_snapshot(SaveMode::Always).is_some());

        let next = session.tracker().set_field(0, 0, DayEdit::Done(true)).unwrap();
        session.replace_tracker(next);
        let snapshot = session.save_snapshot(SaveMode::IfDirty).unwrap();
        assert_eq!(snapshot.user_id, "alice");
        assert!(snapshot.tracker.week(0).unwrap().days[0].done);
    }

    #[test]
    fn switching_user_drops_previous_tracker() {
        let mut session = session();
        session.begin(identity("alice"));
        let next = session.tracker().set_field(2, 1, DayEdit::Notes("x".into())).unwrap();
        session.replace_tracker(next);
        session.navigate(Navigation::Select { week: 5 });

        session.begin(identity("bob"));
        assert_eq!(session.tracker(), &Tracker::default());
        assert_eq!(session.current_week(), 0);
        assert!(!session.is_dirty());
    }

    #[test]
    fn clear_forgets_everything() {
        let mut session = session();
        session.begin(identity("alice"));
        session.finish_load(None, LoadStatus::Fresh);
        session.clear();
        assert!(session.user().is_none());
        assert!(session.view().load.is_none());
        assert_eq!(session.view().state, SaveState::Clean);
    }
}
