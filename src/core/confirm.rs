//! Two-press confirmation for destructive operations.
//!
//! | state       | event                         | next        | effect      |
//! |-------------|-------------------------------|-------------|-------------|
//! | Idle        | Press(id)                     | Armed(id)   |             |
//! | Armed(id)   | Press(id), within timeout     | Idle        | Execute(id) |
//! | Armed(id)   | Press(id), after timeout      | Armed(id)   | re-armed    |
//! | Armed(a)    | Press(b)                      | Armed(b)    |             |
//! | any         | Navigate                      | Idle        |             |
//! | Armed(id)   | Tick(now), after timeout      | Idle        |             |

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConfirmState {
    #[default]
    Idle,
    Armed { id: String, at: DateTime<Utc> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmEvent {
    Press { id: String, now: DateTime<Utc> },
    Navigate,
    Tick(DateTime<Utc>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", content = "id", rename_all = "snake_case")]
pub enum ConfirmEffect {
    None,
    Armed(String),
    Execute(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirm {
    state: ConfirmState,
    timeout: Duration,
}

impl DeleteConfirm {
    pub fn new(timeout: Duration) -> Self {
        Self {
            state: ConfirmState::Idle,
            timeout,
        }
    }

    /// Resume from a previously saved state.
    pub fn with_state(state: ConfirmState, timeout: Duration) -> Self {
        Self { state, timeout }
    }

    pub fn state(&self) -> &ConfirmState {
        &self.state
    }

    pub fn is_armed_for(&self, id: &str) -> bool {
        matches!(&self.state, ConfirmState::Armed { id: armed, .. } if armed == id)
    }

    pub fn handle(&mut self, event: ConfirmEvent) -> ConfirmEffect {
        let (next, effect) = match (&self.state, event) {
            (_, ConfirmEvent::Navigate) => (ConfirmState::Idle, ConfirmEffect::None),
            (ConfirmState::Idle, ConfirmEvent::Tick(_)) => (ConfirmState::Idle, ConfirmEffect::None),
            (ConfirmState::Armed { at, .. }, ConfirmEvent::Tick(now)) => {
                if now - *at > self.timeout {
                    (ConfirmState::Idle, ConfirmEffect::None)
                } else {
                    (self.state.clone(), ConfirmEffect::None)
                }
            }
            (ConfirmState::Armed { id: armed, at }, ConfirmEvent::Press { id, now })
                if *armed == id && now - *at <= self.timeout =>
            {
                (ConfirmState::Idle, ConfirmEffect::Execute(id))
            }
            (_, ConfirmEvent::Press { id, now }) => (
                ConfirmState::Armed {
                    id: id.clone(),
                    at: now,
                },
                ConfirmEffect::Armed(id),
            ),
        };
        self.state = next;
        effect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    fn press(id: &str, secs: i64) -> ConfirmEvent {
        ConfirmEvent::Press {
            id: id.into(),
            now: t(secs),
        }
    }

    #[test]
    fn second_press_executes() {
        let mut c = DeleteConfirm::new(Duration::seconds(10));
        assert_eq!(c.handle(press("s1", 0)), ConfirmEffect::Armed("s1".into()));
        assert!(c.is_armed_for("s1"));
        assert_eq!(c.handle(press("s1", 3)), ConfirmEffect::Execute("s1".into()));
        assert_eq!(c.state(), &ConfirmState::Idle);
    }

    #[test]
    fn pressing_another_item_rearms() {
        let mut c = DeleteConfirm::new(Duration::seconds(10));
        c.handle(press("a", 0));
        assert_eq!(c.handle(press("b", 1)), ConfirmEffect::Armed("b".into()));
        assert!(c.is_armed_for("b"));
    }

    #[test]
    fn navigation_disarms() {
        let mut c = DeleteConfirm::new(Duration::seconds(10));
        c.handle(press("a", 0));
        c.handle(ConfirmEvent::Navigate);
        assert_eq!(c.handle(press("a", 1)), ConfirmEffect::Armed("a".into()));
    }

    #[test]
    fn timeout_disarms() {
        let mut c = DeleteConfirm::new(Duration::seconds(10));
        c.handle(press("a", 0));
        c.handle(ConfirmEvent::Tick(t(5)));
        assert!(c.is_armed_for("a"));
        c.handle(ConfirmEvent::Tick(t(11)));
        assert_eq!(c.state(), &ConfirmState::Idle);
    }

    #[test]
    fn late_second_press_only_rearms() {
        let mut c = DeleteConfirm::new(Duration::seconds(10));
        c.handle(press("a", 0));
        assert_eq!(c.handle(press("a", 30)), ConfirmEffect::Armed("a".into()));
    }
}
