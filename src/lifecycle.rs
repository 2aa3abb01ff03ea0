// Copyright (c) 2026 rezky_nightky

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Running,
    Exiting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    PointerMoved { x: u16, y: u16 },
    KeyPressed,
    Clicked,
}

/// How far the pointer may drift from where it was first seen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPolicy {
    AnyMovement,
    /// Exit once either axis moves strictly more than this many cells.
    DeadZone(u16),
}

impl PointerPolicy {
    pub fn from_dead_zone(cells: u16) -> Self {
        if cells == 0 {
            PointerPolicy::AnyMovement
        } else {
            PointerPolicy::DeadZone(cells)
        }
    }

    fn threshold(self) -> u16 {
        match self {
            PointerPolicy::AnyMovement => 0,
            PointerPolicy::DeadZone(t) => t,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Lifecycle {
    state: State,
    policy: PointerPolicy,
    anchor: Option<(u16, u16)>,
}

impl Lifecycle {
    pub fn new(policy: PointerPolicy) -> Self {
        Self {
            state: State::Running,
            policy,
            anchor: None,
        }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    /// Feeds one input event. Returns true if this event ended the run.
    pub fn observe(&mut self, ev: InputEvent) -> bool {
        match ev {
            InputEvent::KeyPressed => self.request_exit("key press"),
            InputEvent::Clicked => self.request_exit("click"),
            InputEvent::PointerMoved { x, y } => {
                let Some((ax, ay)) = self.anchor else {
                    // terminals report no pointer until it moves
                    self.anchor = Some((x, y));
                    return false;
                };
                let t = self.policy.threshold();
                if x.abs_diff(ax) > t || y.abs_diff(ay) > t {
                    self.request_exit("pointer movement")
                } else {
                    false
                }
            }
        }
    }

    pub fn request_exit(&mut self, reason: &str) -> bool {
        if self.state == State::Exiting {
            return false;
        }
        log::info!("exiting on {}", reason);
        self.state = State::Exiting;
        true
    }
}
