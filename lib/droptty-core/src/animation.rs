use crate::event::TimerToken;
use crate::platform::{Bounds, Position, Size};
use std::time::{Duration, Instant};

/// How long a show or hide transition holds the animation lock.
pub const ANIMATION_DURATION: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Show,
    Hide,
}

/// The overlay's animation lock. While a transition is in flight no other transition may
/// start and resizes are not recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transition {
    #[default]
    Idle,
    Animating {
        direction: Direction,
        token: TimerToken,
    },
}

impl Transition {
    pub fn is_animating(&self) -> bool {
        matches!(self, Transition::Animating { .. })
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            Transition::Idle => None,
            Transition::Animating { direction, .. } => Some(*direction),
        }
    }

    pub fn token(&self) -> Option<TimerToken> {
        match self {
            Transition::Idle => None,
            Transition::Animating { token, .. } => Some(*token),
        }
    }

    pub fn begin(&mut self, direction: Direction, token: TimerToken) {
        *self = Transition::Animating { direction, token };
    }

    /// Ends the transition if `token` is the one it is waiting for.
    pub fn complete(&mut self, token: TimerToken) -> Option<Direction> {
        match *self {
            Transition::Animating {
                direction,
                token: expected,
            } if expected == token => {
                *self = Transition::Idle;
                Some(direction)
            }
            _ => None,
        }
    }

    /// Drops the transition, returning the token of the timer that should be cancelled.
    pub fn cancel(&mut self) -> Option<TimerToken> {
        let token = self.token();
        *self = Transition::Idle;
        token
    }
}

/// Trait for types that can be interpolated.
pub trait Interpolatable: Sized + Clone {
    fn interpolate(&self, target: &Self, t: f64) -> Self;
}

impl Interpolatable for Bounds {
    fn interpolate(&self, target: &Self, t: f64) -> Self {
        let lerp = |from: f64, to: f64| (from + (to - from) * t).round();
        Bounds {
            position: Position {
                x: lerp(self.position.x as f64, target.position.x as f64) as i32,
                y: lerp(self.position.y as f64, target.position.y as f64) as i32,
            },
            size: Size {
                width: lerp(self.size.width as f64, target.size.width as f64) as u32,
                height: lerp(self.size.height as f64, target.size.height as f64) as u32,
            },
        }
    }
}

pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - 4.0 * (1.0 - t) * (1.0 - t) * (1.0 - t)
    }
}

/// Drives a value from `from` to `to` over `duration`, for hosts that animate bounds
/// themselves.
#[derive(Debug, Clone)]
pub struct Animator<T>
where
    T: Interpolatable,
{
    from: T,
    to: T,
    duration: Duration,
    start_time: Instant,
    ease_fn: fn(f64) -> f64,
    animating: bool,
}

impl<T> Animator<T>
where
    T: Interpolatable,
{
    pub fn start(from: T, to: T, duration: Duration, now: Instant) -> Self {
        Self {
            from,
            to,
            duration,
            start_time: now,
            ease_fn: ease_in_out_cubic,
            animating: true,
        }
    }

    /// Returns the value for `now`, or None once the animation has delivered its final value.
    pub fn update(&mut self, now: Instant) -> Option<T> {
        if !self.animating {
            return None;
        }

        if self.duration.is_zero() {
            self.animating = false;
            return Some(self.to.clone());
        }

        let elapsed = now.saturating_duration_since(self.start_time);
        let t = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0);
        if t >= 1.0 {
            self.animating = false;
            return Some(self.to.clone());
        }

        Some(self.from.interpolate(&self.to, (self.ease_fn)(t)))
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn target(&self) -> &T {
        &self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_ignores_stale_tokens() {
        let mut transition = Transition::default();
        transition.begin(Direction::Hide, TimerToken(3));

        assert_eq!(transition.complete(TimerToken(2)), None);
        assert!(transition.is_animating());
        assert_eq!(transition.complete(TimerToken(3)), Some(Direction::Hide));
        assert_eq!(transition, Transition::Idle);
        assert_eq!(transition.complete(TimerToken(3)), None);
    }

    #[test]
    fn test_transition_cancel_returns_token() {
        let mut transition = Transition::default();
        assert_eq!(transition.cancel(), None);

        transition.begin(Direction::Show, TimerToken(7));
        assert_eq!(transition.direction(), Some(Direction::Show));
        assert_eq!(transition.cancel(), Some(TimerToken(7)));
        assert!(!transition.is_animating());
    }

    #[test]
    fn test_easing_endpoints() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(0.5), 0.5);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
    }

    #[test]
    fn test_animator_reaches_target() {
        let from = Bounds::new(1919, 0, 768, 1080);
        let to = Bounds::new(1152, 0, 768, 1080);
        let start = Instant::now();
        let mut animator = Animator::start(from.clone(), to.clone(), ANIMATION_DURATION, start);

        assert_eq!(animator.update(start), Some(from));

        let halfway = animator.update(start + ANIMATION_DURATION / 2).unwrap();
        assert_eq!(halfway.position.x, (1919 + 1152) / 2 + 1);

        assert_eq!(animator.update(start + ANIMATION_DURATION), Some(to));
        assert!(!animator.is_animating());
        assert_eq!(animator.update(start + ANIMATION_DURATION * 2), None);
    }
}
