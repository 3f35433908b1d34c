//! Fade descriptions handed to the view presenter.
//!
//! The state machine owns the timing window; the presenter only draws. A
//! [`Fade`] carries everything the presenter needs to animate one view's
//! opacity for one window.

use std::time::Duration;

use serde::Deserialize;

/// Opacity curve of a fade, named after its CSS timing function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    /// Quadratic, accelerating.
    EaseIn,
    /// Quadratic, decelerating.
    EaseOut,
    /// `EaseIn` for the first half of the window, `EaseOut` for the second.
    EaseInOut,
}

impl Easing {
    /// Maps window progress to curve progress. Both run over `0.0..=1.0`;
    /// progress outside that range is clamped first.
    pub fn apply(&self, progress: f32) -> f32 {
        let p = progress.clamp(0.0, 1.0);
        let accelerate = |x: f32| x * x;
        let decelerate = |x: f32| 1.0 - accelerate(1.0 - x);
        match self {
            Easing::Linear => p,
            Easing::EaseIn => accelerate(p),
            Easing::EaseOut => decelerate(p),
            Easing::EaseInOut if p < 0.5 => accelerate(2.0 * p) / 2.0,
            Easing::EaseInOut => 0.5 + decelerate(2.0 * p - 1.0) / 2.0,
        }
    }

    /// CSS timing-function name, for presenters that delegate to CSS.
    pub fn css_name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
        }
    }
}

/// An opacity animation over one transition window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    /// Opacity at the start of the window.
    pub from: f32,
    /// Opacity at the end of the window.
    pub to: f32,
    pub duration: Duration,
    pub easing: Easing,
}

impl Fade {
    /// Fade a visible view out.
    pub fn out(duration: Duration, easing: Easing) -> Self {
        Self {
            from: 1.0,
            to: 0.0,
            duration,
            easing,
        }
    }

    /// Fade a freshly shown view in.
    pub fn in_(duration: Duration, easing: Easing) -> Self {
        Self {
            from: 0.0,
            to: 1.0,
            duration,
            easing,
        }
    }

    /// Opacity after `elapsed` time into the window.
    pub fn opacity_at(&self, elapsed: Duration) -> f32 {
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f32() / self.duration.as_secs_f32()
        };
        let eased = self.easing.apply(progress);
        self.from + (self.to - self.from) * eased
    }

    /// CSS `transition` value equivalent to this fade.
    pub fn css_transition(&self) -> String {
        format!(
            "opacity {}ms {}",
            self.duration.as_millis(),
            self.easing.css_name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_boundaries() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
        ] {
            assert_eq!(easing.apply(0.0), 0.0, "{:?} at 0", easing);
            assert_eq!(easing.apply(1.0), 1.0, "{:?} at 1", easing);
        }
        assert_eq!(Easing::EaseInOut.apply(0.5), 0.5);
        assert!(Easing::EaseInOut.apply(0.25) < 0.25);
        assert!(Easing::EaseInOut.apply(0.75) > 0.75);
        assert!(Easing::EaseIn.apply(0.5) < 0.5);
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
        assert_eq!(Easing::Linear.apply(1.5), 1.0);
    }

    #[test]
    fn fade_progress() {
        let fade = Fade::out(Duration::from_millis(300), Easing::Linear);
        assert_eq!(fade.opacity_at(Duration::ZERO), 1.0);
        assert!((fade.opacity_at(Duration::from_millis(150)) - 0.5).abs() < 0.0001);
        assert_eq!(fade.opacity_at(Duration::from_millis(600)), 0.0);

        let instant = Fade::in_(Duration::ZERO, Easing::EaseInOut);
        assert_eq!(instant.opacity_at(Duration::ZERO), 1.0);
    }

    #[test]
    fn css_transition_string() {
        let fade = Fade::in_(Duration::from_millis(300), Easing::EaseInOut);
        assert_eq!(fade.css_transition(), "opacity 300ms ease-in-out");
    }
}
