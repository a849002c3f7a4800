//! Swipe-to-cancel recognition.

/// Direction a swipe has to travel to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwipeDirection {
    /// Towards negative x. The composer's affordance points this way.
    #[default]
    Left,
    /// Towards positive x.
    Right,
    /// Towards negative y.
    Up,
    /// Towards positive y.
    Down,
}

/// Default minimum travel, in points.
pub const DEFAULT_CANCEL_DISTANCE: f32 = 60.0;

/// Default width of the "swipe to cancel" affordance, in points.
pub const DEFAULT_AFFORDANCE_WIDTH: f32 = 160.0;

/// Translates a swipe over the cancel affordance into a cancel request.
///
/// Holds only its configuration; every translation is judged on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CancelGesture {
    direction: SwipeDirection,
    min_distance: f32,
    affordance_width: f32,
}

impl CancelGesture {
    /// Creates a recognizer. Negative or non-finite sizes fall back to
    /// the defaults.
    pub fn new(direction: SwipeDirection, min_distance: f32, affordance_width: f32) -> Self {
        let sanitize = |value: f32, fallback: f32| {
            if value.is_finite() && value >= 0.0 {
                value
            } else {
                fallback
            }
        };

        Self {
            direction,
            min_distance: sanitize(min_distance, DEFAULT_CANCEL_DISTANCE),
            affordance_width: sanitize(affordance_width, DEFAULT_AFFORDANCE_WIDTH),
        }
    }

    /// Configured direction.
    pub fn direction(&self) -> SwipeDirection {
        self.direction
    }

    /// Minimum travel along the direction.
    pub fn min_distance(&self) -> f32 {
        self.min_distance
    }

    /// Width of the touch target the recognizer is bound to.
    pub fn affordance_width(&self) -> f32 {
        self.affordance_width
    }

    /// Travel needed to cancel: `min_distance`, capped at the affordance
    /// width so a swipe across the whole affordance always counts. A zero
    /// width leaves `min_distance` uncapped.
    pub fn threshold(&self) -> f32 {
        if self.affordance_width > 0.0 {
            self.min_distance.min(self.affordance_width)
        } else {
            self.min_distance
        }
    }

    /// Whether a swipe with translation `(dx, dy)` requests cancellation.
    ///
    /// The dominant axis must match the direction and the travel along it
    /// must reach [`threshold`](Self::threshold).
    pub fn recognizes(&self, dx: f32, dy: f32) -> bool {
        if !dx.is_finite() || !dy.is_finite() {
            return false;
        }

        let (along, across) = match self.direction {
            SwipeDirection::Left => (-dx, dy),
            SwipeDirection::Right => (dx, dy),
            SwipeDirection::Up => (-dy, dx),
            SwipeDirection::Down => (dy, dx),
        };

        along > 0.0 && along >= self.threshold() && along > across.abs()
    }
}

impl Default for CancelGesture {
    fn default() -> Self {
        Self::new(
            SwipeDirection::Left,
            DEFAULT_CANCEL_DISTANCE,
            DEFAULT_AFFORDANCE_WIDTH,
        )
    }
}
