#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Finger moved right: previous week.
    Right,
    /// Finger moved left: next week.
    Left,
}

/// Tracks one touch (or mouse drag) at a time over the content area.
#[derive(Debug)]
pub struct SwipeTracker {
    threshold: f64,
    start_x: Option<f64>,
}

impl SwipeTracker {
    pub fn new(threshold_px: u16) -> Self {
        Self { threshold: f64::from(threshold_px), start_x: None }
    }

    pub fn touch_start(&mut self, x: f64, enabled: bool) {
        if enabled {
            self.start_x = Some(x);
        }
    }

    /// Completes the gesture. Distances shorter than the threshold, or an
    /// end without a recorded start, produce nothing.
    pub fn touch_end(&mut self, x: f64, enabled: bool) -> Option<SwipeDirection> {
        if !enabled {
            return None;
        }
        let start = self.start_x.take()?;
        classify(x - start, self.threshold)
    }
}

pub fn classify(distance: f64, threshold: f64) -> Option<SwipeDirection> {
    if distance.abs() < threshold {
        None
    } else if distance > 0.0 {
        Some(SwipeDirection::Right)
    } else {
        Some(SwipeDirection::Left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swipe(from: f64, to: f64) -> Option<SwipeDirection> {
        let mut tracker = SwipeTracker::new(50);
        tracker.touch_start(from, true);
        tracker.touch_end(to, true)
    }

    #[test]
    fn threshold_boundaries() {
        assert_eq!(swipe(100.0, 149.0), None);
        assert_eq!(swipe(100.0, 150.0), Some(SwipeDirection::Right));
        assert_eq!(swipe(100.0, 151.0), Some(SwipeDirection::Right));
        assert_eq!(swipe(100.0, 51.0), None);
        assert_eq!(swipe(100.0, 49.0), Some(SwipeDirection::Left));
    }

    #[test]
    fn disabled_tracker_ignores_gestures() {
        let mut tracker = SwipeTracker::new(50);
        tracker.touch_start(0.0, false);
        assert_eq!(tracker.touch_end(200.0, true), None);

        tracker.touch_start(0.0, true);
        assert_eq!(tracker.touch_end(200.0, false), None);
    }

    #[test]
    fn end_without_start_is_ignored() {
        let mut tracker = SwipeTracker::new(50);
        assert_eq!(tracker.touch_end(300.0, true), None);
        tracker.touch_start(0.0, true);
        assert_eq!(tracker.touch_end(-60.0, true), Some(SwipeDirection::Left));
        // the start is consumed by the first end
        assert_eq!(tracker.touch_end(-60.0, true), None);
    }
}
