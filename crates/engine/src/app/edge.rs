/// Turns a level-sensed boolean signal into a one-shot rising-edge event.
///
/// Sample each detector exactly once per loop iteration. A second sample in
/// the same iteration sees the level stored by the first one and never
/// reports an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeDetector {
    previous_level: bool,
}

impl EdgeDetector {
    pub const fn new() -> Self {
        Self {
            previous_level: false,
        }
    }

    /// Returns `true` only when the signal is asserted now and was not at
    /// the previous sample.
    pub fn sample(&mut self, current_level: bool) -> bool {
        let rising = current_level && !self.previous_level;
        self.previous_level = current_level;
        rising
    }

    /// Level seen by the most recent `sample` call.
    pub fn is_held(&self) -> bool {
        self.previous_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_all(levels: &[bool]) -> Vec<bool> {
        let mut detector = EdgeDetector::new();
        levels.iter().map(|level| detector.sample(*level)).collect()
    }

    #[test]
    fn held_signal_does_not_repeat_fire() {
        assert_eq!(
            sample_all(&[false, true, true, true]),
            vec![false, true, false, false]
        );
    }

    #[test]
    fn release_re_arms_detector() {
        assert_eq!(sample_all(&[true, false, true]), vec![true, false, true]);
    }

    #[test]
    fn space_key_scenario_fires_on_each_press() {
        assert_eq!(
            sample_all(&[false, true, true, false, true]),
            vec![false, true, false, false, true]
        );
    }

    #[test]
    fn low_signal_never_fires() {
        assert!(sample_all(&[false, false, false]).iter().all(|edge| !edge));
    }

    #[test]
    fn second_sample_in_same_tick_sees_no_edge() {
        let mut detector = EdgeDetector::new();
        assert!(detector.sample(true));
        assert!(!detector.sample(true));
    }

    #[test]
    fn is_held_tracks_last_sampled_level() {
        let mut detector = EdgeDetector::default();
        assert!(!detector.is_held());
        detector.sample(true);
        assert!(detector.is_held());
        detector.sample(false);
        assert!(!detector.is_held());
    }
}
