use foundation::time::Millis;

/// Render-tick metadata.
///
/// Ticks are driven by `requestAnimationFrame`, so time is wall-clock and
/// `dt_ms` varies from frame to frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Timestamp of this frame.
    pub time: Millis,
    /// Milliseconds since the previous frame (0 for the first frame).
    pub dt_ms: f64,
}

impl Frame {
    pub fn first(time: Millis) -> Self {
        Self {
            index: 0,
            time,
            dt_ms: 0.0,
        }
    }

    pub fn next(self, time: Millis) -> Self {
        Self {
            index: self.index + 1,
            time,
            dt_ms: time.since(self.time),
        }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::first(Millis(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;
    use foundation::time::Millis;

    #[test]
    fn next_advances_index_and_measures_dt() {
        let f0 = Frame::first(Millis(100.0));
        let f1 = f0.next(Millis(116.5));
        assert_eq!(f1.index, 1);
        assert_eq!(f1.dt_ms, 16.5);
    }

    #[test]
    fn clock_going_backwards_yields_zero_dt() {
        let f0 = Frame::first(Millis(100.0));
        assert_eq!(f0.next(Millis(90.0)).dt_ms, 0.0);
    }
}
