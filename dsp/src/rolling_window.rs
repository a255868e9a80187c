//! Smoothening of sampled input over a fixed window of recent samples.

/// Unsigned integer types that can be collected in the window.
///
/// Samples are widened into `u64` while averaging, so the sum of the whole
/// window never overflows and no remainder is lost per element.
pub trait Sample: Copy + Default + Ord {
    fn widen(self) -> u64;

    /// Narrow back, saturating on values above the type's range.
    fn narrow(wide: u64) -> Self;
}

macro_rules! impl_sample {
    ( $($t:ty),+ ) => {
        $(
            impl Sample for $t {
                fn widen(self) -> u64 {
                    u64::from(self)
                }

                fn narrow(wide: u64) -> Self {
                    <$t>::try_from(wide).unwrap_or(<$t>::MAX)
                }
            }
        )+
    };
}

impl_sample!(u8, u16, u32);

/// Ring buffer meant for smoothening and peak tracking.
///
/// Pushing overwrites the oldest sample. Queries walk the whole buffer, which
/// is fine for windows of up to a few tens of samples.
///
/// Slots that were never written are not taken into account. The average of
/// a window holding 3 samples out of 30 is the average of those 3.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RollingWindow<T, const N: usize> {
    buffer: [T; N],
    pointer: usize,
    filled: usize,
}

impl<T: Sample, const N: usize> Default for RollingWindow<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Sample, const N: usize> RollingWindow<T, N> {
    const NOT_EMPTY: () = assert!(N > 0, "window must hold at least one sample");

    #[must_use]
    pub fn new() -> Self {
        let () = Self::NOT_EMPTY;
        Self {
            buffer: [T::default(); N],
            pointer: 0,
            filled: 0,
        }
    }

    pub fn push(&mut self, value: T) {
        self.buffer[self.pointer] = value;
        self.pointer = (self.pointer + 1) % N;
        if self.filled < N {
            self.filled += 1;
        }
    }

    #[must_use]
    pub fn rolling_average(&self) -> T {
        if self.filled == 0 {
            return T::default();
        }
        let sum: u64 = self.samples().map(Sample::widen).sum();
        T::narrow(sum / self.filled as u64)
    }

    #[must_use]
    pub fn rolling_max(&self) -> T {
        self.samples().max().unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filled
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.filled == N
    }

    // Until the buffer wraps for the first time, the written samples occupy
    // the head of the array.
    fn samples(&self) -> impl Iterator<Item = T> + '_ {
        self.buffer[..self.filled].iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn when_reads_it_returns_average() {
        let mut window: RollingWindow<u16, 4> = RollingWindow::new();
        window.push(4);
        window.push(8);
        window.push(16);
        window.push(32);
        assert_eq!(window.rolling_average(), 15);
    }

    #[test]
    fn when_empty_it_reads_zero() {
        let window: RollingWindow<u8, 8> = RollingWindow::new();
        assert_eq!(window.rolling_average(), 0);
        assert_eq!(window.rolling_max(), 0);
        assert!(window.is_empty());
    }

    #[test]
    fn when_partially_filled_it_averages_only_written_samples() {
        let mut window: RollingWindow<u8, 30> = RollingWindow::new();
        window.push(200);
        window.push(100);
        assert_eq!(window.len(), 2);
        assert_eq!(window.rolling_average(), 150);
    }

    #[test]
    fn when_full_the_oldest_sample_gets_evicted() {
        let mut window: RollingWindow<u16, 3> = RollingWindow::new();
        window.push(900);
        window.push(3);
        window.push(3);
        assert_eq!(window.rolling_max(), 900);
        window.push(3);
        assert!(window.is_full());
        assert_eq!(window.rolling_max(), 3);
        assert_eq!(window.rolling_average(), 3);
    }

    #[test]
    fn single_slot_window_keeps_only_last_sample() {
        let mut window: RollingWindow<u16, 1> = RollingWindow::new();
        window.push(7);
        window.push(3);
        assert!(window.is_full());
        assert_eq!(window.rolling_average(), 3);
        assert_eq!(window.rolling_max(), 3);
    }

    #[test]
    fn when_averaging_narrow_samples_it_does_not_overflow() {
        let mut window: RollingWindow<u8, 30> = RollingWindow::new();
        for _ in 0..30 {
            window.push(u8::MAX);
        }
        assert_eq!(window.rolling_average(), u8::MAX);
    }

    proptest! {
        #[test]
        fn constant_input_over_full_window_reads_back_unchanged(value in any::<u16>(), extra in 0usize..64) {
            let mut window: RollingWindow<u16, 16> = RollingWindow::new();
            for _ in 0..16 + extra {
                window.push(value);
            }
            prop_assert_eq!(window.rolling_average(), value);
            prop_assert_eq!(window.rolling_max(), value);
        }

        #[test]
        fn average_never_exceeds_max(samples in proptest::collection::vec(any::<u8>(), 1..40)) {
            let mut window: RollingWindow<u8, 12> = RollingWindow::new();
            for sample in &samples {
                window.push(*sample);
            }
            prop_assert!(window.rolling_average() <= window.rolling_max());
            let tail = &samples[samples.len().saturating_sub(12)..];
            prop_assert_eq!(window.rolling_max(), *tail.iter().max().unwrap());
        }
    }
}
