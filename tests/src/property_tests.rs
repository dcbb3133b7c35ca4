//! Encoder invariants over the whole character space.

use morse_core::{fill_timings, TimingBuffer, END, MAX_TIMINGS};
use proptest::prelude::*;

proptest! {
    /// Every character yields a terminated sequence whose final off entry
    /// is the widened inter-character gap.
    #[test]
    fn every_sequence_ends_with_a_widened_gap(c in any::<char>(), dit in 1u32..5_000) {
        let dah = dit * 3;
        let mut buffer: TimingBuffer = [0; MAX_TIMINGS + 1];
        let start = fill_timings(&mut buffer, c, dit, dah);
        prop_assert!(start <= 1);

        let end = (start..buffer.len())
            .find(|&i| buffer[i] == END)
            .expect("terminator present");
        prop_assert!(end >= 1);
        prop_assert_eq!(end % 2, 0);
        prop_assert_eq!(buffer[end - 1], dah);

        // every interior off entry is a single-dit inter-symbol gap
        for i in (start + 1..end.saturating_sub(1)).step_by(2) {
            prop_assert_eq!(buffer[i], dit);
        }
    }

    /// Re-encoding the same character over a dirty buffer reproduces the
    /// playable region exactly.
    #[test]
    fn encoding_is_idempotent(c in any::<char>(), prior in any::<char>(), dit in 1u32..5_000) {
        let dah = dit * 3;

        let mut dirty: TimingBuffer = [0; MAX_TIMINGS + 1];
        fill_timings(&mut dirty, prior, dit, dah);
        let start = fill_timings(&mut dirty, c, dit, dah);

        let mut fresh: TimingBuffer = [0; MAX_TIMINGS + 1];
        prop_assert_eq!(fill_timings(&mut fresh, c, dit, dah), start);

        let end = (start..fresh.len())
            .find(|&i| fresh[i] == END)
            .expect("terminator present");
        prop_assert_eq!(&dirty[..=end], &fresh[..=end]);
    }
}
