//! Playback state machine: walks a message's timing sequences and keys
//! the output capability from a cooperative polling loop.

use heapless::String;

use crate::encode::fill_timings;
use crate::hal::{self, HalError, MorseOutput};
use crate::types::{
    Millis, MorseTiming, TimingBuffer, DITS_PER_WORD, END, MAX_TIMINGS, MESSAGE_CAPACITY,
    WPM_DEFAULT,
};

/// Non-blocking Morse sender bound to one output.
///
/// One instance owns one physical output; create it once and reuse it
/// across messages. [`start_sending`](MorseSender::start_sending) must be
/// called before [`continue_sending`](MorseSender::continue_sending) for
/// each message.
pub struct MorseSender<O> {
    output: O,
    dit: MorseTiming,
    dah: MorseTiming,
    message: String<MESSAGE_CAPACITY>,
    // on,off,...,END list for the character at message_index, millis
    timings: TimingBuffer,
    // index of the character currently being sent
    message_index: usize,
    // timing entry currently being sent; even = on phase, odd = off phase
    timing_index: usize,
    // when the current timing entry was started
    last_changed: Millis,
}

impl<O> MorseSender<O>
where
    O: MorseOutput,
{
    /// Create a sender at the default speed.
    pub fn new(output: O) -> Self {
        Self::with_wpm(output, WPM_DEFAULT)
    }

    /// Create a sender at the given words-per-minute speed.
    pub fn with_wpm(output: O, wpm: f32) -> Self {
        let mut sender = Self {
            output,
            dit: 1,
            dah: 3,
            message: String::new(),
            timings: [END; MAX_TIMINGS + 1],
            message_index: 0,
            timing_index: 0,
            last_changed: 0,
        };
        sender.set_wpm(wpm);
        sender
    }

    /// One-time output configuration, to be called before the first send.
    pub fn setup(&mut self) -> Result<(), O::Error> {
        self.output.setup()
    }

    /// Set the speed in words per minute (PARIS measurement).
    pub fn set_wpm(&mut self, wpm: f32) {
        self.set_speed((1000.0 * 60.0 / (wpm.max(1.0) * DITS_PER_WORD as f32)) as MorseTiming);
    }

    /// Set the duration, in milliseconds, of a dit. Takes effect when the
    /// next character is encoded; the character in progress keeps its
    /// computed durations.
    pub fn set_speed(&mut self, duration: MorseTiming) {
        self.dit = duration.max(1);
        self.dah = 3 * self.dit;
    }

    pub fn dit_millis(&self) -> MorseTiming {
        self.dit
    }

    pub fn wpm(&self) -> u32 {
        (1000 * 60 / (self.dit * DITS_PER_WORD)).max(1)
    }

    /// Set the message to be sent. Halts any sending in progress, leaving
    /// the output off.
    pub fn set_message(&mut self, text: &str) -> Result<(), O::Error> {
        // If a different message was in progress, make sure it stops cleanly.
        if self.timing_index % 2 == 0 {
            self.output.off()?;
        }
        self.message.clear();
        self.message
            .push_str(text)
            .map_err(|_| HalError::MessageOverflow)?;
        // Force start_sending() before continue_sending().
        self.message_index = self.message.len();
        Ok(())
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// True while a started message still has timing entries to play.
    pub fn is_sending(&self) -> bool {
        self.message_index < self.message.len()
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// The output, e.g. for brightness changes mid-message.
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Prepare to send and begin sending the current message.
    pub fn start_sending(&mut self) -> Result<(), O::Error> {
        self.start_at(hal::now_millis())
    }

    /// [`start_sending`](MorseSender::start_sending) against an explicit
    /// clock reading, for hosts that own their time source.
    pub fn start_at(&mut self, now: Millis) -> Result<(), O::Error> {
        self.message_index = 0;
        if self.message.is_empty() {
            return Ok(());
        }
        let first = self.message.as_bytes()[0] as char;
        self.timing_index = fill_timings(&mut self.timings, first, self.dit, self.dah);
        #[cfg(feature = "defmt")]
        defmt::trace!(
            "morse: start, {} chars at dit {} ms",
            self.message.len(),
            self.dit
        );
        self.output.ready()?;
        if self.timing_index % 2 == 0 {
            self.output.on()?;
        }
        self.last_changed = now;
        Ok(())
    }

    /// Switch the output on and off (and refill the internal timing
    /// buffer) as necessary to continue sending the current message.
    ///
    /// To produce a legible fist this should be polled at a significantly
    /// smaller interval than one dit. Returns `false` once the message is
    /// fully sent, `true` otherwise.
    pub fn continue_sending(&mut self) -> Result<bool, O::Error> {
        self.continue_at(hal::now_millis())
    }

    /// [`continue_sending`](MorseSender::continue_sending) against an
    /// explicit clock reading.
    pub fn continue_at(&mut self, now: Millis) -> Result<bool, O::Error> {
        if self.message_index >= self.message.len() {
            return Ok(false);
        }

        // Wrapping subtraction keeps the elapsed span correct across a
        // single wrap of the millisecond counter.
        let elapsed = now.wrapping_sub(self.last_changed);
        if elapsed < self.timings[self.timing_index] {
            return Ok(true);
        }

        self.timing_index += 1;
        if self.timings[self.timing_index] == END {
            self.message_index += 1;
            if self.message_index >= self.message.len() {
                self.output.off()?;
                self.output.complete()?;
                #[cfg(feature = "defmt")]
                defmt::trace!("morse: message complete");
                return Ok(false);
            }
            let next = self.message.as_bytes()[self.message_index] as char;
            self.timing_index = fill_timings(&mut self.timings, next, self.dit, self.dah);
            #[cfg(feature = "defmt")]
            defmt::trace!("morse: char {}/{}", self.message_index, self.message.len());
        }

        // Advance by the measured elapsed span, per the phase schedule.
        self.last_changed = self.last_changed.wrapping_add(elapsed);

        if self.timing_index % 2 == 0 {
            self.output.on()?;
        } else {
            self.output.off()?;
        }

        Ok(true)
    }

    /// Send the entirety of the current message before returning.
    ///
    /// Blocks the calling context for the full message duration; meant for
    /// environments with no concurrent work to starve.
    pub fn send_blocking(&mut self) -> Result<(), O::Error> {
        self.start_sending()?;
        while self.continue_sending()? {}
        Ok(())
    }
}
