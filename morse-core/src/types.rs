//! Core timing types and constants for the Morse sender

/// One on or off duration, in milliseconds.
pub type MorseTiming = u32;

/// Monotonic millisecond timestamp. Elapsed spans are computed with
/// wrapping subtraction, so a single wrap of the counter is harmless.
pub type Millis = u32;

/// Sentinel terminating a timing sequence.
pub const END: MorseTiming = 0;

/// The most timing entries any character needs; a digit is five symbols,
/// i.e. five on entries, four inter-symbol gaps and the trailing
/// character gap.
pub const MAX_TIMINGS: usize = 15;

/// on,off,...,END list for the character currently being sent, millis.
pub type TimingBuffer = [MorseTiming; MAX_TIMINGS + 1];

/// Default sending speed.
pub const WPM_DEFAULT: f32 = 12.0;

/// PARIS WPM measurement: one reference word is 50 units.
pub const DITS_PER_WORD: u32 = 50;

/// Capacity of the sender's message buffer, in characters.
pub const MESSAGE_CAPACITY: usize = 64;

/// Default audible frequency for tone outputs (close to C6).
pub const TONE_FREQUENCY_DEFAULT: u32 = 1046;

/// Default duty-cycle level for PWM outputs (full brightness).
pub const BRIGHTNESS_DEFAULT: u8 = 255;
