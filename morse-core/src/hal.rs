//! Hardware abstraction: the output capability driven by the sender, the
//! adapters for common physical media, and the millisecond clock.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::types::{Millis, BRIGHTNESS_DEFAULT, TONE_FREQUENCY_DEFAULT};

/// Error types for output operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HalError {
    /// GPIO operation failed
    GpioError,
    /// PWM duty-cycle operation failed
    PwmError,
    /// Tone generation failed
    ToneError,
    /// Message text does not fit the sender's buffer
    MessageOverflow,
}

#[cfg(feature = "std")]
impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::GpioError => write!(f, "GPIO operation failed"),
            HalError::PwmError => write!(f, "PWM duty-cycle operation failed"),
            HalError::ToneError => write!(f, "Tone generation failed"),
            HalError::MessageOverflow => write!(f, "Message does not fit the sender's buffer"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// One physical output medium, as seen by the playback state machine.
///
/// `on`/`off` key the signal; `ready` runs once before the first symbol of
/// a message and `complete` once after the last. Simple media leave the
/// hooks as the provided no-ops.
pub trait MorseOutput {
    type Error: From<HalError>;

    /// One-time configuration of the pin/channel as an output.
    fn setup(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Drive the output to its signalling state.
    fn on(&mut self) -> Result<(), Self::Error>;

    /// Drive the output to its idle state.
    fn off(&mut self) -> Result<(), Self::Error>;

    /// Hook invoked before the first symbol of a message.
    fn ready(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Hook invoked after the last symbol of a message.
    fn complete(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Digital (LED) output over an embedded-hal pin.
pub struct DigitalOutput<P> {
    pin: P,
    active_low: bool,
}

impl<P> DigitalOutput<P>
where
    P: OutputPin,
{
    /// Output which signals with the pin driven high.
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            active_low: false,
        }
    }

    /// Output which signals with the pin driven low.
    pub fn active_low(pin: P) -> Self {
        Self {
            pin,
            active_low: true,
        }
    }
}

impl<P> MorseOutput for DigitalOutput<P>
where
    P: OutputPin,
{
    type Error = HalError;

    fn on(&mut self) -> Result<(), Self::Error> {
        if self.active_low {
            self.pin.set_low()
        } else {
            self.pin.set_high()
        }
        .map_err(|_| HalError::GpioError)
    }

    fn off(&mut self) -> Result<(), Self::Error> {
        if self.active_low {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
        .map_err(|_| HalError::GpioError)
    }
}

/// Minimal tone-generation capability for speaker-style outputs.
pub trait ToneChannel {
    type Error;

    /// Start a continuous tone at the given frequency.
    fn start(&mut self, frequency_hz: u32) -> Result<(), Self::Error>;

    /// Stop any tone currently playing.
    fn stop(&mut self) -> Result<(), Self::Error>;
}

/// Speaker output: keyed symbols as an audible tone, with an optional
/// low carrier tone filling the gaps for links that need a continuous
/// signal.
pub struct ToneOutput<T> {
    channel: T,
    frequency: u32,
    carrier: Option<u32>,
}

impl<T> ToneOutput<T>
where
    T: ToneChannel,
{
    /// Tone output at the default audible frequency, no carrier.
    pub fn new(channel: T) -> Self {
        Self::with_frequency(channel, TONE_FREQUENCY_DEFAULT)
    }

    pub fn with_frequency(channel: T, frequency_hz: u32) -> Self {
        Self {
            channel,
            frequency: frequency_hz,
            carrier: None,
        }
    }

    /// Tone output which idles on `carrier_hz` between symbols instead of
    /// going silent.
    pub fn with_carrier(channel: T, frequency_hz: u32, carrier_hz: u32) -> Self {
        Self {
            channel,
            frequency: frequency_hz,
            carrier: Some(carrier_hz),
        }
    }
}

impl<T> MorseOutput for ToneOutput<T>
where
    T: ToneChannel,
{
    type Error = HalError;

    fn on(&mut self) -> Result<(), Self::Error> {
        self.channel
            .start(self.frequency)
            .map_err(|_| HalError::ToneError)
    }

    fn off(&mut self) -> Result<(), Self::Error> {
        match self.carrier {
            Some(carrier_hz) => self.channel.start(carrier_hz),
            None => self.channel.stop(),
        }
        .map_err(|_| HalError::ToneError)
    }

    /// Pre-emit the carrier idle tone before the message starts.
    fn ready(&mut self) -> Result<(), Self::Error> {
        self.off()
    }

    /// Stop all tone output, carrier included.
    fn complete(&mut self) -> Result<(), Self::Error> {
        self.channel.stop().map_err(|_| HalError::ToneError)
    }
}

/// PWM (brightness) output over an embedded-hal duty-cycle channel.
pub struct PwmOutput<P> {
    channel: P,
    brightness: u8,
}

impl<P> PwmOutput<P>
where
    P: SetDutyCycle,
{
    /// PWM output at full brightness.
    pub fn new(channel: P) -> Self {
        Self::with_brightness(channel, BRIGHTNESS_DEFAULT)
    }

    pub fn with_brightness(channel: P, brightness: u8) -> Self {
        Self {
            channel,
            brightness,
        }
    }

    /// Change the on-phase brightness; takes effect at the next on phase,
    /// including mid-message.
    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }
}

impl<P> MorseOutput for PwmOutput<P>
where
    P: SetDutyCycle,
{
    type Error = HalError;

    fn on(&mut self) -> Result<(), Self::Error> {
        self.channel
            .set_duty_cycle_fraction(u16::from(self.brightness), u16::from(u8::MAX))
            .map_err(|_| HalError::PwmError)
    }

    fn off(&mut self) -> Result<(), Self::Error> {
        self.channel
            .set_duty_cycle_fully_off()
            .map_err(|_| HalError::PwmError)
    }
}

// The millisecond clock the sender polls against. With the embassy-time
// feature it reads the platform's time driver; otherwise the crate keeps
// its own tick, advanced by the platform's periodic timer interrupt.

/// Current monotonic time in milliseconds.
#[cfg(feature = "embassy-time")]
pub fn now_millis() -> Millis {
    embassy_time::Instant::now().as_millis() as Millis
}

#[cfg(not(feature = "embassy-time"))]
static MILLIS: portable_atomic::AtomicU32 = portable_atomic::AtomicU32::new(0);

/// Current monotonic time in milliseconds.
#[cfg(not(feature = "embassy-time"))]
pub fn now_millis() -> Millis {
    MILLIS.load(portable_atomic::Ordering::Relaxed)
}

/// Advance the software millisecond tick.
///
/// Safe to call from interrupt context.
#[cfg(not(feature = "embassy-time"))]
pub fn advance_millis(ms: Millis) {
    MILLIS.fetch_add(ms, portable_atomic::Ordering::Relaxed);
}

/// Set the software millisecond tick to an absolute value.
#[cfg(not(feature = "embassy-time"))]
pub fn set_millis(ms: Millis) {
    MILLIS.store(ms, portable_atomic::Ordering::Relaxed);
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Mock output implementations for testing

    use super::{HalError, MorseOutput};
    use heapless::Vec;

    /// One recorded capability invocation.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub enum OutputEvent {
        Ready,
        On,
        Off,
        Complete,
    }

    /// Output that records every invocation in order.
    #[derive(Default)]
    pub struct RecordingOutput {
        events: Vec<OutputEvent, 256>,
    }

    impl RecordingOutput {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> &[OutputEvent] {
            &self.events
        }

        pub fn clear(&mut self) {
            self.events.clear();
        }

        /// True if the last on/off transition left the output keyed.
        pub fn is_on(&self) -> bool {
            self.events
                .iter()
                .rev()
                .find_map(|event| match event {
                    OutputEvent::On => Some(true),
                    OutputEvent::Off | OutputEvent::Complete => Some(false),
                    OutputEvent::Ready => None,
                })
                .unwrap_or(false)
        }

        fn record(&mut self, event: OutputEvent) -> Result<(), HalError> {
            self.events.push(event).map_err(|_| HalError::GpioError)
        }
    }

    impl MorseOutput for RecordingOutput {
        type Error = HalError;

        fn on(&mut self) -> Result<(), Self::Error> {
            self.record(OutputEvent::On)
        }

        fn off(&mut self) -> Result<(), Self::Error> {
            self.record(OutputEvent::Off)
        }

        fn ready(&mut self) -> Result<(), Self::Error> {
            self.record(OutputEvent::Ready)
        }

        fn complete(&mut self) -> Result<(), Self::Error> {
            self.record(OutputEvent::Complete)
        }
    }
}
