//! Host-based tests for the Morse sender: reference pattern tables,
//! end-to-end playback timelines and encoder property checks.

#[cfg(test)]
mod pattern_tests;
#[cfg(test)]
mod property_tests;
