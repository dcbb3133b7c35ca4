//! Encoder output against the International Morse Code reference table.

use morse_core::{
    fill_timings, MorseTiming, TimingBuffer, END, MAX_TIMINGS, PROSIGN_BT, PROSIGN_KN, PROSIGN_SK,
};
use rstest::rstest;

const DIT: MorseTiming = 1;
const DAH: MorseTiming = 3;

/// Render the on durations of a character as a dot/dash string.
fn pattern(c: char) -> String {
    let mut buffer: TimingBuffer = [0; MAX_TIMINGS + 1];
    assert_eq!(fill_timings(&mut buffer, c, DIT, DAH), 0, "{c} starts at 0");
    let mut out = String::new();
    let mut i = 0;
    while buffer[i] != END {
        if i % 2 == 0 {
            out.push(if buffer[i] == DAH { '-' } else { '.' });
        }
        i += 1;
    }
    out
}

#[rstest]
#[case('a', ".-")]
#[case('b', "-...")]
#[case('c', "-.-.")]
#[case('d', "-..")]
#[case('e', ".")]
#[case('f', "..-.")]
#[case('g', "--.")]
#[case('h', "....")]
#[case('i', "..")]
#[case('j', ".---")]
#[case('k', "-.-")]
#[case('l', ".-..")]
#[case('m', "--")]
#[case('n', "-.")]
#[case('o', "---")]
#[case('p', ".--.")]
#[case('q', "--.-")]
#[case('r', ".-.")]
#[case('s', "...")]
#[case('t', "-")]
#[case('u', "..-")]
#[case('v', "...-")]
#[case('w', ".--")]
#[case('x', "-..-")]
#[case('y', "-.--")]
#[case('z', "--..")]
#[case('0', "-----")]
#[case('1', ".----")]
#[case('2', "..---")]
#[case('3', "...--")]
#[case('4', "....-")]
#[case('5', ".....")]
#[case('6', "-....")]
#[case('7', "--...")]
#[case('8', "---..")]
#[case('9', "----.")]
#[case('.', ".-.-.-")]
#[case('?', "..--..")]
#[case(PROSIGN_SK, "...-.-")]
#[case(PROSIGN_KN, "-.--.")]
#[case(PROSIGN_BT, "-...-")]
fn character_pattern_matches_reference(#[case] c: char, #[case] expected: &str) {
    assert_eq!(pattern(c), expected);
}

#[rstest]
#[case(' ')]
#[case('!')]
#[case('A')]
#[case(',')]
fn unmapped_character_starts_on_a_lone_pause(#[case] c: char) {
    let mut buffer: TimingBuffer = [0; MAX_TIMINGS + 1];
    assert_eq!(fill_timings(&mut buffer, c, DIT, DAH), 1);
    assert_eq!(buffer[1], DAH);
    assert_eq!(buffer[2], END);
}
