//! Generated identifiers and name casing.

use lazy_static::lazy_static;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use regex::Regex;

use crate::constants::HANDLER_PREFIX;
use crate::options::{BuildMode, TransformOptions};

/// Produces the next unique handler method name.
pub trait NameGenerator {
    fn next_name(&mut self) -> String;
}

/// `func__1`, `func__2`, ... Stable across runs.
#[derive(Debug, Default)]
pub struct SequentialNames {
    counter: usize,
}

impl NameGenerator for SequentialNames {
    fn next_name(&mut self) -> String {
        self.counter += 1;
        format!("{}{}", HANDLER_PREFIX, self.counter)
    }
}

/// `func__` followed by random lowercase letters. Host runtimes reject long or
/// digit-bearing handler names, so only letters are drawn.
pub struct RandomLetters {
    rng: SmallRng,
    length: usize,
}

impl RandomLetters {
    pub fn new(length: usize) -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
            length,
        }
    }

    pub fn seeded(length: usize, seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            length,
        }
    }
}

impl NameGenerator for RandomLetters {
    fn next_name(&mut self) -> String {
        let letters: String = (0..self.length)
            .map(|_| char::from(b'a' + self.rng.random_range(0..26u8)))
            .collect();
        format!("{}{}", HANDLER_PREFIX, letters)
    }
}

pub fn generator_for(options: &TransformOptions) -> Box<dyn NameGenerator> {
    match options.mode {
        BuildMode::Test => Box::new(SequentialNames::default()),
        BuildMode::Production => Box::new(RandomLetters::new(options.random_name_length)),
    }
}

lazy_static! {
    static ref LOWER_UPPER: Regex = Regex::new(r"([a-z0-9])([A-Z])").unwrap();
    static ref ACRONYM_BOUNDARY: Regex = Regex::new(r"([A-Z]+)([A-Z][a-z])").unwrap();
    static ref LETTER_DIGIT: Regex = Regex::new(r"([A-Za-z])([0-9])").unwrap();
    static ref DIGIT_LETTER: Regex = Regex::new(r"([0-9])([A-Za-z])").unwrap();
    static ref SEPARATORS: Regex = Regex::new(r"[^A-Za-z0-9]+").unwrap();
}

/// `TabBar` -> `tab-bar`, `HTMLView` -> `html-view`, `my_component2` -> `my-component-2`.
/// Digit runs are words of their own.
pub fn kebab_case(name: &str) -> String {
    let spaced = ACRONYM_BOUNDARY.replace_all(name, "$1-$2");
    let spaced = LOWER_UPPER.replace_all(&spaced, "$1-$2");
    let spaced = LETTER_DIGIT.replace_all(&spaced, "$1-$2");
    let spaced = DIGIT_LETTER.replace_all(&spaced, "$1-$2");
    SEPARATORS
        .replace_all(&spaced, "-")
        .trim_matches('-')
        .to_lowercase()
}
