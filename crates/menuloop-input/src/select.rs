//! Selection from enumerated sets and candidate collections.
//!
//! Single selection runs a present, select, confirm cycle: the options are
//! listed with 1-based numbers, an option number is read, and the user is
//! asked to confirm. The cycle repeats until the user confirms. Only the
//! inner reads are attempt-bounded; the confirm loop itself is not.
//!
//! Multi selection repeatedly runs single selection against a shrinking
//! pool, removing each chosen candidate, until the pool is empty or the
//! user declines to pick another.

use std::fmt::Display;

use strum::IntoEnumIterator;

use crate::error::InputError;
use crate::reader::ValidatedReader;
use crate::terminal::TerminalIO;

const OPTION_PROMPT: &str = "Please select an option";
const OBJECT_PROMPT: &str = "Please select an object";
const NUMBER_PROMPT: &str = "Enter the option number";
const CONFIRM_PROMPT: &str = "Is that correct? (Y/N)";
const ANOTHER_PROMPT: &str = "Do you want to select another item";

/// Selection prompts built on a [`ValidatedReader`].
///
/// # Example
///
/// ```
/// use menuloop_input::{MockTerminal, Selector, ValidatedReader};
///
/// let reader = ValidatedReader::with_terminal(MockTerminal::with_responses(["2", "y"]));
/// let fruit = Selector::new(&reader)
///     .choose_one("Pick a fruit", vec!["apple", "pear", "plum"])
///     .unwrap();
/// assert_eq!(fruit, "pear");
/// ```
#[derive(Debug)]
pub struct Selector<'r, T: TerminalIO> {
    reader: &'r ValidatedReader<T>,
}

impl<'r, T: TerminalIO> Selector<'r, T> {
    /// Create a selector that reads through `reader`.
    pub fn new(reader: &'r ValidatedReader<T>) -> Self {
        Self { reader }
    }

    /// Choose one variant of a closed enumeration.
    ///
    /// Fails with [`InputError::EmptyChoices`] if the enumeration has no
    /// variants. A single-variant enumeration is still presented and
    /// confirmed.
    pub fn choose_variant<E>(&self, prompt: &str) -> Result<E, InputError>
    where
        E: IntoEnumIterator + Display,
    {
        let mut variants: Vec<E> = E::iter().collect();
        if variants.is_empty() {
            return Err(InputError::EmptyChoices);
        }
        let prompt = non_empty(prompt, OPTION_PROMPT);
        let index = loop {
            self.reader.say(prompt)?;
            for (n, variant) in variants.iter().enumerate() {
                self.reader.say(&format!("{}\t{}", n + 1, variant))?;
            }
            let index = self.read_option_number(variants.len())?;
            self.reader
                .say(&format!("You have selected \"{}\"", variants[index]))?;
            if self.reader.boolean(CONFIRM_PROMPT)? {
                break index;
            }
        };
        Ok(variants.swap_remove(index))
    }

    /// Choose the position of one candidate.
    ///
    /// Returns 0 without prompting when there is exactly one candidate.
    pub fn choose_index<C: Display>(
        &self,
        prompt: &str,
        candidates: &[C],
    ) -> Result<usize, InputError> {
        match candidates.len() {
            0 => return Err(InputError::EmptyChoices),
            1 => return Ok(0),
            _ => {}
        }
        let prompt = non_empty(prompt, OBJECT_PROMPT);
        loop {
            self.reader.say(prompt)?;
            self.reader.say("")?;
            for (n, candidate) in candidates.iter().enumerate() {
                let rendered = candidate.to_string().replace('\n', "\n\t");
                self.reader.say(&format!("{}:\t{}\n", n + 1, rendered))?;
            }
            let index = self.read_option_number(candidates.len())?;
            self.reader
                .say(&format!("You have selected...\n{}", candidates[index]))?;
            if self.reader.boolean(CONFIRM_PROMPT)? {
                return Ok(index);
            }
        }
    }

    /// Choose one candidate from a collection.
    ///
    /// Fails with [`InputError::EmptyChoices`] for an empty collection and
    /// returns the sole candidate without prompting for a singleton.
    pub fn choose_one<C: Display>(
        &self,
        prompt: &str,
        candidates: impl IntoIterator<Item = C>,
    ) -> Result<C, InputError> {
        let mut candidates: Vec<C> = candidates.into_iter().collect();
        let index = self.choose_index(prompt, &candidates)?;
        Ok(candidates.swap_remove(index))
    }

    /// Choose one or more distinct candidates.
    ///
    /// Equal candidates are collapsed first, keeping the first occurrence.
    /// The result is in selection order. A singleton is returned unchanged
    /// without prompting.
    pub fn choose_many<C: Display + PartialEq>(
        &self,
        prompt: &str,
        candidates: impl IntoIterator<Item = C>,
    ) -> Result<Vec<C>, InputError> {
        let mut pool: Vec<C> = Vec::new();
        for candidate in candidates {
            if !pool.contains(&candidate) {
                pool.push(candidate);
            }
        }
        match pool.len() {
            0 => return Err(InputError::EmptyChoices),
            1 => return Ok(pool),
            _ => {}
        }

        let mut chosen = Vec::with_capacity(pool.len());
        loop {
            let index = self.choose_index(prompt, &pool)?;
            chosen.push(pool.remove(index));

            self.reader.say("\nCurrently selected items: ")?;
            for item in &chosen {
                self.reader.say(&item.to_string())?;
            }
            self.reader.say("")?;

            if pool.is_empty() || !self.reader.boolean(ANOTHER_PROMPT)? {
                return Ok(chosen);
            }
        }
    }

    fn read_option_number(&self, count: usize) -> Result<usize, InputError> {
        let max = i32::try_from(count).unwrap_or(i32::MAX);
        let number = self.reader.integer_between(NUMBER_PROMPT, 1, max)?;
        // integer_between guarantees 1..=max
        Ok(number as usize - 1)
    }
}

fn non_empty<'a>(prompt: &'a str, fallback: &'a str) -> &'a str {
    if prompt.trim().is_empty() {
        fallback
    } else {
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MockTerminal, ValidationKind};
    use strum::EnumIter;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, strum::Display)]
    enum Colour {
        Red,
        Green,
        Blue,
    }

    #[derive(Debug)]
    enum Nothing {}

    impl std::fmt::Display for Nothing {
        fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match *self {}
        }
    }

    impl IntoEnumIterator for Nothing {
        type Iterator = std::iter::Empty<Nothing>;

        fn iter() -> Self::Iterator {
            std::iter::empty()
        }
    }

    fn reader(responses: &[&str]) -> ValidatedReader<MockTerminal> {
        ValidatedReader::with_terminal(MockTerminal::with_responses(responses.iter().copied()))
    }

    #[test]
    fn variant_lists_and_confirms() {
        let r = reader(&["2", "yes"]);
        let colour: Colour = Selector::new(&r).choose_variant("Favourite colour").unwrap();
        assert_eq!(colour, Colour::Green);
        let out = r.terminal().stdout();
        assert!(out.starts_with("Favourite colour\n1\tRed\n2\tGreen\n3\tBlue\n"));
        assert!(out.contains("You have selected \"Green\""));
    }

    #[test]
    fn variant_repeats_until_confirmed() {
        let r = reader(&["1", "n", "3", "y"]);
        let colour: Colour = Selector::new(&r).choose_variant("").unwrap();
        assert_eq!(colour, Colour::Blue);
        assert_eq!(r.terminal().stdout().matches(OPTION_PROMPT).count(), 2);
    }

    #[test]
    fn variant_of_empty_enum_fails() {
        let r = reader(&["1"]);
        let result: Result<Nothing, _> = Selector::new(&r).choose_variant("Pick");
        assert!(matches!(result, Err(InputError::EmptyChoices)));
    }

    #[test]
    fn variant_number_exhaustion_propagates() {
        let r = reader(&["0", "4", "x"]);
        let err = Selector::new(&r).choose_variant::<Colour>("Pick").unwrap_err();
        assert_eq!(err.kind(), Some(ValidationKind::Integer));
    }

    #[test]
    fn one_of_empty_fails() {
        let r = reader(&[]);
        let result = Selector::new(&r).choose_one("Pick", Vec::<String>::new());
        assert!(matches!(result, Err(InputError::EmptyChoices)));
    }

    #[test]
    fn one_of_singleton_does_not_prompt() {
        let r = reader(&[]);
        let only = Selector::new(&r).choose_one("Pick", vec!["only"]).unwrap();
        assert_eq!(only, "only");
        assert_eq!(r.terminal().stdout(), "");
        assert_eq!(r.terminal().reads(), 0);
    }

    #[test]
    fn one_of_indents_multiline_renderings() {
        let r = reader(&["1", "y"]);
        Selector::new(&r)
            .choose_one("Pick", vec!["first\nline", "second"])
            .unwrap();
        assert!(r.terminal().stdout().contains("1:\tfirst\n\tline\n"));
    }

    #[test]
    fn many_stops_when_user_declines() {
        let r = reader(&["2", "y", "n"]);
        let picked = Selector::new(&r)
            .choose_many("Pick", vec!["a", "b", "c"])
            .unwrap();
        assert_eq!(picked, vec!["b"]);
    }

    #[test]
    fn many_preserves_selection_order() {
        // pick c, continue, pick a from [a, b], continue, last one is automatic
        let r = reader(&["3", "y", "yes", "1", "y", "yes"]);
        let picked = Selector::new(&r)
            .choose_many("Pick", vec!["a", "b", "c"])
            .unwrap();
        assert_eq!(picked, vec!["c", "a", "b"]);
        assert_eq!(r.terminal().remaining(), 0);
    }

    #[test]
    fn many_collapses_duplicates() {
        let r = reader(&[]);
        let picked = Selector::new(&r).choose_many("Pick", vec![7, 7]).unwrap();
        assert_eq!(picked, vec![7]);
    }

    #[test]
    fn many_echoes_current_selection() {
        let r = reader(&["1", "y", "no"]);
        Selector::new(&r).choose_many("Pick", vec!["x", "y"]).unwrap();
        assert!(r
            .terminal()
            .stdout()
            .contains("\nCurrently selected items: \nx\n\n"));
    }
}
