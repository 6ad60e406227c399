/// One rendered piece of the quote: a word plus its trailing separator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordUnit {
    pub text: String,
    pub active: bool,
}

/// Render words as display units. Every unit but the last carries a trailing
/// space, so concatenating the units gives back the quote.
pub fn word_units(words: &[String]) -> Vec<WordUnit> {
    let last = words.len().saturating_sub(1);
    words
        .iter()
        .enumerate()
        .map(|(idx, word)| WordUnit {
            text: if idx < last {
                format!("{word} ")
            } else {
                word.clone()
            },
            active: false,
        })
        .collect()
}

/// Mark the unit at `index` active and every other unit inactive. An index
/// past the end (a finished round) leaves nothing active.
pub fn highlight_word(units: &mut [WordUnit], index: usize) {
    for (idx, unit) in units.iter_mut().enumerate() {
        unit.active = idx == index;
    }
}
