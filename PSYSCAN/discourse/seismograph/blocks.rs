use std::{num::NonZeroUsize, ops::Range};

/// Contiguous run of sentences, the unit the seismograph steps through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// 0-based position in the document.
    pub index: usize,
    /// Indices of the member sentences.
    pub sentences: Range<usize>,
    /// Member sentences joined by a single space.
    pub text: String,
}

impl Block {
    /// Number of member sentences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// Never true for blocks produced by [`partition`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// Cuts `sentences` into consecutive blocks of `size`; the last one may be
/// shorter. Zero sentences give zero blocks.
#[must_use]
pub fn partition(sentences: &[String], size: NonZeroUsize) -> Vec<Block> {
    sentences
        .chunks(size.get())
        .enumerate()
        .map(|(index, chunk)| {
            let start = index * size.get();
            Block {
                index,
                sentences: start..start + chunk.len(),
                text: chunk.join(" "),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Phrase {i}.")).collect()
    }

    #[test]
    fn twelve_sentences_by_five() {
        let blocks = partition(&sentences(12), NonZeroUsize::new(5).unwrap());
        let sizes: Vec<usize> = blocks.iter().map(Block::len).collect();
        assert_eq!(sizes, vec![5, 5, 2]);
        assert_eq!(blocks[2].sentences, 10..12);
        assert_eq!(blocks[2].text, "Phrase 10. Phrase 11.");
    }

    #[test]
    fn blocks_cover_every_sentence_in_order() {
        for n in 0..25 {
            for size in 1..8 {
                let input = sentences(n);
                let blocks = partition(&input, NonZeroUsize::new(size).unwrap());
                assert_eq!(blocks.len(), n.div_ceil(size));
                let covered: Vec<usize> = blocks.iter().flat_map(|b| b.sentences.clone()).collect();
                assert_eq!(covered, (0..n).collect::<Vec<_>>());
                assert!(blocks.iter().all(|b| !b.is_empty()));
            }
        }
    }
}
