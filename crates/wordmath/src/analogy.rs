use crate::vectors::{Word, WordVectors};
use serde::Serialize;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, EnumString, StrumDisplay)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Op {
    Add,
    Sub,
}

/// A parsed analogy expression such as `king - man + woman`: lower-cased
/// operands split into positive and negative sets, plus the operator sequence
/// in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Analogy {
    pub positives: Vec<Word>,
    pub negatives: Vec<Word>,
    pub ops: Vec<Op>,
}

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("expression is empty")]
    Empty,
    #[error("expression contains only operators, no words")]
    NoOperands,
}

/// Whitespace tokenization; `+` and `-` are operators, everything else is an
/// operand. An operand directly preceded by `-` is negative, all others
/// (including the first) are positive.
pub fn parse(input: &str) -> Result<Analogy, ParseError> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut positives = Vec::new();
    let mut negatives = Vec::new();
    let mut ops = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        match *token {
            "+" => ops.push(Op::Add),
            "-" => ops.push(Op::Sub),
            word => {
                if i > 0 && tokens[i - 1] == "-" {
                    negatives.push(Word::new(word.to_lowercase()));
                } else {
                    positives.push(Word::new(word.to_lowercase()));
                }
            }
        }
    }

    if positives.is_empty() && negatives.is_empty() {
        return Err(ParseError::NoOperands);
    }
    Ok(Analogy {
        positives,
        negatives,
        ops,
    })
}

impl Analogy {
    /// Positives first, then negatives, matching the order the renderer
    /// payload lists inputs in.
    pub fn operands(&self) -> impl Iterator<Item = &Word> {
        self.positives.iter().chain(self.negatives.iter())
    }

    pub fn operand_count(&self) -> usize {
        self.positives.len() + self.negatives.len()
    }

    pub fn is_operand(&self, word: &Word) -> bool {
        self.positives.contains(word) || self.negatives.contains(word)
    }

    /// Raw result vector: sum of positive rows minus sum of negative rows.
    /// Operands missing from the vocabulary contribute nothing.
    pub fn result_vector(&self, vectors: &WordVectors) -> Vec<f32> {
        let mut result = vec![0.0f32; vectors.dimensionality()];
        for word in &self.positives {
            if let Some(row) = vectors.vector_of(word) {
                for (r, v) in result.iter_mut().zip(row) {
                    *r += v;
                }
            }
        }
        for word in &self.negatives {
            if let Some(row) = vectors.vector_of(word) {
                for (r, v) in result.iter_mut().zip(row) {
                    *r -= v;
                }
            }
        }
        result
    }
}
