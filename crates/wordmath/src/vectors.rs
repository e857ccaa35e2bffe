use derive_more::{AsRef, Deref, Display, From, Into};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct Word(String);

crate::impl_string_newtype!(Word);

/// Rows with a norm below this are treated as zero vectors and excluded from
/// cosine ranking.
const NORM_EPSILON: f32 = 1e-8;

#[derive(Error, Debug)]
pub enum VectorsError {
    #[error("failed to read embeddings: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: malformed vector entry")]
    Malformed { line: usize },
    #[error("line {line}: expected {expected} dimensions, found {found}")]
    DimensionMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("embeddings contain no vectors")]
    Empty,
}

#[derive(Error, Debug, PartialEq)]
pub enum QueryError {
    #[error("unknown word '{0}'")]
    UnknownWord(Word),
    #[error("no query words given")]
    EmptyQuery,
}

/// In-memory word2vec store: vocabulary plus a dense row matrix with
/// precomputed row norms.
#[derive(Debug, Clone)]
pub struct WordVectors {
    words: Vec<Word>,
    index: HashMap<String, usize>,
    dims: usize,
    matrix: Vec<f32>,
    norms: Vec<f32>,
}

impl WordVectors {
    /// Load the whitespace-delimited word2vec text format (`word v1 .. vd`
    /// per line). A leading `count dims` line is recognized as a header and
    /// skipped, so both header and no-header files load.
    pub fn load(path: &Path) -> Result<Self, VectorsError> {
        let file = fs::File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn parse(input: &str) -> Result<Self, VectorsError> {
        Self::from_reader(input.as_bytes())
    }

    /// Built-in dataset for stand-alone preview and testing, small enough to
    /// ship inside the binary.
    pub fn demo() -> Self {
        Self::parse(include_str!("demo_vectors.txt")).expect("built-in demo vectors are well-formed")
    }

    fn from_reader<R: BufRead>(reader: R) -> Result<Self, VectorsError> {
        let mut words = Vec::new();
        let mut index = HashMap::new();
        let mut matrix = Vec::new();
        let mut norms = Vec::new();
        let mut dims = 0usize;
        let mut declared: Option<(usize, usize)> = None;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = line_no + 1;
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else { continue };
            let values: Vec<&str> = fields.collect();

            if words.is_empty()
                && declared.is_none()
                && values.len() == 1
                && let (Ok(count), Ok(size)) = (word.parse(), values[0].parse())
            {
                declared = Some((count, size));
                continue;
            }

            let vector = values
                .iter()
                .map(|v| v.parse::<f32>())
                .collect::<Result<Vec<f32>, _>>()
                .map_err(|_| VectorsError::Malformed { line: line_no })?;

            if dims == 0 {
                if vector.is_empty() {
                    return Err(VectorsError::Malformed { line: line_no });
                }
                dims = vector.len();
                if let Some((_, size)) = declared
                    && size != dims
                {
                    return Err(VectorsError::DimensionMismatch {
                        line: line_no,
                        expected: size,
                        found: dims,
                    });
                }
            } else if vector.len() != dims {
                return Err(VectorsError::DimensionMismatch {
                    line: line_no,
                    expected: dims,
                    found: vector.len(),
                });
            }

            // first occurrence wins on duplicate words
            if index.contains_key(word) {
                continue;
            }
            index.insert(word.to_string(), words.len());
            words.push(Word::new(word));
            norms.push(norm(&vector));
            matrix.extend(vector);
        }

        if words.is_empty() {
            return Err(VectorsError::Empty);
        }
        if let Some((count, _)) = declared
            && count != words.len()
        {
            log::warn!(
                "embeddings header declares {} words, found {}",
                count,
                words.len()
            );
        }

        Ok(Self {
            words,
            index,
            dims,
            matrix,
            norms,
        })
    }

    pub fn dimensionality(&self) -> usize {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &Word) -> bool {
        self.index.contains_key(word.as_str())
    }

    /// Raw (un-normalized) vector for a word.
    pub fn vector_of(&self, word: &Word) -> Option<&[f32]> {
        self.index.get(word.as_str()).map(|&i| self.row(i))
    }

    /// Rank the whole vocabulary by cosine similarity against the normalized
    /// mean of the unit input vectors, negatives weighted -1. The operands
    /// themselves may appear in the result; callers filter them.
    pub fn most_similar(
        &self,
        positives: &[Word],
        negatives: &[Word],
        topn: usize,
    ) -> Result<Vec<(Word, f32)>, QueryError> {
        if positives.is_empty() && negatives.is_empty() {
            return Err(QueryError::EmptyQuery);
        }

        let mut mean = vec![0.0f32; self.dims];
        let signed = positives
            .iter()
            .map(|w| (w, 1.0f32))
            .chain(negatives.iter().map(|w| (w, -1.0f32)));
        for (word, sign) in signed {
            let &idx = self
                .index
                .get(word.as_str())
                .ok_or_else(|| QueryError::UnknownWord(word.clone()))?;
            let row_norm = self.norms[idx];
            if row_norm <= NORM_EPSILON {
                continue;
            }
            for (m, v) in mean.iter_mut().zip(self.row(idx)) {
                *m += sign * v / row_norm;
            }
        }

        let query_norm = norm(&mean);
        if query_norm <= NORM_EPSILON {
            // inputs cancelled out, nothing meaningful to rank against
            return Ok(Vec::new());
        }

        let mut ranked: Vec<(usize, f32)> = (0..self.words.len())
            .filter(|&i| self.norms[i] > NORM_EPSILON)
            .map(|i| {
                let sim = dot(&mean, self.row(i)) / (query_norm * self.norms[i]);
                (i, sim)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(topn);

        Ok(ranked
            .into_iter()
            .map(|(i, sim)| (self.words[i].clone(), sim))
            .collect())
    }

    fn row(&self, idx: usize) -> &[f32] {
        &self.matrix[idx * self.dims..][..self.dims]
    }
}

fn norm(v: &[f32]) -> f32 {
    v.iter().map(|e| e * e).sum::<f32>().sqrt()
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(a, b)| a * b).sum()
}
