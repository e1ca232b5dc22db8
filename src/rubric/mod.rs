//! Rubric schema and tolerant loading.
//!
//! # Availability over strictness
//!
//! [`RubricLoader::load`] never fails. A missing file, an unreadable or malformed source, or a
//! header without the required columns all degrade to [`Rubric::default_rubric`]. This keeps
//! scoring available, but it can also hide a rubric authoring mistake: the reason is logged
//! at `warn` and is available as a [`DefaultReason`] through [`RubricLoader::try_load`].

pub mod error;
pub mod header;
pub mod loader;
pub mod source;


pub use error::RubricError;
pub use loader::{DefaultReason, RubricLoader, RubricOutcome, parse_grid};
pub use source::{Grid, read_grid};

/// One named scoring dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub name: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub weight: f64,
    pub min_words: Option<usize>,
    pub max_words: Option<usize>,
}

impl Criterion {
    pub fn new(name: impl Into<String>, description: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            keywords: Vec::new(),
            weight,
            min_words: None,
            max_words: None,
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_word_bounds(mut self, min_words: Option<usize>, max_words: Option<usize>) -> Self {
        self.min_words = min_words;
        self.max_words = max_words;
        self
    }
}

/// Ordered set of criteria. Names are not required to be unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rubric {
    criteria: Vec<Criterion>,
}

impl Rubric {
    pub fn new(criteria: Vec<Criterion>) -> Self {
        Self { criteria }
    }

    /// The built-in two-criterion rubric (`Content`, `Delivery`).
    pub fn default_rubric() -> Self {
        Self::new(vec![
            Criterion::new(
                "Content",
                "Relevance and substance of the response.",
                50.0,
            )
            .with_keywords(["coding", "music", "sports", "projects"])
            .with_word_bounds(Some(5), None),
            Criterion::new("Delivery", "Clarity and fluency of delivery.", 50.0)
                .with_keywords(["confident", "clear", "engaging"])
                .with_word_bounds(Some(0), None),
        ])
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Criterion> {
        self.criteria.iter()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn descriptions(&self) -> Vec<&str> {
        self.criteria.iter().map(|c| c.description.as_str()).collect()
    }

    /// Sum of criterion weights.
    pub fn total_weight(&self) -> f64 {
        self.criteria.iter().map(|c| c.weight).sum()
    }
}

impl<'a> IntoIterator for &'a Rubric {
    type Item = &'a Criterion;
    type IntoIter = std::slice::Iter<'a, Criterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.criteria.iter()
    }
}
