//! Review corpus lookup.
//!
//! The corpus is a line-oriented file where each line reads
//! `<RestaurantName>. <ReviewText>`. Names match case-insensitively.

use crate::call::Value;
use crate::error::{AvaliadorError, Result};
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// Reviews found for one restaurant, keyed by the name as requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSet {
    pub restaurant_name: String,
    pub reviews: Vec<String>,
}

impl ReviewSet {
    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    /// All reviews, one per line.
    pub fn joined(&self) -> String {
        self.reviews.join("\n")
    }

    /// `{name: [reviews]}`, or an empty mapping when nothing was found.
    pub fn to_value(&self) -> Value {
        if self.is_empty() {
            return Value::Map(Vec::new());
        }
        Value::Map(vec![(
            self.restaurant_name.clone(),
            Value::str_list(&self.reviews),
        )])
    }
}

impl fmt::Display for ReviewSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    review: String,
}

/// In-memory copy of the review corpus.
#[derive(Debug, Clone, Default)]
pub struct ReviewStore {
    entries: Vec<Entry>,
}

impl ReviewStore {
    /// Load the corpus at `path`.
    ///
    /// A missing file gives an empty store (every lookup then finds
    /// nothing). Any other read failure is an error.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match tokio::fs::read_to_string(path).await {
            Ok(text) => {
                let store = Self::from_text(&text);
                debug!(path = %path.display(), entries = store.len(), "Loaded review corpus");
                Ok(store)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Review corpus not found, lookups will be empty");
                Ok(Self::default())
            }
            Err(e) => Err(AvaliadorError::Reviews(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Build a store from corpus text. Blank lines and lines without a
    /// `". "` separator are skipped.
    pub fn from_text(text: &str) -> Self {
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| line.split_once(". "))
            .map(|(name, review)| Entry {
                name: name.to_string(),
                review: review.to_string(),
            })
            .collect();

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All reviews for `restaurant_name`, in corpus order.
    pub fn fetch(&self, restaurant_name: &str) -> ReviewSet {
        let wanted = restaurant_name.to_lowercase();
        let reviews = self
            .entries
            .iter()
            .filter(|entry| entry.name.to_lowercase() == wanted)
            .map(|entry| entry.review.clone())
            .collect();

        ReviewSet {
            restaurant_name: restaurant_name.to_string(),
            reviews,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CORPUS: &str = "\
Estação Barão. A comida do Estação Barão foi mediana, sem nada particularmente marcante.
Applebee's. A comida foi boa e o atendimento agradável.

linha sem separador
estação barão. O atendimento foi incrível, garçons muito atenciosos.
";

    #[test]
    fn test_fetch_case_insensitive_keeps_requested_name() {
        let store = ReviewStore::from_text(CORPUS);
        let set = store.fetch("ESTAÇÃO BARÃO");
        assert_eq!(set.restaurant_name, "ESTAÇÃO BARÃO");
        assert_eq!(set.reviews.len(), 2);
        assert!(set.reviews[0].starts_with("A comida do Estação Barão"));
        assert!(set.reviews[1].starts_with("O atendimento foi incrível"));
    }

    #[test]
    fn test_skips_blank_and_malformed_lines() {
        let store = ReviewStore::from_text(CORPUS);
        assert_eq!(store.len(), 3);
        assert!(store.fetch("linha sem separador").is_empty());
    }

    #[test]
    fn test_splits_on_first_separator_only() {
        let store = ReviewStore::from_text("Bar. Ótimo. Voltarei. Sempre.");
        assert_eq!(store.fetch("bar").reviews, vec!["Ótimo. Voltarei. Sempre."]);
    }

    #[test]
    fn test_empty_set_renders_as_empty_map() {
        let set = ReviewStore::default().fetch("Nenhum");
        assert!(set.is_empty());
        assert_eq!(set.to_string(), "{}");
    }

    #[test]
    fn test_render_and_join() {
        let store = ReviewStore::from_text(CORPUS);
        let set = store.fetch("Applebee's");
        assert_eq!(
            set.to_string(),
            r"{'Applebee\'s': ['A comida foi boa e o atendimento agradável.']}"
        );
        assert_eq!(set.joined(), "A comida foi boa e o atendimento agradável.");
    }

    #[tokio::test]
    async fn test_open_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CORPUS.as_bytes()).unwrap();

        let store = ReviewStore::open(file.path()).await.unwrap();
        assert_eq!(store.fetch("estação barão").reviews.len(), 2);
    }

    #[tokio::test]
    async fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReviewStore::open(dir.path().join("restaurantes.txt")).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_open_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReviewStore::open(dir.path()).await.unwrap_err();
        assert!(matches!(err, AvaliadorError::Reviews(_)));
    }
}
