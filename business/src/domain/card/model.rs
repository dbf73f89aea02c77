use serde::{Deserialize, Serialize};

use super::errors::CardError;

/// Card fields read from a photo. All zeros when nothing was recognized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub number: i64,
    pub expiry_month: u32,
    /// Two-digit year as printed on the card.
    pub expiry_year: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
}

impl Word {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLine {
    pub words: Vec<Word>,
}

impl TextLine {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Word::new).collect(),
        }
    }
}

/// A block of text as segmented by the OCR service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRegion {
    pub lines: Vec<TextLine>,
}

impl TextRegion {
    pub fn new(lines: Vec<TextLine>) -> Self {
        Self { lines }
    }
}

/// Accepted bank identification number prefixes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    entries: Vec<String>,
}

impl ProductFilter {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when some accepted entry starts with `fragment`.
    ///
    /// The test runs filter-entry-first: OCR splits the printed number into
    /// short groups, and each group is checked as a prefix of a longer BIN.
    pub fn accepts_fragment(&self, fragment: &str) -> bool {
        self.entries.iter().any(|entry| entry.starts_with(fragment))
    }
}

impl<S: Into<String>> FromIterator<S> for ProductFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Opaque OCR service token.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceCredential(String);

impl ServiceCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for ServiceCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ServiceCredential(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u32);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything a platform capture flow needs to read one card.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    pub request_id: RequestId,
    pub product_filter: ProductFilter,
    pub credential: ServiceCredential,
}

#[derive(Debug)]
pub enum CaptureOutcome {
    Success(Card),
    Error(CardError),
    Cancelled,
}

/// The terminal event of a capture flow.
#[derive(Debug)]
pub struct CaptureEvent {
    pub request_id: RequestId,
    pub outcome: CaptureOutcome,
}

impl CaptureEvent {
    pub fn success(request_id: RequestId, card: Card) -> Self {
        Self {
            request_id,
            outcome: CaptureOutcome::Success(card),
        }
    }

    pub fn error(request_id: RequestId, error: CardError) -> Self {
        Self {
            request_id,
            outcome: CaptureOutcome::Error(error),
        }
    }

    pub fn cancelled(request_id: RequestId) -> Self {
        Self {
            request_id,
            outcome: CaptureOutcome::Cancelled,
        }
    }
}
