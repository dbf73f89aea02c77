use serde::Deserialize;

use business::domain::card::model::{TextLine, TextRegion, Word};

/// OCR response body. Bounding boxes and orientation are not needed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResponseDto {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub regions: Option<Vec<RegionDto>>,
}

#[derive(Debug, Deserialize)]
pub struct RegionDto {
    #[serde(default)]
    pub lines: Vec<LineDto>,
}

#[derive(Debug, Deserialize)]
pub struct LineDto {
    #[serde(default)]
    pub words: Vec<WordDto>,
}

#[derive(Debug, Deserialize)]
pub struct WordDto {
    pub text: String,
}

impl OcrResponseDto {
    pub fn into_regions(self) -> Vec<TextRegion> {
        self.regions
            .unwrap_or_default()
            .into_iter()
            .map(TextRegion::from)
            .collect()
    }
}

impl From<RegionDto> for TextRegion {
    fn from(dto: RegionDto) -> Self {
        TextRegion::new(dto.lines.into_iter().map(TextLine::from).collect())
    }
}

impl From<LineDto> for TextLine {
    fn from(dto: LineDto) -> Self {
        TextLine {
            words: dto.words.into_iter().map(|w| Word::new(w.text)).collect(),
        }
    }
}

/// Error body; newer API versions nest it under `error`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBodyDto {
    #[serde(default)]
    pub error: Option<ErrorDetailDto>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetailDto {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBodyDto {
    /// Best human-readable message, falling back to the raw body.
    pub fn message_or(self, raw: &str) -> String {
        self.error
            .and_then(|e| e.message.or(e.code))
            .or(self.message)
            .or(self.code)
            .unwrap_or_else(|| raw.to_string())
    }
}
