use super::errors::CardError;
use super::model::{Card, ProductFilter, TextLine, TextRegion};

/// Length of an `MM/YY` expiry token.
const EXPIRY_LEN: usize = 5;

/// Once the number holds exactly this many characters the region is done.
const NUMBER_STOP_LEN: usize = 4;

/// Lines with this many words or fewer never carry the card number.
const MIN_NUMBER_LINE_WORDS: usize = 2;

/// Extracts card fields from OCR regions.
///
/// Business rules:
/// - A line whose first `/`-bearing word is exactly `MM/YY` is the expiry
///   and never feeds the number.
/// - A line with more than two words feeds the number when any of its words
///   is a prefix of an accepted product filter entry; all its words are
///   appended in order.
/// - Regions are scanned in order and a later region overwrites the
///   number or expiry found by an earlier one.
/// - No regions yields a zero card.
pub fn extract(regions: &[TextRegion], filter: &ProductFilter) -> Result<Card, CardError> {
    let mut card = Card::default();

    for region in regions {
        let (number, expiry) = scan_region(region, filter);

        if !number.is_empty() {
            card.number = parse_number(&number)?;
        }
        if !expiry.is_empty() {
            let (month, year) = parse_expiry(&expiry)?;
            card.expiry_month = month;
            card.expiry_year = year;
        }
    }

    Ok(card)
}

fn scan_region(region: &TextRegion, filter: &ProductFilter) -> (String, String) {
    let mut number = String::new();
    let mut expiry = String::new();

    for line in &region.lines {
        if let Some(token) = expiry_token(line) {
            expiry = token.to_string();
            continue;
        }
        if number.chars().count() == NUMBER_STOP_LEN {
            break;
        }
        if line.words.len() <= MIN_NUMBER_LINE_WORDS {
            continue;
        }
        if line
            .words
            .iter()
            .any(|word| filter.accepts_fragment(&word.text))
        {
            for word in &line.words {
                number.push_str(&word.text);
            }
        }
    }

    (number, expiry)
}

fn expiry_token(line: &TextLine) -> Option<&str> {
    line.words
        .iter()
        .find(|word| word.text.contains('/'))
        .map(|word| word.text.as_str())
        .filter(|text| text.chars().count() == EXPIRY_LEN)
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

/// Signs are not digits: `str::parse` would accept a leading `+` or `-`.
fn parse_number(digits: &str) -> Result<i64, CardError> {
    let invalid = || CardError::InvalidNumber(digits.to_string());
    if !is_digits(digits) {
        return Err(invalid());
    }
    digits.parse::<i64>().map_err(|_| invalid())
}

/// Splits `MM/YY` into month and year; the separator is not checked.
fn parse_expiry(expiry: &str) -> Result<(u32, u32), CardError> {
    let chars: Vec<char> = expiry.chars().collect();
    let invalid = || CardError::InvalidExpiry(expiry.to_string());

    let month: String = chars.get(0..2).ok_or_else(invalid)?.iter().collect();
    let year: String = chars.get(3..5).ok_or_else(invalid)?.iter().collect();

    if !is_digits(&month) || !is_digits(&year) {
        return Err(invalid());
    }

    let month = month.parse::<u32>().map_err(|_| invalid())?;
    let year = year.parse::<u32>().map_err(|_| invalid())?;

    Ok((month, year))
}
