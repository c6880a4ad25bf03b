//! # Address Normalization
//!
//! Pure text cleanup for street addresses, isolated from the analytic
//! core so it can be tested without any registry in the loop. The parcel
//! registry stores addresses in an uppercase, unpunctuated house style
//! with bare street numbers ("522 EAST 5 STREET"); user input arrives in
//! every other style ("522 E. 5th St"). [`normalize`] maps the latter to
//! the former.
//!
//! Only the final token is treated as a street-suffix abbreviation, so
//! "ST MARKS PLACE" keeps its saint while "5TH ST" becomes "5 STREET".

/// Normalize a free-text address into the registry's house style:
/// uppercase, punctuation stripped, whitespace collapsed, directionals
/// and the trailing street suffix expanded, ordinal suffixes removed
/// from numeric tokens.
pub fn normalize(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| match c {
            '.' | ',' | '#' => ' ',
            _ => c,
        })
        .collect();

    let tokens: Vec<String> = cleaned
        .split_whitespace()
        .map(|t| t.to_ascii_uppercase())
        .collect();
    let last = tokens.len().saturating_sub(1);

    tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            if let Some(dir) = expand_directional(token) {
                return dir.to_string();
            }
            if i == last {
                if let Some(suffix) = expand_suffix(token) {
                    return suffix.to_string();
                }
            }
            strip_ordinal(token)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The shortened query form: leading house number plus the first two
/// street-name tokens. Used as a last-resort lookup when the full
/// normalized address finds nothing. Returns `None` when the address
/// does not start with a house number or has no street tokens.
pub fn short_form(normalized: &str) -> Option<String> {
    let mut tokens = normalized.split_whitespace();
    let number = tokens.next()?;
    if !number.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
        return None;
    }
    let street: Vec<&str> = tokens.take(2).collect();
    if street.is_empty() {
        return None;
    }
    Some(format!("{} {}", number, street.join(" ")))
}

fn expand_directional(token: &str) -> Option<&'static str> {
    match token {
        "E" => Some("EAST"),
        "W" => Some("WEST"),
        "N" => Some("NORTH"),
        "S" => Some("SOUTH"),
        _ => None,
    }
}

fn expand_suffix(token: &str) -> Option<&'static str> {
    match token {
        "ST" | "STR" => Some("STREET"),
        "AVE" | "AV" => Some("AVENUE"),
        "BLVD" => Some("BOULEVARD"),
        "PL" => Some("PLACE"),
        "RD" => Some("ROAD"),
        "DR" => Some("DRIVE"),
        "LN" => Some("LANE"),
        "CT" => Some("COURT"),
        "PKWY" => Some("PARKWAY"),
        "TER" => Some("TERRACE"),
        "SQ" => Some("SQUARE"),
        "HTS" => Some("HEIGHTS"),
        _ => None,
    }
}

/// "5TH" -> "5", "23RD" -> "23"; non-ordinal tokens pass through.
fn strip_ordinal(token: &str) -> String {
    for suffix in ["ST", "ND", "RD", "TH"] {
        if let Some(stem) = token.strip_suffix(suffix) {
            if !stem.is_empty() && stem.bytes().all(|b| b.is_ascii_digit()) {
                return stem.to_string();
            }
        }
    }
    token.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_expands_directional_and_suffix() {
        assert_eq!(normalize("522 E. 5th St"), "522 EAST 5 STREET");
    }

    #[test]
    fn normalize_collapses_whitespace_and_uppercases() {
        assert_eq!(normalize("  100   west  72nd   street "), "100 WEST 72 STREET");
    }

    #[test]
    fn normalize_only_expands_suffix_on_final_token() {
        // "ST" mid-address is Saint, not Street.
        assert_eq!(normalize("12 St Marks Pl"), "12 ST MARKS PLACE");
    }

    #[test]
    fn normalize_strips_punctuation() {
        assert_eq!(normalize("30 Rockefeller Plaza, #5"), "30 ROCKEFELLER PLAZA 5");
    }

    #[test]
    fn normalize_leaves_non_ordinal_tokens_alone() {
        // FIRST ends in "ST" but is not a numeric ordinal.
        assert_eq!(normalize("99 First Ave"), "99 FIRST AVENUE");
    }

    #[test]
    fn short_form_takes_number_and_two_street_tokens() {
        assert_eq!(
            short_form("522 EAST 5 STREET").as_deref(),
            Some("522 EAST 5")
        );
        assert_eq!(
            short_form("30 ROCKEFELLER PLAZA").as_deref(),
            Some("30 ROCKEFELLER PLAZA")
        );
    }

    #[test]
    fn short_form_requires_leading_house_number() {
        assert!(short_form("EAST 5 STREET").is_none());
        assert!(short_form("522").is_none());
    }

    #[test]
    fn short_form_accepts_queens_hyphenated_numbers() {
        assert_eq!(
            short_form("37-11 35 AVENUE").as_deref(),
            Some("37-11 35 AVENUE")
        );
    }
}
