//! Pure matchers over the TimeGuessr share-message grammar. Each function is
//! total over arbitrary input; a non-match is `false`/`None`, never an error.

use crate::constants::{
    CALENDAR_MARKER, GAME_HEADER, GLOBE_MARKER, HIGH_MARKER, HIGH_MARKER_POINTS, MID_MARKER,
    MID_MARKER_POINTS, PRESENTATION_SELECTOR, SCORE_TRAILER, SYMBOLS_PER_CLUSTER,
};
use crate::db::models::RoundScore;
use crate::parsing::lexer::Lexer;

/// Does the message contain a result header: `TimeGuessr #NNN S,SSS/50,000`
/// with a 3-4 digit game index and a comma-grouped score?
pub fn is_result_header(text: &str) -> bool {
    let Some(idx) = text.find(GAME_HEADER) else {
        return false;
    };

    let mut lexer = Lexer::new(&text[idx + GAME_HEADER.len()..]);

    let Some(game_index) = lexer.take_digits() else {
        return false;
    };
    if !(3..=4).contains(&game_index.len()) {
        return false;
    }

    if !lexer.eat(' ') {
        return false;
    }

    // score shaped `d{1,2},d{3}` directly before the max-score trailer
    let Some(thousands) = lexer.take_digits() else {
        return false;
    };
    if !(1..=2).contains(&thousands.len()) || !lexer.eat(',') {
        return false;
    }

    match lexer.take_digits() {
        Some(units) if units.len() == 3 => lexer.eat_str(SCORE_TRAILER),
        _ => false,
    }
}

/// Extract the aggregate score: the digits-and-commas run immediately
/// preceding the `/50,000` trailer, commas stripped.
pub fn total_score(text: &str) -> Option<u32> {
    let end = text.find(SCORE_TRAILER)?;
    let head = &text[..end];

    let start = head
        .char_indices()
        .rev()
        .take_while(|(_, ch)| ch.is_ascii_digit() || *ch == ',')
        .last()
        .map(|(idx, _)| idx)?;

    let cleaned: String = head[start..].chars().filter(|ch| *ch != ',').collect();
    cleaned.parse().ok()
}

/// Match one per-round line: a leading globe marker, a 3-symbol location
/// cluster, a calendar marker, then a 3-symbol date cluster. Anything else is
/// ignored (`None`).
pub fn round_line(line: &str) -> Option<RoundScore> {
    let mut lexer = Lexer::new(line.trim());

    if !lexer.eat(GLOBE_MARKER) {
        return None;
    }

    let location = lexer.next_until(&[CALENDAR_MARKER])?;
    if !lexer.eat(CALENDAR_MARKER) {
        return None;
    }
    let date = lexer.rest()?;

    Some(RoundScore {
        location_score: cluster_score(location)?,
        date_score: cluster_score(date)?,
    })
}

/// Score a marker cluster: 2 points per high marker, 1 per mid, 0 otherwise.
/// Presentation selectors are stripped before measuring; a cluster must hold
/// exactly 3 symbols or it is rejected.
pub fn cluster_score(cluster: &str) -> Option<u8> {
    let symbols: Vec<char> = cluster
        .trim()
        .chars()
        .filter(|ch| *ch != PRESENTATION_SELECTOR)
        .collect();

    if symbols.len() != SYMBOLS_PER_CLUSTER {
        return None;
    }

    Some(
        symbols
            .iter()
            .map(|symbol| match *symbol {
                HIGH_MARKER => HIGH_MARKER_POINTS,
                MID_MARKER => MID_MARKER_POINTS,
                _ => 0,
            })
            .sum(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_matches_share_message() {
        assert!(is_result_header("TimeGuessr #412 49,543/50,000"));
        assert!(is_result_header(
            "check it out!! TimeGuessr #1024 5,000/50,000 🌎"
        ));
    }

    #[test]
    fn header_rejects_near_misses() {
        // game index too short
        assert!(!is_result_header("TimeGuessr #42 49,543/50,000"));
        // no comma grouping in the score
        assert!(!is_result_header("TimeGuessr #412 995/50,000"));
        // wrong trailer
        assert!(!is_result_header("TimeGuessr #412 49,543/25,000"));
        assert!(!is_result_header("just chatting about TimeGuessr"));
    }

    #[test]
    fn total_score_reads_run_before_trailer() {
        assert_eq!(total_score("TimeGuessr #412 49,543/50,000"), Some(49_543));
        assert_eq!(total_score("scored 5,000/50,000 today"), Some(5_000));
        assert_eq!(total_score("no score here /50,000"), None);
        assert_eq!(total_score("nothing at all"), None);
    }

    #[test]
    fn cluster_scoring() {
        assert_eq!(cluster_score("🟩🟩🟩"), Some(6));
        assert_eq!(cluster_score("🟨🟨🟨"), Some(3));
        assert_eq!(cluster_score("🟩🟩⬛"), Some(4));
        assert_eq!(cluster_score("⬛⬛⬛"), Some(0));
    }

    #[test]
    fn cluster_strips_presentation_selectors() {
        assert_eq!(cluster_score("🟩\u{fe0f}🟩\u{fe0f}🟨\u{fe0f}"), Some(5));
    }

    #[test]
    fn cluster_requires_exactly_three_symbols() {
        assert_eq!(cluster_score("🟩🟩"), None);
        assert_eq!(cluster_score("🟩🟩🟩🟩"), None);
        assert_eq!(cluster_score(""), None);
    }

    #[test]
    fn round_line_happy_path() {
        let round = round_line("🌎🟩🟩🟨 📅🟨🟨⬛").unwrap();
        assert_eq!(round.location_score, 5);
        assert_eq!(round.date_score, 2);
    }

    #[test]
    fn round_line_tolerates_padding_and_selectors() {
        let round = round_line("  🌎\u{fe0f}🟩🟩🟩 📅🟩🟩🟩  ").unwrap();
        assert_eq!(round.location_score, 6);
        assert_eq!(round.date_score, 6);
    }

    #[test]
    fn round_line_rejects_malformed_lines() {
        assert!(round_line("🟩🟩🟩 📅🟩🟩🟩").is_none());
        assert!(round_line("🌎🟩🟩 📅🟩🟩🟩").is_none());
        assert!(round_line("🌎🟩🟩🟩 🟩🟩🟩").is_none());
        assert!(round_line("TimeGuessr #412 49,543/50,000").is_none());
        assert!(round_line("").is_none());
    }
}
