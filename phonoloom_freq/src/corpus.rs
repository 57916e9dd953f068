// Transcription-corpus preparation helpers.
//
// Raw pronunciation-dictionary lines carry their transcriptions between
// slashes (`cat /kat/`), mark long sounds with a length sign rather than a
// doubled symbol, and may carry stress marks. These helpers normalize such
// text into the plain symbol sequences the frequency model consumes. They
// are deliberately the whole extent of the crate's input handling: callers
// read files and pass strings; no I/O happens here.
//
// All of this is plain character scanning — the shapes involved (single
// delimiter pairs, mark-after-symbol) don't warrant a pattern engine.

use crate::model::FreqModel;

/// Replace a length-marked symbol with a doubled symbol: `aː` (or ASCII
/// `a:`) becomes `aa`. A mark with no preceding symbol is kept as-is.
pub fn expand_length_marks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous: Option<char> = None;
    for ch in text.chars() {
        if ch == 'ː' || ch == ':' {
            match previous.take() {
                Some(symbol) => out.push(symbol),
                None => out.push(ch),
            }
        } else {
            out.push(ch);
            previous = Some(ch);
        }
    }
    out
}

/// Remove primary (`ˈ`) and secondary (`ˌ`) stress marks.
pub fn strip_stress_marks(text: &str) -> String {
    text.chars().filter(|&c| c != 'ˈ' && c != 'ˌ').collect()
}

/// Extract slash-delimited transcription spans, in order.
///
/// Spans never cross line boundaries, and an empty pair (`//`) opens a new
/// span at its second slash rather than yielding an empty string. An
/// opener with no closer on its line is dropped.
pub fn extract_transcriptions(text: &str) -> Vec<String> {
    let mut spans = Vec::new();
    for line in text.lines() {
        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            if chars[i] != '/' {
                i += 1;
                continue;
            }
            let Some(close) = chars[i + 1..].iter().position(|&c| c == '/') else {
                tracing::debug!(line, "unterminated transcription delimiter");
                break;
            };
            let close = i + 1 + close;
            if close > i + 1 {
                spans.push(chars[i + 1..close].iter().collect());
                i = close + 1;
            } else {
                // Empty pair: the second slash may open the next span.
                i = close;
            }
        }
    }
    spans
}

/// Record every adjacent symbol pair of a transcription as a two-label
/// path, building a bigram distribution on top of the trie.
pub fn count_bigrams(model: &mut FreqModel, transcription: &str) {
    let symbols: Vec<char> = transcription.chars().collect();
    for pair in symbols.windows(2) {
        model.insert(&format!("{} {}", pair[0], pair[1]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_length_marks() {
        assert_eq!(expand_length_marks("aːb"), "aab");
        assert_eq!(expand_length_marks("a:b"), "aab");
        assert_eq!(expand_length_marks("kat"), "kat");
    }

    #[test]
    fn test_expand_length_marks_consumes_the_pair() {
        // A doubled mark only doubles once; the second mark has no
        // preceding symbol left and stays.
        assert_eq!(expand_length_marks("aːː"), "aaː");
        // A leading mark has nothing to double.
        assert_eq!(expand_length_marks("ːa"), "ːa");
    }

    #[test]
    fn test_strip_stress_marks() {
        assert_eq!(strip_stress_marks("ˈkatˌlog"), "katlog");
        assert_eq!(strip_stress_marks("kat"), "kat");
    }

    #[test]
    fn test_extract_transcriptions() {
        let text = "cat /kat/\ndog /dɔg/ also /dog/\n";
        assert_eq!(extract_transcriptions(text), vec!["kat", "dɔg", "dog"]);
    }

    #[test]
    fn test_extract_skips_empty_pair() {
        assert_eq!(extract_transcriptions("//x/"), vec!["x"]);
    }

    #[test]
    fn test_extract_drops_unterminated_span() {
        assert_eq!(extract_transcriptions("word /ka"), Vec::<String>::new());
        // The break is per-line; later lines still match.
        assert_eq!(extract_transcriptions("word /ka\n/to/"), vec!["to"]);
    }

    #[test]
    fn test_extract_does_not_cross_lines() {
        assert_eq!(extract_transcriptions("/ka\nt/"), Vec::<String>::new());
    }

    #[test]
    fn test_count_bigrams() {
        let mut model = FreqModel::new();
        count_bigrams(&mut model, "kat");
        count_bigrams(&mut model, "kad");

        assert_eq!(model.total(), 4);
        assert_eq!(model.lookup(&["k"]).unwrap().total(), 2);
        assert_eq!(model.lookup(&["a"]).unwrap().total(), 2);
        assert_eq!(model.lookup(&["a", "t"]).unwrap().total(), 1);
        assert_eq!(
            model.conditional_probability(&["a", "t"], Some(&["a"])).unwrap(),
            0.5
        );
    }

    #[test]
    fn test_count_bigrams_short_input() {
        let mut model = FreqModel::new();
        count_bigrams(&mut model, "k");
        count_bigrams(&mut model, "");
        assert_eq!(model.total(), 0);
    }

    #[test]
    fn test_pipeline_composes() {
        let raw = "seat /siːt/\nˈcity /ˈsiti/\n";
        let mut model = FreqModel::new();
        for span in extract_transcriptions(&expand_length_marks(raw)) {
            count_bigrams(&mut model, &strip_stress_marks(&span));
        }
        // "siit" yields s-i, i-i, i-t; "siti" yields s-i, i-t, t-i.
        assert_eq!(model.lookup(&["s", "i"]).unwrap().total(), 2);
        assert_eq!(model.lookup(&["i", "i"]).unwrap().total(), 1);
        assert_eq!(model.lookup(&["i", "t"]).unwrap().total(), 2);
    }
}
