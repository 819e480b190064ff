/// Lowercases and strips the Spanish diacritics that show up in listing cells.
pub(crate) fn fold(value: &str) -> String {
    value
        .replace(['\u{feff}', '\u{200b}'], "")
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

const YES_TOKENS: &[&str] = &["si", "s", "yes", "y", "true", "1", "x"];
const NO_TOKENS: &[&str] = &["no", "n", "false", "0"];

pub(crate) fn is_yes(value: &str) -> bool {
    YES_TOKENS.contains(&fold(value).as_str())
}

pub(crate) fn is_no(value: &str) -> bool {
    NO_TOKENS.contains(&fold(value).as_str())
}

/// Extracts the first number in a cell.
///
/// Accepts currency prefixes (`USD 105.000`), unit suffixes (`70 m²`) and both
/// `.` and `,` as thousands or decimal separators.
pub(crate) fn parse_number(value: &str) -> Option<f64> {
    let chars: Vec<char> = value.chars().collect();
    let start = chars.iter().position(|c| c.is_ascii_digit())?;
    let end = chars[start..]
        .iter()
        .position(|c| !(c.is_ascii_digit() || *c == '.' || *c == ','))
        .map(|offset| start + offset)
        .unwrap_or(chars.len());

    let run: String = chars[start..end].iter().collect();
    let run = run.trim_end_matches(['.', ',']);
    let negative = start > 0 && chars[start - 1] == '-';

    let number = normalize_separators(run).parse::<f64>().ok()?;
    if !number.is_finite() {
        return None;
    }
    Some(if negative { -number } else { number })
}

fn normalize_separators(run: &str) -> String {
    let dots = run.matches('.').count();
    let commas = run.matches(',').count();

    match (dots, commas) {
        (0, 0) => run.to_string(),
        (_, 0) => single_separator(run, '.'),
        (0, _) => single_separator(run, ','),
        _ => {
            // Whichever separator comes last marks the decimals.
            let last_dot = run.rfind('.').unwrap_or(0);
            let last_comma = run.rfind(',').unwrap_or(0);
            if last_dot > last_comma {
                run.replace(',', "")
            } else {
                run.replace('.', "").replace(',', ".")
            }
        }
    }
}

fn single_separator(run: &str, separator: char) -> String {
    let groups: Vec<&str> = run.split(separator).collect();
    let grouped_thousands = groups.len() > 1
        && (1..=3).contains(&groups[0].len())
        && groups[1..].iter().all(|group| group.len() == 3);

    if grouped_thousands {
        groups.concat()
    } else if groups.len() == 2 {
        format!("{}.{}", groups[0], groups[1])
    } else {
        groups.concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_strips_accents_and_case() {
        assert_eq!(fold("  Sí "), "si");
        assert_eq!(fold("\u{feff}CONTRAFRENTE"), "contrafrente");
        assert_eq!(fold("Baños"), "banos");
    }

    #[test]
    fn yes_and_no_tokens_are_exclusive() {
        assert!(is_yes("SI"));
        assert!(is_yes("sí"));
        assert!(!is_yes("no"));
        assert!(is_no("No"));
        assert!(!is_no(""));
        assert!(!is_yes("?"));
        assert!(!is_no("?"));
    }

    #[test]
    fn parse_number_handles_listing_formats() {
        assert_eq!(parse_number("105000"), Some(105000.0));
        assert_eq!(parse_number("USD 105.000"), Some(105000.0));
        assert_eq!(parse_number("U$S 1.250.000"), Some(1250000.0));
        assert_eq!(parse_number("$ 85,000"), Some(85000.0));
        assert_eq!(parse_number("70 m²"), Some(70.0));
        assert_eq!(parse_number("70.5"), Some(70.5));
        assert_eq!(parse_number("70,5"), Some(70.5));
        assert_eq!(parse_number("1.234,56"), Some(1234.56));
        assert_eq!(parse_number("3 ambientes"), Some(3.0));
        assert_eq!(parse_number("-2"), Some(-2.0));
    }

    #[test]
    fn parse_number_rejects_text_without_digits() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("consultar"), None);
        assert_eq!(parse_number("?"), None);
    }
}
