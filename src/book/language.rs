use isolang::Language;

/// ISO 639-2 tag for the subtitle stream of `name`.
///
/// Accepts ISO 639-1 codes (`en`), ISO 639-2 codes in either the T (`deu`)
/// or B (`ger`) form and English language names (`german`). Anything else is
/// passed through unchanged.
pub fn subtitle_language_tag(name: &str) -> String {
    let normalized = name.trim().to_lowercase();

    let language = match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(terminology_code(&normalized)),
        _ => None,
    }
    .or_else(|| Language::from_name(&capitalize(&normalized)));

    match language {
        Some(language) => language.to_639_3().to_string(),
        None => name.trim().to_string(),
    }
}

/// Map ISO 639-2/B bibliographic codes to their terminology form.
fn terminology_code(code: &str) -> &str {
    match code {
        "alb" => "sqi",
        "arm" => "hye",
        "baq" => "eus",
        "bur" => "mya",
        "chi" => "zho",
        "cze" => "ces",
        "dut" => "nld",
        "fre" => "fra",
        "geo" => "kat",
        "ger" => "deu",
        "gre" => "ell",
        "ice" => "isl",
        "mac" => "mkd",
        "mao" => "mri",
        "may" => "msa",
        "per" => "fas",
        "rum" => "ron",
        "slo" => "slk",
        "tib" => "bod",
        "wel" => "cym",
        other => other,
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_letter_codes_become_three_letter() {
        assert_eq!(subtitle_language_tag("en"), "eng");
        assert_eq!(subtitle_language_tag("DE"), "deu");
    }

    #[test]
    fn three_letter_codes_pass() {
        assert_eq!(subtitle_language_tag("fra"), "fra");
    }

    #[test]
    fn bibliographic_codes_become_terminology_codes() {
        assert_eq!(subtitle_language_tag("ger"), "deu");
        assert_eq!(subtitle_language_tag("fre"), "fra");
        assert_eq!(subtitle_language_tag("CHI"), "zho");
        assert_eq!(subtitle_language_tag("dut"), "nld");
    }

    #[test]
    fn english_names_are_resolved() {
        assert_eq!(subtitle_language_tag("german"), "deu");
        assert_eq!(subtitle_language_tag("Spanish"), "spa");
    }

    #[test]
    fn unknown_names_pass_through() {
        assert_eq!(subtitle_language_tag("klingon-v2"), "klingon-v2");
    }
}
