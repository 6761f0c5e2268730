/// An ISSN as it appears in source metadata, optionally tagged with the
/// medium it applies to (`print`, `electronic`).
#[derive(Debug, Clone)]
pub struct IssnCandidate {
    pub media_type: Option<String>,
    pub value: String,
}

/// Normalize an ISSN to the `XXXX-XXXX` form.
///
/// Eight bare characters gain the hyphen; nine characters are taken as
/// already hyphenated. Anything else is rejected.
pub fn normalize_issn(input: &str) -> Option<String> {
    let issn = input.trim();
    match issn.len() {
        9 if issn.as_bytes()[4] == b'-' && valid_issn_chars(&issn.replace('-', "")) => {
            Some(issn.to_uppercase())
        }
        8 if valid_issn_chars(issn) => Some(format!(
            "{}-{}",
            &issn[0..4].to_uppercase(),
            &issn[4..8].to_uppercase()
        )),
        _ => None,
    }
}

/// Pick one ISSN out of a candidate list. A sole candidate is taken as is;
/// among several only the electronic one counts, and a list without an
/// electronic entry yields nothing.
pub fn pick_issn(candidates: &[IssnCandidate]) -> Option<String> {
    let chosen = match candidates {
        [only] => Some(only),
        many => many
            .iter()
            .find(|c| c.media_type.as_deref() == Some("electronic")),
    };
    chosen.and_then(|c| normalize_issn(&c.value))
}

fn valid_issn_chars(issn: &str) -> bool {
    let bytes = issn.as_bytes();
    bytes.len() == 8
        && bytes[..7].iter().all(u8::is_ascii_digit)
        && matches!(bytes[7], b'0'..=b'9' | b'X' | b'x')
}
