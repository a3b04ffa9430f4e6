/// Lowercase the string and collapse every whitespace run to a single space.
pub fn normalize(s: &str) -> String {
    let lower = s.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    for word in lower.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_collapses() {
        assert_eq!(normalize("EAGLE   Peak\n\tBOURBON"), "eagle peak bourbon");
    }

    #[test]
    fn trims_edges() {
        assert_eq!(normalize("  Eagle Peak  "), "eagle peak");
        assert_eq!(normalize(" \n "), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn idempotent() {
        for s in ["A  b\nC", "  x ", "", "45% Alc./Vol.\r\n750 mL"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }
}
