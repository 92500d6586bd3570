//! Name normalization.

/// Render a name to title case for display uniformity.
///
/// Receipts print names in inconsistent casing (all caps on bank slips,
/// mixed case on app receipts). Scripts without case (Amharic) pass
/// through unchanged.
pub fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn uppercase_bank_names() {
        assert_eq!(title_case("ABEBE KEBEDE WORKU"), "Abebe Kebede Worku");
    }

    #[test]
    fn mixed_case_and_extra_spaces() {
        assert_eq!(title_case("  sara   tesfaye "), "Sara Tesfaye");
    }

    #[test]
    fn amharic_passes_through() {
        assert_eq!(title_case("አበበ ከበደ"), "አበበ ከበደ");
    }
}
