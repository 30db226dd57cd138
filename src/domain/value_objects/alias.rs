use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Folds an alias into the key used for catalog-wide uniqueness checks.
///
/// Lowercases, decomposes (NFD) and strips Latin combining accents, then
/// drops everything that is not alphanumeric, so "Zoë_Plays" and
/// "zoe plays" collide. Marks that carry meaning in other scripts, such as
/// the kana voicing mark, stay attached to their base letter. The result is
/// NFC and stable under re-application.
pub fn normalize_alias(raw: &str) -> String {
    let lowered: String = raw.chars().flat_map(char::to_lowercase).collect();
    let mut key = String::with_capacity(lowered.len());
    let mut base_kept = false;

    for c in lowered.nfd() {
        if is_combining_mark(c) {
            if base_kept && !is_latin_accent(c) {
                key.push(c);
            }
            continue;
        }

        base_kept = match fold_letter(c) {
            Some(folded) => {
                key.push_str(folded);
                true
            }
            None if c.is_alphanumeric() => {
                key.push(c);
                true
            }
            None => false,
        };
    }

    key.nfc().collect()
}

/// Combining Diacritical Marks block: acute, grave, caron, dot below, comma below...
fn is_latin_accent(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}')
}

/// Latin letters with no canonical decomposition.
fn fold_letter(c: char) -> Option<&'static str> {
    let folded = match c {
        'ß' => "ss",
        'æ' => "ae",
        'œ' => "oe",
        'ø' => "o",
        'ł' | 'ŀ' => "l",
        'đ' | 'ð' => "d",
        'ħ' => "h",
        'ı' => "i",
        'ŧ' => "t",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_spacing_and_accents_collapse() {
        assert_eq!(normalize_alias("Zoë_Plays"), "zoeplays");
        assert_eq!(normalize_alias("  zoe plays "), "zoeplays");
        assert_eq!(normalize_alias("ZOÉ-PLAYS!"), "zoeplays");
    }

    #[test]
    fn accents_outside_latin_1_fold_too() {
        assert_eq!(normalize_alias("Trạng"), "trang");
        assert_eq!(normalize_alias("Dǎ Shān"), "dashan");
        assert_eq!(normalize_alias("Ștefan"), "stefan");
        assert_eq!(normalize_alias("Łódź"), "lodz");
        assert_eq!(normalize_alias("İstanbul"), "istanbul");
    }

    #[test]
    fn undecomposable_letters_use_the_fold_table() {
        assert_eq!(normalize_alias("Straße"), "strasse");
        assert_eq!(normalize_alias("Ærøskøbing"), "aeroskobing");
    }

    #[test]
    fn kana_voicing_marks_are_significant() {
        assert_eq!(normalize_alias("デート"), "デート");
        assert_ne!(normalize_alias("デート"), normalize_alias("テート"));
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in [
            "Straße Gaming",
            "Ærøskøbing",
            "Noa★Live",
            "名前 テスト",
            "İstanbul",
            "ガンダム",
            "Nguyễn Thị",
        ] {
            let once = normalize_alias(raw);
            assert_eq!(normalize_alias(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn non_latin_scripts_are_kept() {
        assert_eq!(normalize_alias("名前 テスト"), "名前テスト");
    }

    #[test]
    fn punctuation_only_alias_normalizes_to_empty() {
        assert_eq!(normalize_alias(" -- "), "");
    }
}
