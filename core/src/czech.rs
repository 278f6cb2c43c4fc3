//! Light Czech stemmer: strips case endings and possessive suffixes, then
//! normalises a handful of palatalised consonants.
//!
//! Follows the light stemmer of L. Dolamic and J. Savoy, "Indexing and
//! stemming approaches for the Czech language", Information Processing &
//! Management 45(6), 2009, rule for rule as shipped in Lucene's
//! `org.apache.lucene.analysis.cz.CzechStemmer`. Lengths are counted in chars.

const CASE_5: &[&str] = &["atech"];
const CASE_4: &[&str] = &["ětem", "etem", "atům"];
const CASE_3: &[&str] = &[
    "ech", "ich", "ích", "ého", "ěmi", "emi", "ému", "ěte", "ete", "ěti", "eti", "ího", "iho",
    "ími", "ímu", "imu", "ách", "ata", "aty", "ých", "ama", "ami", "ové", "ovi", "ými",
];
const CASE_2: &[&str] = &["em", "es", "ém", "ím", "ům", "at", "ám", "os", "us", "ým", "mi", "ou"];
const CASE_1: &[char] = &['a', 'e', 'i', 'o', 'u', 'ů', 'y', 'á', 'é', 'í', 'ý', 'ě'];
const POSSESSIVE: &[&str] = &["ov", "in", "ův"];

pub fn stem(word: &str) -> String {
    let mut chars: Vec<char> = word.chars().collect();
    let len = remove_case(&chars);
    chars.truncate(len);
    let len = remove_possessives(&chars);
    chars.truncate(len);
    if !chars.is_empty() {
        normalize(&mut chars);
    }
    chars.into_iter().collect()
}

fn ends_with(chars: &[char], suffix: &str) -> bool {
    let suffix: Vec<char> = suffix.chars().collect();
    chars.ends_with(&suffix)
}

fn ends_with_any(chars: &[char], suffixes: &[&str]) -> bool {
    suffixes.iter().any(|s| ends_with(chars, s))
}

fn remove_case(chars: &[char]) -> usize {
    let len = chars.len();
    if len > 7 && ends_with_any(chars, CASE_5) {
        return len - 5;
    }
    if len > 6 && ends_with_any(chars, CASE_4) {
        return len - 4;
    }
    if len > 5 && ends_with_any(chars, CASE_3) {
        return len - 3;
    }
    if len > 4 && ends_with_any(chars, CASE_2) {
        return len - 2;
    }
    if len > 3 && chars.last().is_some_and(|c| CASE_1.contains(c)) {
        return len - 1;
    }
    len
}

fn remove_possessives(chars: &[char]) -> usize {
    let len = chars.len();
    if len > 5 && ends_with_any(chars, POSSESSIVE) {
        return len - 2;
    }
    len
}

fn normalize(chars: &mut Vec<char>) {
    let len = chars.len();
    if ends_with(chars, "čt") {
        chars[len - 2] = 'c';
        chars[len - 1] = 'k';
        return;
    }
    if ends_with(chars, "št") {
        chars[len - 2] = 's';
        chars[len - 1] = 'k';
        return;
    }
    match chars[len - 1] {
        'c' | 'č' => {
            chars[len - 1] = 'k';
            return;
        }
        'z' | 'ž' => {
            chars[len - 1] = 'h';
            return;
        }
        _ => {}
    }
    if len > 1 && chars[len - 2] == 'e' {
        // e* -> *
        chars.remove(len - 2);
        return;
    }
    if len > 2 && chars[len - 2] == 'ů' {
        chars[len - 2] = 'o';
    }
}
