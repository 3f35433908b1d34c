//! Input patterns, their failure messages and normalizers.

use std::sync::LazyLock;

use regex::Regex;

use super::Pattern;

const NAME_SEGMENT: &str = "[ぁ-んァ-ンー一-龥a-zA-Z]{1,30}";
const KANA_SEGMENT: &str = "[ァ-ンー]{1,30}";

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{NAME_SEGMENT} {NAME_SEGMENT}$")).expect("name pattern compiles")
});

static FURIGANA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{KANA_SEGMENT} {KANA_SEGMENT}$")).expect("furigana pattern compiles")
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"#,
    )
    .expect("email pattern compiles")
});

// Character set only; class diversity is the password rule's custom check.
static PASSWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^[A-Za-z0-9!@#$%^&*(),.?":{}|<>]{8,}$"#).expect("password pattern compiles")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0[0-9]{9,10}$").expect("phone pattern compiles"));

static POSTCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{7}$").expect("postcode pattern compiles"));

pub const NAME_MESSAGE: &str = "姓と名の間にスペースを入れて入力してください";
pub const FURIGANA_MESSAGE: &str = "姓と名の間にスペースを入れて、カタカナで入力してください";
pub const EMAIL_MESSAGE: &str = "正しいメールアドレスの形式で入力してください";
pub const PASSWORD_MESSAGE: &str = "8文字以上の半角英数字・記号で入力してください";
pub const PHONE_MESSAGE: &str = "正しい電話番号の形式で入力してください（ハイフンなし）";
pub const POSTCODE_MESSAGE: &str = "7桁の数字で入力してください（ハイフンなし）";

const IDEOGRAPHIC_SPACE: char = '\u{3000}';

/// Full-width space to half-width, then trim.
pub fn normalize_name(value: &str) -> String {
    value.replace(IDEOGRAPHIC_SPACE, " ").trim().to_string()
}

/// Hiragana to katakana, full-width space to half-width, then trim.
pub fn normalize_furigana(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            'ぁ'..='ん' => char::from_u32(c as u32 + 0x60).unwrap_or(c),
            IDEOGRAPHIC_SPACE => ' ',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Lowercase and trim.
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Drop hyphens and whitespace.
pub fn strip_separators(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect()
}

pub fn name() -> Pattern {
    Pattern::new(NAME_RE.clone(), NAME_MESSAGE).normalized_by(normalize_name)
}

pub fn furigana() -> Pattern {
    Pattern::new(FURIGANA_RE.clone(), FURIGANA_MESSAGE).normalized_by(normalize_furigana)
}

pub fn email() -> Pattern {
    Pattern::new(EMAIL_RE.clone(), EMAIL_MESSAGE).normalized_by(normalize_email)
}

pub fn password() -> Pattern {
    Pattern::new(PASSWORD_RE.clone(), PASSWORD_MESSAGE)
}

pub fn phone() -> Pattern {
    Pattern::new(PHONE_RE.clone(), PHONE_MESSAGE).normalized_by(strip_separators)
}

pub fn postcode() -> Pattern {
    Pattern::new(POSTCODE_RE.clone(), POSTCODE_MESSAGE).normalized_by(strip_separators)
}
