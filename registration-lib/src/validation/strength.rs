//! Password character-class analysis and strength scoring.

/// Symbols counted as the "symbol" character class.
pub const PASSWORD_SYMBOLS: &str = r#"!@#$%^&*(),.?":{}|<>"#;

/// Which character classes a password contains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharClasses {
    pub upper: bool,
    pub lower: bool,
    pub digit: bool,
    pub symbol: bool,
}

impl CharClasses {
    pub fn of(value: &str) -> Self {
        value.chars().fold(Self::default(), |mut classes, c| {
            classes.upper |= c.is_ascii_uppercase();
            classes.lower |= c.is_ascii_lowercase();
            classes.digit |= c.is_ascii_digit();
            classes.symbol |= PASSWORD_SYMBOLS.contains(c);
            classes
        })
    }

    /// Number of distinct classes present (0 to 4).
    pub fn count(&self) -> usize {
        [self.upper, self.lower, self.digit, self.symbol]
            .into_iter()
            .filter(|present| *present)
            .count()
    }
}

/// Strength of a password on a 0 to 5 scale: one point for a length of at
/// least eight characters and one per character class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PasswordStrength {
    score: u8,
}

impl PasswordStrength {
    pub const MAX_SCORE: u8 = 5;

    pub fn evaluate(password: &str) -> Self {
        let long_enough = password.chars().count() >= 8;
        let score = CharClasses::of(password).count() + usize::from(long_enough);
        Self { score: score as u8 }
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    /// Label for a strength meter.
    pub fn label(&self) -> &'static str {
        match self.score {
            0 => "非常に弱い: パスワードの要件を満たしていません",
            1 => "弱い: より複雑なパスワードを設定してください",
            2 => "普通: まだ改善の余地があります",
            3 => "強い: 良好なパスワードです",
            4 => "非常に強い: 非常に安全なパスワードです",
            _ => "完璧: 最高レベルの安全性です",
        }
    }
}
