//! Password strength estimation
//!
//! Conservative entropy estimate for seed-encryption passwords, based on
//! character class analysis with penalties for common words and repeats.
//!
//! This is a warning system, not a gate: callers may still encrypt with a
//! weak password, they just get told about it.

/// Minimum recommended entropy for seed encryption (bits).
pub const MIN_RECOMMENDED_ENTROPY: f64 = 60.0;

/// Password strength level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    /// < 28 bits — trivially crackable
    Dangerous,
    /// 28–35 bits — vulnerable to targeted attack
    Weak,
    /// 36–59 bits — adequate for casual threats
    Fair,
    /// 60–127 bits — resistant to well-funded attackers
    Strong,
    /// ≥ 128 bits — beyond brute-force
    Excellent,
}

impl PasswordStrength {
    /// Whether this level meets the minimum recommendation.
    pub fn is_recommended(&self) -> bool {
        *self >= Self::Strong
    }
}

/// Result of password entropy analysis.
#[derive(Debug, Clone)]
pub struct PasswordAnalysis {
    /// Estimated entropy in bits.
    pub entropy_bits: f64,
    /// Strength classification.
    pub strength: PasswordStrength,
    /// Whether the password meets the minimum recommendation.
    pub meets_minimum: bool,
}

/// Common weak passwords and words to penalise.
const COMMON_PASSWORDS: &[&str] = &[
    "password", "123456", "12345678", "qwerty", "abc123", "letmein", "iloveyou", "dragon",
    "monero", "bitcoin", "satoshi", "hodl", "seed", "wallet", "crypto",
];

/// Estimate the entropy of a password in bits.
pub fn estimate_entropy(password: &str) -> PasswordAnalysis {
    if password.is_empty() {
        return PasswordAnalysis {
            entropy_bits: 0.0,
            strength: PasswordStrength::Dangerous,
            meets_minimum: false,
        };
    }

    let mut has_lower = false;
    let mut has_upper = false;
    let mut has_digit = false;
    let mut has_symbol = false;
    let mut has_unicode = false;
    for ch in password.chars() {
        if ch.is_ascii_lowercase() {
            has_lower = true;
        } else if ch.is_ascii_uppercase() {
            has_upper = true;
        } else if ch.is_ascii_digit() {
            has_digit = true;
        } else if ch.is_ascii_punctuation() || ch == ' ' {
            has_symbol = true;
        } else {
            has_unicode = true;
        }
    }

    let mut charset_size: f64 = 0.0;
    if has_lower {
        charset_size += 26.0;
    }
    if has_upper {
        charset_size += 26.0;
    }
    if has_digit {
        charset_size += 10.0;
    }
    if has_symbol {
        charset_size += 33.0;
    }
    if has_unicode {
        charset_size += 100.0; // conservative estimate for common Unicode
    }
    charset_size = charset_size.max(1.0);

    let len = password.chars().count() as f64;
    let mut entropy = len * charset_size.log2();

    // Containing a common password caps how much its characters can count.
    let lower = password.to_lowercase();
    if COMMON_PASSWORDS.iter().any(|&cp| lower.contains(cp)) {
        entropy *= 0.5;
    }

    // Heavily repeated characters reduce effective entropy.
    let unique: std::collections::HashSet<char> = password.chars().collect();
    let unique_ratio = unique.len() as f64 / len;
    if unique_ratio < 0.5 {
        entropy -= (1.0 - unique_ratio) * entropy * 0.3;
    }

    // Multi-word passphrases carry more entropy than their characters alone.
    let word_count = password.split_whitespace().count();
    if word_count >= 4 {
        entropy += (word_count as f64 - 3.0) * 3.0;
    }

    let entropy = entropy.max(0.0);
    let strength = if entropy < 28.0 {
        PasswordStrength::Dangerous
    } else if entropy < 36.0 {
        PasswordStrength::Weak
    } else if entropy < 60.0 {
        PasswordStrength::Fair
    } else if entropy < 128.0 {
        PasswordStrength::Strong
    } else {
        PasswordStrength::Excellent
    };

    PasswordAnalysis {
        entropy_bits: entropy,
        strength,
        meets_minimum: entropy >= MIN_RECOMMENDED_ENTROPY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_password() {
        let analysis = estimate_entropy("");
        assert_eq!(analysis.entropy_bits, 0.0);
        assert_eq!(analysis.strength, PasswordStrength::Dangerous);
        assert!(!analysis.meets_minimum);
    }

    #[test]
    fn test_common_passwords_penalised() {
        assert!(estimate_entropy("password").strength <= PasswordStrength::Weak);
        assert!(estimate_entropy("monero").strength <= PasswordStrength::Weak);
        assert!(!estimate_entropy("bitcoin123").meets_minimum);
    }

    #[test]
    fn test_passphrase_is_strong() {
        let analysis = estimate_entropy("correct horse battery staple");
        assert!(
            analysis.strength >= PasswordStrength::Strong,
            "classic passphrase should be Strong, got {:?} ({:.1} bits)",
            analysis.strength,
            analysis.entropy_bits
        );
        assert!(analysis.meets_minimum);
    }

    #[test]
    fn test_repeats_weaker_than_unique() {
        let repeated = estimate_entropy("aaaaaaaaaa");
        let unique = estimate_entropy("qxmtpjwrkz");
        assert!(repeated.entropy_bits < unique.entropy_bits);
    }

    #[test]
    fn test_strength_ordering_and_threshold() {
        assert!(PasswordStrength::Dangerous < PasswordStrength::Weak);
        assert!(PasswordStrength::Weak < PasswordStrength::Fair);
        assert!(PasswordStrength::Fair < PasswordStrength::Strong);
        assert!(PasswordStrength::Strong < PasswordStrength::Excellent);
        assert!(!PasswordStrength::Fair.is_recommended());
        assert!(PasswordStrength::Strong.is_recommended());
    }

    #[test]
    fn test_entropy_grows_with_length() {
        let short = estimate_entropy("aB3!");
        let long = estimate_entropy("aB3!xY7@mN2#pQ5&");
        assert!(short.entropy_bits < long.entropy_bits);
    }
}
