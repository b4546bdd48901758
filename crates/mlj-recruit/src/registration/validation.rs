//! Pure format checks for the personal-info step, with paired error-message
//! functions returning the user-facing reason. Empty input, wrong digit
//! count, and wrong pattern are distinguishable failures.

/// Single `@`, non-empty local part, dotted domain, no whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let Some(domain) = parts.next() else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    // The domain needs a dot with at least one character on each side.
    match domain.rfind('.') {
        Some(index) => index > 0 && index + 1 < domain.len(),
        None => false,
    }
}

/// Japanese phone number: hyphens stripped, then either an 11-digit mobile
/// number (070/080/090) or a 10-digit landline starting with 0.
pub fn is_valid_phone_number(phone: &str) -> bool {
    let digits = strip_hyphens(phone);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    match digits.len() {
        11 => ["070", "080", "090"]
            .iter()
            .any(|prefix| digits.starts_with(prefix)),
        10 => digits.starts_with('0'),
        _ => false,
    }
}

/// Integer age between 18 and 150 inclusive.
pub fn is_valid_age(age: &str) -> bool {
    matches!(age.trim().parse::<u32>(), Ok(years) if (18..=150).contains(&years))
}

pub fn email_error(email: &str) -> Option<&'static str> {
    if email.is_empty() {
        return Some("メールアドレスを入力してください");
    }
    if !is_valid_email(email) {
        return Some("正しいメールアドレスを入力してください");
    }
    None
}

pub fn phone_error(phone: &str) -> Option<&'static str> {
    if phone.is_empty() {
        return Some("電話番号を入力してください");
    }

    let digits = strip_hyphens(phone);
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Some("電話番号は数字とハイフンのみ使用できます");
    }
    if digits.len() != 10 && digits.len() != 11 {
        return Some("電話番号は10桁または11桁で入力してください");
    }
    if !is_valid_phone_number(phone) {
        return Some("正しい電話番号を入力してください（例: 090-1234-5678）");
    }
    None
}

pub fn age_error(age: &str) -> Option<&'static str> {
    if age.trim().is_empty() {
        return Some("年齢を入力してください");
    }

    let Ok(years) = age.trim().parse::<u32>() else {
        return Some("正しい年齢を入力してください");
    };
    if years < 18 {
        return Some("18歳以上の方のみ登録できます");
    }
    if years > 150 {
        return Some("正しい年齢を入力してください");
    }
    None
}

fn strip_hyphens(phone: &str) -> String {
    phone.chars().filter(|c| *c != '-').collect()
}
