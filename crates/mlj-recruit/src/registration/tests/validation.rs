use crate::registration::validation::{
    age_error, email_error, is_valid_age, is_valid_email, is_valid_phone_number, phone_error,
};

#[test]
fn email_requires_single_at_and_dotted_domain() {
    assert!(is_valid_email("a@b.c"));
    assert!(is_valid_email("taro.yamada@example.co.jp"));
    assert!(!is_valid_email("a@b"));
    assert!(!is_valid_email("ab.com"));
    assert!(!is_valid_email(""));
    assert!(!is_valid_email("a b@c.com"));
    assert!(!is_valid_email("a@@b.com"));
    assert!(!is_valid_email("a@.com"));
}

#[test]
fn phone_accepts_mobile_and_landline_shapes() {
    assert!(is_valid_phone_number("090-1234-5678"));
    assert!(is_valid_phone_number("09012345678"));
    assert!(is_valid_phone_number("03-1234-5678"));
    assert!(is_valid_phone_number("0312345678"));

    // 10 digits with a mobile prefix is one digit short of a mobile number.
    assert!(!is_valid_phone_number("0901234567"));
    // Landline must start with 0.
    assert!(!is_valid_phone_number("12-3456-7890"));
    assert!(!is_valid_phone_number("060-1234-5678"));
    assert!(!is_valid_phone_number("090-1234-567a"));
    assert!(!is_valid_phone_number(""));
}

#[test]
fn age_bounds_are_inclusive() {
    assert!(is_valid_age("18"));
    assert!(is_valid_age("150"));
    assert!(is_valid_age(" 40 "));
    assert!(!is_valid_age("17"));
    assert!(!is_valid_age("151"));
    assert!(!is_valid_age("abc"));
    assert!(!is_valid_age(""));
}

#[test]
fn email_errors_distinguish_empty_from_malformed() {
    assert_eq!(email_error(""), Some("メールアドレスを入力してください"));
    assert_eq!(
        email_error("a@b"),
        Some("正しいメールアドレスを入力してください")
    );
    assert_eq!(email_error("a@b.c"), None);
}

#[test]
fn phone_errors_distinguish_failure_modes() {
    assert_eq!(phone_error(""), Some("電話番号を入力してください"));
    assert_eq!(
        phone_error("090-12EA-5678"),
        Some("電話番号は数字とハイフンのみ使用できます")
    );
    assert_eq!(
        phone_error("090-1234"),
        Some("電話番号は10桁または11桁で入力してください")
    );
    assert_eq!(
        phone_error("060-1234-5678"),
        Some("正しい電話番号を入力してください（例: 090-1234-5678）")
    );
    assert_eq!(phone_error("090-1234-5678"), None);
}

#[test]
fn age_errors_distinguish_failure_modes() {
    assert_eq!(age_error(""), Some("年齢を入力してください"));
    assert_eq!(age_error("abc"), Some("正しい年齢を入力してください"));
    assert_eq!(age_error("17"), Some("18歳以上の方のみ登録できます"));
    assert_eq!(age_error("151"), Some("正しい年齢を入力してください"));
    assert_eq!(age_error("18"), None);
}
