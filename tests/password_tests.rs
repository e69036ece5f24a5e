use quickchat_backend::util::password::*;
use std::collections::HashSet;

// Passwords paired with whether they satisfy the strength rules
fn get_test_passwords() -> Vec<(&'static str, bool)> {
    vec![
        ("ValidPass123!", true),
        ("weak", false),                // Too short, missing requirements
        ("nouppercase123!", false),     // Missing uppercase
        ("NOLOWERCASE123!", false),     // Missing lowercase
        ("NoDigitsHere!", false),       // Missing digits
        ("NoSpecialChars123", false),   // Missing special chars
        ("Short1!", false),             // Too short
        ("AnotherValidOne456@", true),
        ("", false),
        ("1234567890", false),          // Only digits
        ("Aa1!", false),                // Too short but has all requirements
    ]
}

#[test]
fn test_hash_password_success() {
    let password = "test_password_123";
    let hash = PasswordUtilsImpl::hash_password(password).unwrap();

    assert!(!hash.is_empty());
    assert_ne!(hash, password);
    assert!(hash.starts_with("$argon2"));

    let parts: Vec<&str> = hash.split('$').collect();
    assert!(parts.len() >= 5, "Hash should have at least 5 parts separated by $");
}

#[test]
fn test_hash_password_different_results() {
    let password = "same_password";

    let hash1 = PasswordUtilsImpl::hash_password(password).unwrap();
    let hash2 = PasswordUtilsImpl::hash_password(password).unwrap();

    // Same password should produce different hashes due to random salt
    assert_ne!(hash1, hash2);
    assert!(hash1.starts_with("$argon2"));
    assert!(hash2.starts_with("$argon2"));
}

#[test]
fn test_verify_password_correct() {
    let password = "correct_password_123";
    let hash = PasswordUtilsImpl::hash_password(password).unwrap();

    let result = PasswordUtilsImpl::verify_password(password, &hash).unwrap();
    assert!(result);
}

#[test]
fn test_verify_password_incorrect() {
    let password = "correct_password_123";
    let hash = PasswordUtilsImpl::hash_password(password).unwrap();

    let result = PasswordUtilsImpl::verify_password("wrong_password", &hash).unwrap();
    assert!(!result);
}

#[test]
fn test_verify_password_invalid_hash() {
    let result = PasswordUtilsImpl::verify_password("whatever", "not-a-valid-hash");
    assert!(matches!(result, Err(PasswordError::InvalidHashFormat)));
}

#[test]
fn test_verify_password_unicode() {
    let password = "Pássw0rd123!🔒";
    let hash = PasswordUtilsImpl::hash_password(password).unwrap();

    assert!(PasswordUtilsImpl::verify_password(password, &hash).unwrap());
    assert!(!PasswordUtilsImpl::verify_password("Passw0rd123!", &hash).unwrap());
}

#[test]
fn test_generate_random_password_length() {
    let password = PasswordUtilsImpl::generate_random_password(16);
    assert_eq!(password.len(), 16);

    // Requests below the minimum are bumped to 8
    let password = PasswordUtilsImpl::generate_random_password(3);
    assert_eq!(password.len(), 8);
}

#[test]
fn test_generate_random_password_uniqueness() {
    let mut seen = HashSet::new();
    for _ in 0..50 {
        let password = PasswordUtilsImpl::generate_random_password(20);
        assert!(seen.insert(password), "Generated passwords should not repeat");
    }
}

#[test]
fn test_validate_password_strength_cases() {
    for (password, expected_valid) in get_test_passwords() {
        let result = PasswordUtilsImpl::validate_password_strength(password);
        assert_eq!(
            result.is_ok(),
            expected_valid,
            "Unexpected strength verdict for {:?}",
            password
        );
    }
}

#[test]
fn test_validate_password_strength_reports_all_problems() {
    let errors = PasswordUtilsImpl::validate_password_strength("abc").unwrap_err();
    // Short, no uppercase, no digit, no special char
    assert!(errors.len() >= 4);
}
