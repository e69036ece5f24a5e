use chrono::Utc;
use quickchat_backend::config::JwtConfig;
use quickchat_backend::util::jwt::*;

// Helper function to create JWT utils for testing
fn create_test_jwt_utils() -> JwtTokenUtilsImpl {
    // Try to load from test environment variables first, fall back to default config
    JwtTokenUtilsImpl::from_test_env().unwrap_or_else(|_| {
        let config = JwtConfig::default();
        JwtTokenUtilsImpl::new(config)
    })
}

struct TestUser {
    id: String,
    email: String,
}

impl TestUser {
    fn new() -> Self {
        Self {
            id: "64f0aa5c9d3b2a0001a1b2c3".to_string(),
            email: "user@example.com".to_string(),
        }
    }
}

#[test]
fn test_jwt_utils_creation() {
    let jwt_utils = create_test_jwt_utils();
    assert!(!jwt_utils.jwt_config.jwt_secret.is_empty());
    assert!(jwt_utils.jwt_config.access_token_expiration > 0);
    assert!(jwt_utils.jwt_config.refresh_token_expiration > 0);
}

#[test]
fn test_token_type_as_str() {
    assert_eq!(TokenType::Access.as_str(), "access");
    assert_eq!(TokenType::Refresh.as_str(), "refresh");
}

#[test]
fn test_generate_access_token_success() {
    let jwt_utils = create_test_jwt_utils();
    let user = TestUser::new();

    let result = jwt_utils.generate_access_token(&user.id, &user.email);
    assert!(result.is_ok());

    let token = result.unwrap();
    assert!(!token.is_empty());

    let claims = jwt_utils.validate_access_token(&token).unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.email, user.email);
    assert_eq!(claims.token_type, "access");
    assert!(claims.exp > Utc::now().timestamp());
    assert!(claims.iat <= Utc::now().timestamp());
}

#[test]
fn test_generate_refresh_token_success() {
    let jwt_utils = create_test_jwt_utils();
    let user = TestUser::new();

    let token = jwt_utils.generate_refresh_token(&user.id, &user.email).unwrap();

    let claims = jwt_utils.validate_refresh_token(&token).unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.token_type, "refresh");
}

#[test]
fn test_generate_token_pair() {
    let jwt_utils = create_test_jwt_utils();
    let user = TestUser::new();

    let pair = jwt_utils.generate_token_pair(&user.id, &user.email).unwrap();
    assert!(!pair.access_token.is_empty());
    assert!(!pair.refresh_token.is_empty());
    assert_ne!(pair.access_token, pair.refresh_token);
    assert_eq!(pair.token_type, "Bearer");
    assert_eq!(
        pair.expires_in,
        jwt_utils.jwt_config.access_token_expiration * 60
    );
}

#[test]
fn test_access_token_rejected_as_refresh() {
    let jwt_utils = create_test_jwt_utils();
    let user = TestUser::new();

    let access = jwt_utils.generate_access_token(&user.id, &user.email).unwrap();
    let result = jwt_utils.validate_refresh_token(&access);
    assert!(matches!(result, Err(JwtError::InvalidTokenType { .. })));
}

#[test]
fn test_refresh_token_rejected_as_access() {
    let jwt_utils = create_test_jwt_utils();
    let user = TestUser::new();

    let refresh = jwt_utils.generate_refresh_token(&user.id, &user.email).unwrap();
    let result = jwt_utils.validate_access_token(&refresh);
    assert!(matches!(result, Err(JwtError::InvalidTokenType { .. })));
}

#[test]
fn test_validate_garbage_token() {
    let jwt_utils = create_test_jwt_utils();
    let result = jwt_utils.validate_access_token("not.a.token");
    assert!(matches!(result, Err(JwtError::DecodingFailed(_))));
}

#[test]
fn test_validate_token_wrong_secret() {
    let jwt_utils = create_test_jwt_utils();
    let user = TestUser::new();
    let token = jwt_utils.generate_access_token(&user.id, &user.email).unwrap();

    let mut other_config = JwtConfig::default();
    other_config.jwt_secret =
        "a_completely_different_secret_key_that_is_also_long_enough".to_string();
    let other_utils = JwtTokenUtilsImpl::new(other_config);

    assert!(other_utils.validate_access_token(&token).is_err());
}

#[test]
fn test_expired_token_rejected() {
    let mut config = JwtConfig::default();
    // Constructor does not validate, so an already-expired token can be minted
    config.access_token_expiration = -120;
    let jwt_utils = JwtTokenUtilsImpl::new(config);
    let user = TestUser::new();

    let token = jwt_utils.generate_access_token(&user.id, &user.email).unwrap();
    assert!(jwt_utils.validate_access_token(&token).is_err());
}

#[test]
fn test_extract_token_from_header() {
    let jwt_utils = create_test_jwt_utils();

    let token = jwt_utils
        .extract_token_from_header("Bearer abc.def.ghi")
        .unwrap();
    assert_eq!(token, "abc.def.ghi");
}

#[test]
fn test_extract_token_from_header_invalid() {
    let jwt_utils = create_test_jwt_utils();

    assert!(matches!(
        jwt_utils.extract_token_from_header("Basic abc"),
        Err(JwtError::InvalidToken)
    ));
    assert!(matches!(
        jwt_utils.extract_token_from_header("Bearer "),
        Err(JwtError::InvalidToken)
    ));
    assert!(matches!(
        jwt_utils.extract_token_from_header(""),
        Err(JwtError::InvalidToken)
    ));
}

#[test]
fn test_get_user_id_from_token() {
    let jwt_utils = create_test_jwt_utils();
    let user = TestUser::new();

    let token = jwt_utils.generate_access_token(&user.id, &user.email).unwrap();
    let user_id = jwt_utils.get_user_id_from_token(&token).unwrap();
    assert_eq!(user_id, user.id);
}

#[test]
fn test_tokens_have_unique_jti() {
    let jwt_utils = create_test_jwt_utils();
    let user = TestUser::new();

    let first = jwt_utils.generate_access_token(&user.id, &user.email).unwrap();
    let second = jwt_utils.generate_access_token(&user.id, &user.email).unwrap();

    let first_claims = jwt_utils.validate_access_token(&first).unwrap();
    let second_claims = jwt_utils.validate_access_token(&second).unwrap();
    assert_ne!(first_claims.jti, second_claims.jti);
}
