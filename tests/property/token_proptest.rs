//! Property-based tests for identity tokens

use proptest::prelude::*;
use uuid::Uuid;

use careercompass::backend::auth::{Identity, TokenError, TokenService};

const BASE64URL: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

fn identity_strategy() -> impl Strategy<Value = Identity> {
    (
        any::<u128>(),
        "[a-z0-9._]{1,20}@[a-z0-9]{1,12}\\.[a-z]{2,4}",
        proptest::option::of("[A-Za-z ]{1,30}"),
    )
        .prop_map(|(id, email, name)| Identity {
            id: Uuid::from_u128(id),
            email,
            name,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_issued_token_verifies(identity in identity_strategy()) {
        let tokens = TokenService::new("prop-secret");
        let token = tokens.issue(&identity).unwrap();
        let verified = tokens.verify(&token).unwrap();

        prop_assert_eq!(verified.id, identity.id);
        prop_assert_eq!(verified.email, identity.email);
        prop_assert_eq!(verified.name, identity.name);
    }

    #[test]
    fn test_token_rejected_under_other_secret(
        identity in identity_strategy(),
        secret in "[a-z]{8,16}",
    ) {
        prop_assume!(secret != "prop-secret");
        let token = TokenService::new("prop-secret").issue(&identity).unwrap();
        prop_assert!(TokenService::new(&secret).verify(&token).is_err());
    }

    #[test]
    fn test_arbitrary_strings_never_verify(raw in ".{0,200}") {
        let tokens = TokenService::new("prop-secret");
        prop_assert!(tokens.verify(&raw).is_err());
    }

    #[test]
    fn test_any_signature_character_change_rejected(
        identity in identity_strategy(),
        position in any::<prop::sample::Index>(),
        replacement in prop::sample::select(BASE64URL.to_vec()),
    ) {
        let tokens = TokenService::new("prop-secret");
        let token = tokens.issue(&identity).unwrap();

        let signature_start = token.rfind('.').unwrap() + 1;
        let offset = signature_start + position.index(token.len() - signature_start);
        let mut bytes = token.into_bytes();
        prop_assume!(bytes[offset] != replacement);
        bytes[offset] = replacement;

        let tampered = String::from_utf8(bytes).unwrap();
        prop_assert_eq!(tokens.verify(&tampered), Err(TokenError::Invalid));
    }
}
