#[cfg(test)]
mod tests {
    use crate::codec::{decode, encode, Claim, EventSnapshot, ParticipantSnapshot, TokenSigner};
    use proptest::prelude::*;

    fn display_field() -> impl Strategy<Value = Option<String>> {
        proptest::option::of("[ -~]{0,24}")
    }

    prop_compose! {
        fn participant()(
            name in display_field(),
            email in display_field(),
            roll_number in display_field(),
            department in display_field(),
            year in display_field(),
            class in display_field(),
            profile_photo_url in display_field(),
        ) -> ParticipantSnapshot {
            ParticipantSnapshot { name, email, roll_number, department, year, class, profile_photo_url }
        }
    }

    prop_compose! {
        fn event()(
            id in display_field(),
            title in display_field(),
            description in display_field(),
            location in display_field(),
            start_time in display_field(),
            end_time in display_field(),
        ) -> EventSnapshot {
            EventSnapshot { id, title, description, location, start_time, end_time }
        }
    }

    prop_compose! {
        fn claim()(
            user_id in "[a-zA-Z0-9-]{1,36}",
            event_id in "[a-zA-Z0-9-]{1,36}",
            registration_id in "[a-zA-Z0-9-]{0,36}",
            issued_at in display_field(),
            exp in 1i64..4_102_444_800_000i64,
            participant in participant(),
            event in event(),
        ) -> Claim {
            Claim { user_id, event_id, registration_id, issued_at, exp, participant, event }
        }
    }

    proptest! {
        // Any claim with its required fields populated survives the transport string.
        #[test]
        fn test_decode_inverts_encode(c in claim()) {
            let token = encode(&c).unwrap();
            prop_assert_eq!(decode(&token).unwrap(), c);
        }

        #[test]
        fn test_signed_tokens_verify_and_decode(c in claim(), secret in "[ -~]{1,32}") {
            let signer = TokenSigner::new(&secret);
            let signed = signer.sign(&encode(&c).unwrap()).unwrap();
            let payload = signer.verify(&signed).unwrap();
            prop_assert_eq!(decode(payload).unwrap(), c);
        }

        // Arbitrary input never panics; it either decodes or reports an error.
        #[test]
        fn test_decode_never_panics(input in "\\PC{0,128}") {
            let _ = decode(&input);
        }
    }
}
