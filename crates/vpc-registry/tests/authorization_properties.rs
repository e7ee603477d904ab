//! Property tests: unauthorized callers never mutate state, and composite
//! keys never collide.

use proptest::prelude::*;

use vpc_core::{CredentialId, Principal, Timestamp};
use vpc_registry::{ChainClock, ContractError, CredentialSuite};

const OWNER: &str = "OWNER";
const ISSUER: &str = "ISSUER";
const REVOKER: &str = "REVOKER";
const PROVIDER: &str = "PROVIDER";

fn p(s: &str) -> Principal {
    Principal::new(s).unwrap()
}

fn staffed() -> CredentialSuite {
    let clock = ChainClock::new(100, Timestamp::from_epoch_secs(1_648_000_000).unwrap());
    let mut suite = CredentialSuite::deploy(p(OWNER), &p(OWNER), clock).unwrap();
    suite.add_authorized_issuer(&p(OWNER), &p(ISSUER)).unwrap();
    suite.add_authorized_revoker(&p(OWNER), &p(REVOKER)).unwrap();
    suite.add_authorized_provider(&p(OWNER), &p(PROVIDER)).unwrap();
    suite
}

/// Principals that hold no role and are not the owner.
fn stranger() -> impl Strategy<Value = Principal> {
    "[A-Z0-9]{1,40}"
        .prop_filter("must not hold a role", |s| {
            ![OWNER, ISSUER, REVOKER, PROVIDER].contains(&s.as_str())
        })
        .prop_map(|s| p(&s))
}

fn credential_id() -> impl Strategy<Value = CredentialId> {
    "[A-Z]{1,4}(-[A-Z0-9]{1,4}){0,2}".prop_map(|s| CredentialId::new(s).unwrap())
}

proptest! {
    /// A stranger can never issue, revoke, or add credits, and a rejected
    /// call leaves the snapshot untouched.
    #[test]
    fn strangers_never_succeed(
        caller in stranger(),
        id in credential_id(),
        credits in any::<u64>(),
    ) {
        let mut suite = staffed();
        let recipient = p("RECIPIENT");
        suite
            .issue_credential(
                &p(ISSUER),
                &id,
                &recipient,
                "PE",
                Timestamp::from_epoch_secs(1_680_000_000).unwrap(),
                "m",
            )
            .unwrap();
        let before = suite.snapshot();

        let issue = suite.issue_credential(
            &caller,
            &id,
            &caller,
            "PE",
            Timestamp::from_epoch_secs(1_680_000_000).unwrap(),
            "m",
        );
        prop_assert_eq!(issue.unwrap_err().code(), 102);

        let revoke = suite.revoke_credential(&caller, &id, &recipient);
        prop_assert_eq!(revoke.unwrap_err().code(), 300);

        let hook = suite.mark_credential_revoked(&caller, &id, &recipient);
        prop_assert_eq!(hook.unwrap_err().code(), 401);

        let add = suite.add_education_credits(&caller, &recipient, &id, credits, "x", "y");
        prop_assert_eq!(add.unwrap_err().code(), 400);

        prop_assert_eq!(suite.snapshot(), before);
    }

    /// Splitting the same characters differently across id and recipient
    /// yields distinct records.
    #[test]
    fn composite_keys_never_collide(
        left in "[A-Z]{1,6}",
        middle in "[A-Z]{1,6}",
        right in "[A-Z]{1,6}",
    ) {
        let mut suite = staffed();
        let expiry = Timestamp::from_epoch_secs(1_680_000_000).unwrap();

        let joined_id = CredentialId::new(format!("{left}-{middle}")).unwrap();
        let split_id = CredentialId::new(left.clone()).unwrap();
        let short_recipient = p(&right);
        let joined_recipient = p(&format!("{middle}-{right}"));

        suite
            .issue_credential(&p(ISSUER), &joined_id, &short_recipient, "a", expiry, "m")
            .unwrap();
        suite
            .issue_credential(&p(ISSUER), &split_id, &joined_recipient, "b", expiry, "m")
            .unwrap();

        prop_assert_eq!(suite.credentials().len(), 2);
        prop_assert_eq!(
            &suite.get_credential(&joined_id, &short_recipient).unwrap().credential_type,
            "a"
        );
        prop_assert_eq!(
            &suite.get_credential(&split_id, &joined_recipient).unwrap().credential_type,
            "b"
        );
    }

    /// Credit totals equal the sum of recorded history entries.
    #[test]
    fn totals_match_history(amounts in prop::collection::vec(0u64..1_000_000, 1..12)) {
        let mut suite = staffed();
        let id = CredentialId::new("CERT-123").unwrap();
        let recipient = p("RECIPIENT");
        suite
            .issue_credential(
                &p(ISSUER),
                &id,
                &recipient,
                "PE",
                Timestamp::from_epoch_secs(1_680_000_000).unwrap(),
                "m",
            )
            .unwrap();

        for (i, amount) in amounts.iter().enumerate() {
            suite
                .add_education_credits(&p(PROVIDER), &recipient, &id, *amount, format!("a{i}"), "m")
                .unwrap();
        }

        let history = suite.credit_history(&recipient, &id);
        prop_assert_eq!(history.len(), amounts.len());
        let sum: u64 = history.iter().map(|e| e.credits).sum();
        prop_assert_eq!(suite.get_total_credits(&recipient, &id).unwrap().total_credits, sum);
        prop_assert_eq!(sum, amounts.iter().sum::<u64>());
    }
}
