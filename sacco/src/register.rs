//! Self-registration: field validation, the duplicate check over local
//! registrations, the dual-key append, and reconciliation of local
//! registrations against the reference collection.

use chrono::Utc;
use regex::Regex;
use tracing::warn;

use crate::{
    error::{Error, Result},
    models::Member,
    state::Portal,
    storage::{CURRENT_REGISTRATION, REGISTERED_MEMBERS, SERVER_MEMBERS},
};

/// Application payload for a new membership.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub member_id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub balance: f64,
    pub currency: String,
}

/// Minimum opening deposit, in base currency units.
pub const MIN_DEPOSIT: f64 = 10_000.0;

pub fn validate_email(email: &str) -> bool {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .unwrap()
        .is_match(email)
}

fn validate(new: &NewMember) -> Result<()> {
    if new.name.trim().len() < 2 {
        return Err(Error::Validation {
            field: "name",
            message: "Full name must be at least 2 characters".to_owned(),
        });
    }
    if !validate_email(&new.email) {
        return Err(Error::Validation {
            field: "email",
            message: "Please enter a valid email address".to_owned(),
        });
    }
    if new.member_id.len() < 3 {
        return Err(Error::Validation {
            field: "memberId",
            message: "Member ID must be at least 3 characters".to_owned(),
        });
    }
    if new.password.len() < 6 {
        return Err(Error::Validation {
            field: "password",
            message: "Password must be at least 6 characters".to_owned(),
        });
    }
    if !(new.balance >= MIN_DEPOSIT) {
        return Err(Error::Validation {
            field: "balance",
            message: "Minimum deposit is 10,000 UGX".to_owned(),
        });
    }
    if new.currency.trim().is_empty() {
        return Err(Error::Validation {
            field: "currency",
            message: "Please select a currency".to_owned(),
        });
    }
    Ok(())
}

impl Portal {
    /// Local registration collection; unreadable state reads as empty.
    pub fn registered_members(&self) -> Vec<Member> {
        self.stored_members(REGISTERED_MEMBERS)
    }

    /// Registration-side existence check. Only local registrations are
    /// consulted, never the reference collection.
    pub fn member_exists(&self, member_id: &str) -> bool {
        self.registered_members()
            .iter()
            .any(|m| m.member_id == member_id)
    }

    /// Validates, rejects duplicate ids already registered locally, then
    /// appends under `registeredMembers` (and `currentRegistration`) before
    /// mirroring under `serverMembers`. The two keys are independent: if the
    /// mirror write fails the registration stays visible locally.
    pub fn register(&self, new: NewMember) -> Result<Member> {
        validate(&new)?;

        if self.member_exists(&new.member_id) {
            return Err(Error::DuplicateMember {
                member_id: new.member_id,
            });
        }

        let member = Member {
            member_id: new.member_id,
            name: new.name,
            email: new.email,
            password: new.password,
            balance: new.balance,
            currency: new.currency,
            created_at: Utc::now(),
            last_login: None,
            role: None,
        };

        let mut registered = self.registered_members();
        registered.push(member.clone());
        self.write_members(REGISTERED_MEMBERS, &registered)?;
        self.storage
            .set(CURRENT_REGISTRATION, &serde_json::to_string(&member)?)?;

        let mut mirrored = self.stored_members(SERVER_MEMBERS);
        mirrored.push(member.clone());
        if let Err(e) = self.write_members(SERVER_MEMBERS, &mirrored) {
            warn!("server mirror write failed after local registration: {e}");
            return Err(e);
        }

        Ok(member)
    }

    /// Merge local registrations into the reference view and write the
    /// result back, making the call idempotent. Reference entries win on
    /// member id; any failure degrades to an empty list.
    pub async fn reconcile(&self) -> Vec<Member> {
        let reference = match self.members().await {
            Ok(members) => members,
            Err(e) => {
                warn!("reconcile skipped, reference members unavailable: {e}");
                return Vec::new();
            }
        };

        let merged = merge_members(reference, self.registered_members());
        match self.write_members(REGISTERED_MEMBERS, &merged) {
            Ok(()) => merged,
            Err(e) => {
                warn!("reconcile result not persisted: {e}");
                Vec::new()
            }
        }
    }

    pub(crate) fn stored_members(&self, key: &str) -> Vec<Member> {
        let Some(raw) = self.storage.get(key) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("unreadable member list under {key}: {e}");
            Vec::new()
        })
    }

    fn write_members(&self, key: &str, members: &[Member]) -> Result<()> {
        self.storage.set(key, &serde_json::to_string(members)?)
    }
}

/// Every reference member, plus every local member whose id the reference
/// set does not already hold. First seen wins.
pub(crate) fn merge_members(reference: Vec<Member>, locals: Vec<Member>) -> Vec<Member> {
    let mut merged = reference;
    for local in locals {
        if !merged.iter().any(|m| m.member_id == local.member_id) {
            merged.push(local);
        }
    }
    merged
}

/// Coarse strength score used by the registration form: length of at least
/// 8, mixed case, a digit, and a symbol each count once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

pub fn password_strength(password: &str) -> PasswordStrength {
    let mut score = 0;
    if password.len() >= 8 {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
    {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        score += 1;
    }

    match score {
        0 | 1 => PasswordStrength::Weak,
        2 => PasswordStrength::Medium,
        _ => PasswordStrength::Strong,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        auth::authenticate_against,
        config::Config,
        storage::{MemoryStorage, Storage, SERVER_MEMBERS},
    };

    fn test_portal() -> Portal {
        let config = Config {
            data_url: "http://localhost:0/json".to_owned(),
            exchange_api_url: "http://localhost:0".to_owned(),
            exchange_api_key: String::new(),
            news_api_url: "http://localhost:0".to_owned(),
            news_api_key: String::new(),
        };
        Portal::new(config, Arc::new(MemoryStorage::new()))
    }

    fn application(member_id: &str) -> NewMember {
        NewMember {
            member_id: member_id.to_owned(),
            name: "Jane Doe".to_owned(),
            email: "jane@example.com".to_owned(),
            password: "correctpw".to_owned(),
            balance: 25_000.0,
            currency: "UGX".to_owned(),
        }
    }

    fn seeded(member_id: &str) -> Member {
        Member {
            member_id: member_id.to_owned(),
            name: format!("Seed {member_id}"),
            email: format!("{member_id}@sacco.example"),
            password: "seedpw".to_owned(),
            balance: 500_000.0,
            currency: "UGX".to_owned(),
            created_at: Utc::now(),
            last_login: None,
            role: Some("member".to_owned()),
        }
    }

    #[test]
    fn test_register_appends_to_both_keys() {
        let portal = test_portal();
        let member = portal.register(application("M100")).unwrap();

        assert_eq!(member.member_id, "M100");
        assert_eq!(portal.registered_members().len(), 1);
        assert_eq!(portal.stored_members(SERVER_MEMBERS).len(), 1);
        assert!(portal
            .storage
            .get(crate::storage::CURRENT_REGISTRATION)
            .is_some());
    }

    #[test]
    fn test_register_then_authenticate() {
        let portal = test_portal();
        portal.register(application("M100")).unwrap();

        let locals = portal.registered_members();
        let authed = authenticate_against(&[], &locals, "M100", "correctpw").unwrap();
        assert_eq!(authed.member_id, "M100");
        assert!(authed.last_login.is_some());
    }

    #[test]
    fn test_duplicate_id_rejected_and_storage_unchanged() {
        let portal = test_portal();
        portal.register(application("M100")).unwrap();

        let err = portal.register(application("M100")).unwrap_err();
        assert!(matches!(err, Error::DuplicateMember { ref member_id } if member_id == "M100"));
        assert_eq!(portal.registered_members().len(), 1);
        assert_eq!(portal.stored_members(SERVER_MEMBERS).len(), 1);
    }

    #[test]
    fn test_validation_rules() {
        let portal = test_portal();

        let err = portal.register(application("M1")).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "memberId", .. }));

        let mut short_name = application("M101");
        short_name.name = " J ".to_owned();
        let err = portal.register(short_name).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "name", .. }));

        let mut bad_email = application("M102");
        bad_email.email = "not-an-email".to_owned();
        let err = portal.register(bad_email).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "email", .. }));

        let mut short_password = application("M103");
        short_password.password = "12345".to_owned();
        let err = portal.register(short_password).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "password", .. }));

        let mut low_deposit = application("M104");
        low_deposit.balance = 5_000.0;
        let err = portal.register(low_deposit).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "balance", .. }));

        let mut no_currency = application("M105");
        no_currency.currency = String::new();
        let err = portal.register(no_currency).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "currency", .. }));

        assert!(portal.registered_members().is_empty());
    }

    #[test]
    fn test_member_exists_checks_local_only() {
        let portal = test_portal();
        assert!(!portal.member_exists("M100"));
        portal.register(application("M100")).unwrap();
        assert!(portal.member_exists("M100"));
    }

    #[test]
    fn test_merge_reference_wins_and_is_idempotent() {
        let reference = vec![seeded("M001"), seeded("M002")];
        let mut local_shadow = seeded("M002");
        local_shadow.name = "Local Shadow".to_owned();
        let locals = vec![local_shadow, seeded("M100")];

        let merged = merge_members(reference.clone(), locals);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[1].name, "Seed M002");
        assert_eq!(merged[2].member_id, "M100");

        // A second pass over the already-merged list changes nothing.
        let again = merge_members(reference, merged.clone());
        let ids: Vec<&str> = again.iter().map(|m| m.member_id.as_str()).collect();
        let before: Vec<&str> = merged.iter().map(|m| m.member_id.as_str()).collect();
        assert_eq!(ids, before);
    }

    #[test]
    fn test_email_shapes() {
        assert!(validate_email("jane@example.com"));
        assert!(validate_email("j.doe+sacco@mail.example.org"));
        assert!(!validate_email("jane@example"));
        assert!(!validate_email("jane example@mail.com"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email(""));
    }

    #[test]
    fn test_password_strength_scores() {
        assert_eq!(password_strength(""), PasswordStrength::Weak);
        assert_eq!(password_strength("abc"), PasswordStrength::Weak);
        assert_eq!(password_strength("abcdefgh"), PasswordStrength::Weak);
        assert_eq!(password_strength("Abcdefgh"), PasswordStrength::Medium);
        assert_eq!(password_strength("Abcdefg1"), PasswordStrength::Strong);
        assert_eq!(password_strength("Abcdef1!"), PasswordStrength::Strong);
        assert_eq!(password_strength("Ab1!"), PasswordStrength::Strong);
    }
}
