//! Credential checks against the reference collection first, then the local
//! registration collection, plus the storage-backed session the login flow
//! keeps under `currentUser` / `loginTime`.

use chrono::{DateTime, Utc};

use crate::{
    error::{AuthFailure, Result},
    models::Member,
    state::Portal,
    storage::{CURRENT_USER, LOGIN_TIME},
};

impl Portal {
    /// First exact `(member_id, password)` match wins; the reference
    /// collection is consulted before local registrations. The returned copy
    /// carries a fresh `last_login`, which is never written back.
    pub async fn authenticate(&self, member_id: &str, password: &str) -> Result<Member> {
        let reference = self.members().await?;
        let locals = self.registered_members();
        Ok(authenticate_against(
            &reference, &locals, member_id, password,
        )?)
    }

    /// Persist the session the way the login flow does.
    pub fn store_session(&self, member: &Member) -> Result<()> {
        self.storage
            .set(CURRENT_USER, &serde_json::to_string(member)?)?;
        self.storage.set(LOGIN_TIME, &Utc::now().to_rfc3339())?;
        Ok(())
    }

    pub fn current_user(&self) -> Option<Member> {
        let raw = self.storage.get(CURRENT_USER)?;
        serde_json::from_str(&raw).ok()
    }

    pub fn login_time(&self) -> Option<DateTime<Utc>> {
        let raw = self.storage.get(LOGIN_TIME)?;
        raw.parse::<DateTime<Utc>>().ok()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user().is_some()
    }

    pub fn logout(&self) {
        self.storage.remove(CURRENT_USER);
        self.storage.remove(LOGIN_TIME);
    }
}

pub(crate) fn authenticate_against(
    reference: &[Member],
    locals: &[Member],
    member_id: &str,
    password: &str,
) -> std::result::Result<Member, AuthFailure> {
    let matched = find_match(reference, member_id, password)
        .or_else(|| find_match(locals, member_id, password));

    if let Some(member) = matched {
        let mut member = member.clone();
        member.last_login = Some(Utc::now());
        return Ok(member);
    }

    if id_exists(reference, member_id) || id_exists(locals, member_id) {
        Err(AuthFailure::InvalidCredentials)
    } else {
        Err(AuthFailure::MemberNotFound)
    }
}

fn find_match<'a>(members: &'a [Member], member_id: &str, password: &str) -> Option<&'a Member> {
    members
        .iter()
        .find(|m| m.member_id == member_id && m.password == password)
}

fn id_exists(members: &[Member], member_id: &str) -> bool {
    members.iter().any(|m| m.member_id == member_id)
}
