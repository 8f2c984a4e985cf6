//! Tenant licensing: time- and status-bound module access.
//!
//! The validity check here is the single authority on whether a license is
//! live — handlers must never infer license state from raw fields. The check
//! is advisory: it gates premium behavior, it never blocks authentication.

use std::future::Future;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::{JamiaId, ModuleKey};

/// Administrative status of a license.
///
/// Deletion is not a status: a deleted license is a removed record
/// ([`LicenseStore::delete`]), and that removal is irreversible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
    /// License is live (subject to the expiry timestamp).
    Active,
    /// Time-driven expiry was recorded; only [`License::extend`] revives it.
    Expired,
    /// Administratively paused; reversible via [`License::resume`].
    Suspended,
}

/// Which feature modules a license grants.
///
/// Wire form is either the sentinel string `"all"` or an array of module
/// keys, matching the stored documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ModulesRepr", into = "ModulesRepr")]
pub enum ModuleAccess {
    All,
    Only(Vec<ModuleKey>),
}

impl ModuleAccess {
    /// Membership test. `All` admits every module.
    #[must_use]
    pub fn contains(&self, module: &ModuleKey) -> bool {
        match self {
            Self::All => true,
            Self::Only(modules) => modules.contains(module),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ModulesRepr {
    Sentinel(String),
    List(Vec<ModuleKey>),
}

impl TryFrom<ModulesRepr> for ModuleAccess {
    type Error = String;

    fn try_from(repr: ModulesRepr) -> Result<Self, Self::Error> {
        match repr {
            ModulesRepr::Sentinel(s) if s == "all" => Ok(Self::All),
            ModulesRepr::Sentinel(s) => Err(format!("unknown module sentinel: {s}")),
            ModulesRepr::List(modules) => Ok(Self::Only(modules)),
        }
    }
}

impl From<ModuleAccess> for ModulesRepr {
    fn from(access: ModuleAccess) -> Self {
        match access {
            ModuleAccess::All => Self::Sentinel("all".to_owned()),
            ModuleAccess::Only(modules) => Self::List(modules),
        }
    }
}

/// A time-bound, status-bound grant of module access to a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// Unique license key.
    pub key: String,
    /// Tenant this license belongs to.
    pub jamia_id: JamiaId,
    #[serde(with = "time::serde::rfc3339")]
    pub activated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    pub status: LicenseStatus,
    pub modules: ModuleAccess,
    /// Optional cap on enrolled students.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_students: Option<u32>,
}

impl License {
    /// The authoritative validity rule: `status == Active` AND the expiry is
    /// strictly in the future. Status dominates the clock in both
    /// directions — a `Suspended` or `Expired` license with a future expiry
    /// is inactive, and an `Active` license past its expiry is inactive.
    #[must_use]
    pub fn is_active_at(&self, now: OffsetDateTime) -> bool {
        matches!(self.status, LicenseStatus::Active) && self.expires_at > now
    }

    /// [`Self::is_active_at`] against the real clock.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active_at(OffsetDateTime::now_utc())
    }

    /// Module-scoped check: validity AND module membership.
    #[must_use]
    pub fn allows_module_at(&self, module: &ModuleKey, now: OffsetDateTime) -> bool {
        self.is_active_at(now) && self.modules.contains(module)
    }

    /// [`Self::allows_module_at`] against the real clock.
    #[must_use]
    pub fn allows_module(&self, module: &ModuleKey) -> bool {
        self.allows_module_at(module, OffsetDateTime::now_utc())
    }

    /// Administrative pause. Reversible.
    pub fn suspend(&mut self) {
        self.status = LicenseStatus::Suspended;
    }

    /// Undoes [`Self::suspend`]. Does not touch the expiry: a resumed license
    /// whose expiry has passed is still inactive.
    pub fn resume(&mut self) {
        self.status = LicenseStatus::Active;
    }

    /// Extends the expiry and resets the status to `Active` — the only path
    /// back from time-driven expiry.
    pub fn extend(&mut self, new_expiry: OffsetDateTime) {
        self.expires_at = new_expiry;
        self.status = LicenseStatus::Active;
    }

    /// Whether one more student may be enrolled: true while `enrolled` is
    /// strictly below the cap. At exactly `max_students` the license holds
    /// its full complement and further enrollment is refused. Uncapped
    /// licenses always pass.
    #[must_use]
    pub fn within_student_cap(&self, enrolled: u32) -> bool {
        self.max_students.map_or(true, |cap| enrolled < cap)
    }
}

/// Consumer-provided license persistence.
///
/// The explicit repository seam: constructed once at startup and injected
/// into handlers, never reached through ambient globals. Concurrent status
/// updates are last-write-wins per record — no invariant spans multiple
/// license records. Failed writes are not retried here; the caller re-issues.
pub trait LicenseStore: Send + Sync + 'static {
    /// Look up a license by its unique key.
    fn find(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<License>, Box<dyn std::error::Error + Send + Sync>>> + Send;

    /// Insert or replace a license record atomically.
    fn save(
        &self,
        license: &License,
    ) -> impl Future<Output = Result<(), Box<dyn std::error::Error + Send + Sync>>> + Send;

    /// Remove a license. Terminal: there is no undelete.
    fn delete(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<(), Box<dyn std::error::Error + Send + Sync>>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2026-03-01 12:00 UTC);

    fn license(status: LicenseStatus, expires_at: OffsetDateTime) -> License {
        License {
            key: "JAM-TEST-0001".to_owned(),
            jamia_id: JamiaId::from("jamia-1".to_string()),
            activated_at: datetime!(2025-03-01 12:00 UTC),
            expires_at,
            status,
            modules: ModuleAccess::All,
            max_students: None,
        }
    }

    #[test]
    fn active_with_future_expiry_is_active() {
        let lic = license(LicenseStatus::Active, datetime!(2027-01-01 0:00 UTC));
        assert!(lic.is_active_at(NOW));
    }

    #[test]
    fn suspended_dominates_future_expiry() {
        let lic = license(LicenseStatus::Suspended, datetime!(2027-01-01 0:00 UTC));
        assert!(!lic.is_active_at(NOW));
    }

    #[test]
    fn expired_status_dominates_future_expiry() {
        let lic = license(LicenseStatus::Expired, datetime!(2027-01-01 0:00 UTC));
        assert!(!lic.is_active_at(NOW));
    }

    #[test]
    fn past_expiry_dominates_active_status() {
        let lic = license(LicenseStatus::Active, datetime!(2026-01-01 0:00 UTC));
        assert!(!lic.is_active_at(NOW));
    }

    #[test]
    fn expiry_boundary_is_strict() {
        let lic = license(LicenseStatus::Active, NOW);
        assert!(!lic.is_active_at(NOW), "expires_at == now must be inactive");
    }

    #[test]
    fn suspend_resume_round_trip() {
        let mut lic = license(LicenseStatus::Active, datetime!(2027-01-01 0:00 UTC));
        lic.suspend();
        assert!(!lic.is_active_at(NOW));
        lic.resume();
        assert!(lic.is_active_at(NOW));
    }

    #[test]
    fn resume_does_not_revive_past_expiry() {
        let mut lic = license(LicenseStatus::Suspended, datetime!(2026-01-01 0:00 UTC));
        lic.resume();
        assert!(!lic.is_active_at(NOW));
    }

    #[test]
    fn extend_revives_expired_license() {
        let mut lic = license(LicenseStatus::Expired, datetime!(2026-01-01 0:00 UTC));
        lic.extend(datetime!(2027-01-01 0:00 UTC));
        assert_eq!(lic.status, LicenseStatus::Active);
        assert!(lic.is_active_at(NOW));
    }

    #[test]
    fn all_sentinel_admits_every_module() {
        let lic = license(LicenseStatus::Active, datetime!(2027-01-01 0:00 UTC));
        assert!(lic.allows_module_at(&ModuleKey::from("attendance"), NOW));
        assert!(lic.allows_module_at(&ModuleKey::from("hostel"), NOW));
    }

    #[test]
    fn module_list_is_exact_membership() {
        let mut lic = license(LicenseStatus::Active, datetime!(2027-01-01 0:00 UTC));
        lic.modules = ModuleAccess::Only(vec![ModuleKey::from("fees")]);
        assert!(lic.allows_module_at(&ModuleKey::from("fees"), NOW));
        assert!(!lic.allows_module_at(&ModuleKey::from("attendance"), NOW));
    }

    #[test]
    fn module_check_requires_validity() {
        let mut lic = license(LicenseStatus::Suspended, datetime!(2027-01-01 0:00 UTC));
        lic.modules = ModuleAccess::Only(vec![ModuleKey::from("fees")]);
        assert!(!lic.allows_module_at(&ModuleKey::from("fees"), NOW));
    }

    #[test]
    fn student_cap() {
        let mut lic = license(LicenseStatus::Active, datetime!(2027-01-01 0:00 UTC));
        assert!(lic.within_student_cap(10_000));
        lic.max_students = Some(200);
        assert!(lic.within_student_cap(199));
        assert!(!lic.within_student_cap(200));
    }

    #[test]
    fn modules_serde_sentinel_and_list() {
        let all: ModuleAccess = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(all, ModuleAccess::All);
        assert_eq!(serde_json::to_string(&all).unwrap(), "\"all\"");

        let only: ModuleAccess = serde_json::from_str("[\"fees\",\"mess\"]").unwrap();
        assert_eq!(
            only,
            ModuleAccess::Only(vec![ModuleKey::from("fees"), ModuleKey::from("mess")])
        );
        assert_eq!(serde_json::to_string(&only).unwrap(), "[\"fees\",\"mess\"]");

        assert!(serde_json::from_str::<ModuleAccess>("\"everything\"").is_err());
    }

    #[test]
    fn license_serde_round_trip() {
        let lic = license(LicenseStatus::Active, datetime!(2027-01-01 0:00 UTC));
        let json = serde_json::to_string(&lic).unwrap();
        assert!(json.contains("\"status\":\"active\""));
        let parsed: License = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, lic);
    }
}
