//! Consent tickets and the consent gate.
//!
//! Consent is modeled as a lattice of scopes, `self < dyad < group < org
//! < public`. A ticket issued at one scope may be exercised at its own
//! level or any *more* constrained level; escalation to a broader scope
//! is forbidden. Tickets expire by TTL and, when a cap is tracked, by
//! invocation count.

use crate::error::GateError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Consent scope lattice, most constrained first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentScope {
    /// Individual only.
    #[serde(rename = "self")]
    Self_,
    /// Two-person interaction.
    Dyad,
    /// Closed group, e.g. a team.
    Group,
    /// Organization.
    Org,
    /// Public or open access.
    Public,
}

impl ConsentScope {
    /// Position in the lattice; higher is broader.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Self_ => 0,
            Self::Dyad => 1,
            Self::Group => 2,
            Self::Org => 3,
            Self::Public => 4,
        }
    }

    /// Whether a ticket at this scope may be used for `target`.
    ///
    /// A scope covers itself and every more constrained scope. It never
    /// covers a broader one.
    pub fn covers(&self, target: ConsentScope) -> bool {
        self.rank() >= target.rank()
    }

    /// Wire name of the scope.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Self_ => "self",
            Self::Dyad => "dyad",
            Self::Group => "group",
            Self::Org => "org",
            Self::Public => "public",
        }
    }
}

impl fmt::Display for ConsentScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsentScope {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "self" => Ok(Self::Self_),
            "dyad" => Ok(Self::Dyad),
            "group" => Ok(Self::Group),
            "org" => Ok(Self::Org),
            "public" => Ok(Self::Public),
            other => Err(GateError::UnknownScope(other.to_string())),
        }
    }
}

/// A consent ticket with TTL and an optional invocation cap.
///
/// Two ticket shapes existed upstream, one with invocation tracking and
/// one without; they are unified here with `max_invocations: None`
/// meaning "no cap".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentTicket {
    /// Who granted the consent.
    pub holder: String,
    /// The scope the consent was granted at.
    pub scope: ConsentScope,
    /// Issuance time, epoch seconds.
    pub issued_at: f64,
    /// Lifetime in seconds from issuance.
    pub ttl_seconds: f64,
    /// Maximum number of invocations, if capped.
    #[serde(default)]
    pub max_invocations: Option<u32>,
    /// Invocations consumed so far.
    #[serde(default)]
    pub invocations: u32,
}

impl ConsentTicket {
    /// Creates a ticket issued at `now` with the given TTL and no cap.
    pub fn new(holder: impl Into<String>, scope: ConsentScope, now: f64, ttl_seconds: f64) -> Self {
        Self {
            holder: holder.into(),
            scope,
            issued_at: now,
            ttl_seconds,
            max_invocations: None,
            invocations: 0,
        }
    }

    /// Adds an invocation cap.
    pub fn with_cap(mut self, max_invocations: u32) -> Self {
        self.max_invocations = Some(max_invocations);
        self
    }

    /// Whether the ticket is valid at `now`.
    ///
    /// Valid while `now <= issued_at + ttl_seconds` and, when a cap is
    /// tracked, `invocations < max_invocations`.
    pub fn is_valid(&self, now: f64) -> bool {
        if now > self.issued_at + self.ttl_seconds {
            return false;
        }
        match self.max_invocations {
            Some(cap) => self.invocations < cap,
            None => true,
        }
    }

    /// Consumes one invocation if the ticket is valid at `now`.
    ///
    /// Returns `true` on success.
    pub fn use_once(&mut self, now: f64) -> bool {
        if !self.is_valid(now) {
            return false;
        }
        self.invocations += 1;
        true
    }
}

/// Evidence produced by the consent gate, recorded into proofs verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentEvidence {
    /// Gate outcome.
    pub ok: bool,
    /// Tickets found in the context.
    pub tickets: Vec<ConsentTicket>,
    /// Scope the decision asked for, if any.
    pub target_scope: Option<ConsentScope>,
    /// Human-readable outcome tag.
    pub reason: String,
}

/// Extracts consent tickets from a context object.
///
/// Two shapes are honored: a `consent` object carrying `valid: true`,
/// a `scope` and optional TTL/cap fields, and an explicit
/// `consent_tickets` array of full ticket objects. Missing issuance
/// times default to one minute before `now`; missing TTLs to an hour.
pub fn extract_tickets(context: &Value, now: f64) -> Vec<ConsentTicket> {
    let mut tickets = Vec::new();

    if let Some(consent) = context.get("consent").and_then(Value::as_object) {
        let valid = consent.get("valid").and_then(Value::as_bool).unwrap_or(false);
        let scope = consent
            .get("scope")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<ConsentScope>().ok());
        if valid {
            if let Some(scope) = scope {
                tickets.push(ConsentTicket {
                    holder: consent
                        .get("holder")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown")
                        .to_string(),
                    scope,
                    issued_at: consent
                        .get("issued_at")
                        .and_then(Value::as_f64)
                        .unwrap_or(now - 60.0),
                    ttl_seconds: consent
                        .get("ttl_seconds")
                        .and_then(Value::as_f64)
                        .unwrap_or(3600.0),
                    max_invocations: consent
                        .get("max_invocations")
                        .and_then(Value::as_u64)
                        .map(|n| n as u32),
                    invocations: consent
                        .get("invocations")
                        .and_then(Value::as_u64)
                        .unwrap_or(0) as u32,
                });
            }
        }
    }

    if let Some(list) = context.get("consent_tickets").and_then(Value::as_array) {
        for entry in list {
            if let Ok(ticket) = serde_json::from_value::<ConsentTicket>(entry.clone()) {
                tickets.push(ticket);
            }
        }
    }

    tickets
}

/// The consent gate.
///
/// Succeeds only if at least one extracted ticket is valid at `now` and
/// covers `target_scope` (any valid ticket suffices when no target is
/// requested).
pub fn check(context: &Value, target_scope: Option<ConsentScope>, now: f64) -> ConsentEvidence {
    let tickets = extract_tickets(context, now);

    if tickets.is_empty() {
        return ConsentEvidence {
            ok: false,
            tickets,
            target_scope,
            reason: "consent:missing".to_string(),
        };
    }

    let ok = tickets.iter().any(|t| {
        t.is_valid(now)
            && match target_scope {
                Some(target) => t.scope.covers(target),
                None => true,
            }
    });

    ConsentEvidence {
        ok,
        tickets,
        target_scope,
        reason: if ok {
            "consent:validated".to_string()
        } else {
            "consent:invalid_or_out_of_scope".to_string()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: f64 = 1_700_000_000.0;

    #[test]
    fn test_scope_ordering() {
        assert!(ConsentScope::Self_.rank() < ConsentScope::Public.rank());
        assert!(ConsentScope::Group.covers(ConsentScope::Self_));
        assert!(ConsentScope::Group.covers(ConsentScope::Group));
        assert!(!ConsentScope::Group.covers(ConsentScope::Public));
    }

    #[test]
    fn test_scope_parse() {
        assert_eq!("org".parse::<ConsentScope>().unwrap(), ConsentScope::Org);
        assert_eq!("SELF".parse::<ConsentScope>().unwrap(), ConsentScope::Self_);
        assert!("cosmos".parse::<ConsentScope>().is_err());
    }

    #[test]
    fn test_ticket_ttl_expiry() {
        let ticket = ConsentTicket::new("user", ConsentScope::Org, NOW, 10.0);
        assert!(ticket.is_valid(NOW + 5.0));
        assert!(!ticket.is_valid(NOW + 11.0));
    }

    #[test]
    fn test_ticket_invocation_cap() {
        let mut ticket = ConsentTicket::new("user", ConsentScope::Group, NOW, 3600.0).with_cap(2);
        assert!(ticket.use_once(NOW));
        assert!(ticket.use_once(NOW));
        assert!(!ticket.is_valid(NOW));
        assert!(!ticket.use_once(NOW));
    }

    #[test]
    fn test_ticket_without_cap_never_exhausts() {
        let mut ticket = ConsentTicket::new("user", ConsentScope::Dyad, NOW, 3600.0);
        for _ in 0..100 {
            assert!(ticket.use_once(NOW));
        }
        assert!(ticket.is_valid(NOW));
    }

    #[test]
    fn test_extract_compact_consent_shape() {
        let context = json!({"consent": {"valid": true, "scope": "org"}});
        let tickets = extract_tickets(&context, NOW);
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].scope, ConsentScope::Org);
        assert!(tickets[0].is_valid(NOW));
    }

    #[test]
    fn test_extract_ignores_invalid_consent() {
        let context = json!({"consent": {"valid": false, "scope": "org"}});
        assert!(extract_tickets(&context, NOW).is_empty());
    }

    #[test]
    fn test_extract_ticket_list() {
        let context = json!({
            "consent_tickets": [{
                "holder": "user",
                "scope": "group",
                "issued_at": NOW,
                "ttl_seconds": 3600.0,
                "max_invocations": 1,
                "invocations": 0
            }]
        });
        let tickets = extract_tickets(&context, NOW);
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].max_invocations, Some(1));
    }

    #[test]
    fn test_check_missing_consent() {
        let evidence = check(&json!({}), None, NOW);
        assert!(!evidence.ok);
        assert_eq!(evidence.reason, "consent:missing");
    }

    #[test]
    fn test_check_de_escalation_only() {
        let context = json!({"consent": {"valid": true, "scope": "group"}});
        assert!(check(&context, Some(ConsentScope::Self_), NOW).ok);
        assert!(check(&context, Some(ConsentScope::Group), NOW).ok);
        assert!(!check(&context, Some(ConsentScope::Public), NOW).ok);
    }

    #[test]
    fn test_check_expired_ticket_fails() {
        let context = json!({"consent": {
            "valid": true,
            "scope": "org",
            "issued_at": NOW - 7200.0,
            "ttl_seconds": 3600.0
        }});
        let evidence = check(&context, None, NOW);
        assert!(!evidence.ok);
    }
}
