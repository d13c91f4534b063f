/// Collection holding project proposals
pub const PROPOSALS: &str = "proposals";

/// Collection holding community events
pub const EVENTS: &str = "events";

/// How long a proposal stays open for votes
pub const DEFAULT_PROPOSAL_LIFETIME_DAYS: i64 = 7;
