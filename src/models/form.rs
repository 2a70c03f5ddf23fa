use serde::{Deserialize, Serialize};

/// Retention policy stored on a form: which submissions an age-based purge
/// may remove.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurgeMode {
    /// Never purge submissions of this form automatically.
    #[default]
    None,
    /// Purge unfinished (draft) submissions only.
    Draft,
    /// Purge completed submissions only.
    Completed,
    /// Purge every submission regardless of draft status.
    All,
}

impl PurgeMode {
    /// The scope a purge should use, or `None` when the policy disables purging.
    pub fn scope(&self) -> Option<PurgeScope> {
        match self {
            PurgeMode::None => None,
            PurgeMode::Draft => Some(PurgeScope::Draft),
            PurgeMode::Completed => Some(PurgeScope::Completed),
            PurgeMode::All => Some(PurgeScope::All),
        }
    }
}

impl std::fmt::Display for PurgeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PurgeMode::None => write!(f, "none"),
            PurgeMode::Draft => write!(f, "draft"),
            PurgeMode::Completed => write!(f, "completed"),
            PurgeMode::All => write!(f, "all"),
        }
    }
}

impl std::str::FromStr for PurgeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(PurgeMode::None),
            "draft" => Ok(PurgeMode::Draft),
            "completed" => Ok(PurgeMode::Completed),
            "all" => Ok(PurgeMode::All),
            _ => Err(format!("Invalid purge mode: {}", s)),
        }
    }
}

/// The submission subset an actual purge run targets.
///
/// Unlike [`PurgeMode`] there is no "none": a resolved purge always deletes
/// something.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum PurgeScope {
    Draft,
    Completed,
    All,
}

impl PurgeScope {
    /// Draft-status restriction for the submission query.
    ///
    /// `Some(true)` keeps drafts only, `Some(false)` completed only,
    /// `None` leaves draft status unrestricted.
    pub fn draft_filter(&self) -> Option<bool> {
        match self {
            PurgeScope::Draft => Some(true),
            PurgeScope::Completed => Some(false),
            PurgeScope::All => None,
        }
    }
}

impl std::fmt::Display for PurgeScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PurgeScope::Draft => write!(f, "draft"),
            PurgeScope::Completed => write!(f, "completed"),
            PurgeScope::All => write!(f, "all"),
        }
    }
}

/// A form and its retention settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    /// Machine name, e.g. `contact`
    pub id: String,
    /// Human-readable title shown in prompts
    pub label: String,
    /// Which submissions the stored policy allows purging
    pub purge_mode: PurgeMode,
    /// Days to retain submissions; 0 disables age-based purging
    pub purge_days: u32,
}

/// Input for creating a form.
#[derive(Debug, Clone)]
pub struct CreateForm {
    pub id: String,
    pub label: String,
    pub purge_mode: PurgeMode,
    pub purge_days: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purge_mode_round_trips_through_str() {
        for mode in [
            PurgeMode::None,
            PurgeMode::Draft,
            PurgeMode::Completed,
            PurgeMode::All,
        ] {
            assert_eq!(mode.to_string().parse::<PurgeMode>().unwrap(), mode);
        }
        assert!("everything".parse::<PurgeMode>().is_err());
    }

    #[test]
    fn test_none_mode_has_no_scope() {
        assert_eq!(PurgeMode::None.scope(), None);
        assert_eq!(PurgeMode::Draft.scope(), Some(PurgeScope::Draft));
        assert_eq!(PurgeMode::All.scope(), Some(PurgeScope::All));
    }

    #[test]
    fn test_draft_filter() {
        assert_eq!(PurgeScope::Draft.draft_filter(), Some(true));
        assert_eq!(PurgeScope::Completed.draft_filter(), Some(false));
        assert_eq!(PurgeScope::All.draft_filter(), None);
    }
}
