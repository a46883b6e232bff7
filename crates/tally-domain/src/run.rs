//! Run module - identifiers for batch extraction runs

use std::fmt;

use uuid::Uuid;

/// Unique identifier for one batch extraction run
///
/// Run ids are UUIDv7, so later runs compare greater and the
/// `tally_{run_id}.xlsx` artifacts list in creation order. The display
/// form doubles as the artifact registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RunId(Uuid);

impl RunId {
    /// Mint the id for a new run
    ///
    /// # Examples
    ///
    /// ```
    /// use tally_domain::RunId;
    ///
    /// let id = RunId::new();
    /// assert_eq!(id.to_string().len(), 36);
    /// ```
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parse a run id handed back by a caller, e.g. a download request
    ///
    /// Accepts any RFC 9562 textual form and canonicalizes it, but
    /// rejects UUIDs that are not version 7; run ids are only ever
    /// minted as UUIDv7.
    ///
    /// # Examples
    ///
    /// ```
    /// use tally_domain::RunId;
    ///
    /// let id = RunId::new();
    /// let echoed = RunId::from_string(&id.to_string().to_uppercase()).unwrap();
    /// assert_eq!(echoed, id);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        let uuid = Uuid::parse_str(s).map_err(|e| format!("Invalid run id: {}", e))?;
        if uuid.get_version_num() != 7 {
            return Err(format!(
                "Invalid run id: UUID version {}",
                uuid.get_version_num()
            ));
        }
        Ok(Self(uuid))
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
