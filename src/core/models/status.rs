//! Per-vertex immunization status

use std::fmt;

/// Immunization status of a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Vertex is immunized (nonzero flag)
    Immunized,
    /// Vertex is vulnerable (zero flag)
    Vulnerable,
}

impl Status {
    /// Map a CSV flag to a status: nonzero is immunized, zero is vulnerable
    #[must_use]
    pub const fn from_flag(flag: i64) -> Self {
        if flag == 0 {
            Self::Vulnerable
        } else {
            Self::Immunized
        }
    }

    /// Canonical CSV flag for this status
    #[must_use]
    pub const fn flag(self) -> u8 {
        match self {
            Self::Immunized => 1,
            Self::Vulnerable => 0,
        }
    }

    /// Lowercase name used in logs and drawings
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Immunized => "immunized",
            Self::Vulnerable => "vulnerable",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flag() {
        assert_eq!(Status::from_flag(0), Status::Vulnerable);
        assert_eq!(Status::from_flag(1), Status::Immunized);
        assert_eq!(Status::from_flag(-3), Status::Immunized);
        assert_eq!(Status::from_flag(42), Status::Immunized);
    }

    #[test]
    fn test_flag_matches_from_flag() {
        for status in [Status::Immunized, Status::Vulnerable] {
            assert_eq!(Status::from_flag(i64::from(status.flag())), status);
        }
    }
}
