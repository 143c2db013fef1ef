use std::{
    fmt,
    ops::{AddAssign, Index, IndexMut},
};

/// Severity of a log line. Declaration order is the column order of the rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SeverityLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl SeverityLevel {
    pub const ALL: [SeverityLevel; 5] = [Self::Debug, Self::Info, Self::Warning, Self::Error, Self::Critical];

    /// The literal token for this level as it appears in a log line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    /// Match a token against the level literals. Only the exact upper-case spelling counts.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == token)
    }

    fn column(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One counter per severity level, all starting at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelCounts([u64; 5]);

impl LevelCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, level: SeverityLevel) {
        self[level] += 1;
    }

    /// Counters paired with their level, in column order.
    pub fn iter(&self) -> impl Iterator<Item = (SeverityLevel, u64)> + '_ {
        SeverityLevel::ALL.into_iter().map(move |level| (level, self[level]))
    }

    /// Sum of all five counters.
    pub fn sum(&self) -> u64 {
        self.0.iter().sum()
    }
}

impl Index<SeverityLevel> for LevelCounts {
    type Output = u64;

    fn index(&self, level: SeverityLevel) -> &u64 {
        &self.0[level.column()]
    }
}

impl IndexMut<SeverityLevel> for LevelCounts {
    fn index_mut(&mut self, level: SeverityLevel) -> &mut u64 {
        &mut self.0[level.column()]
    }
}

impl AddAssign for LevelCounts {
    fn add_assign(&mut self, other: Self) {
        for level in SeverityLevel::ALL {
            self[level] += other[level];
        }
    }
}
