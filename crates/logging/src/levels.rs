//! Flag enums and level structures for info and debug verbosity.

/// Info flags for user-facing diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InfoFlag {
    /// Session lifecycle (init, finalize, reset).
    Session,
    /// Engine usage statistics.
    Stats,
}

impl InfoFlag {
    /// Every info flag, in declaration order.
    pub const ALL: [Self; 2] = [Self::Session, Self::Stats];

    /// Token used on the command line (`--info=stats2`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Stats => "stats",
        }
    }
}

/// Debug flags for internal diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DebugFlag {
    /// Block engine runs: seeding, block counts, read-back.
    Engine,
    /// Engine lock acquisition and release.
    Lock,
    /// Accumulator buffering decisions.
    Stream,
    /// Padding and finalization.
    Final,
}

impl DebugFlag {
    /// Every debug flag, in declaration order.
    pub const ALL: [Self; 4] = [Self::Engine, Self::Lock, Self::Stream, Self::Final];

    /// Token used on the command line (`--debug=lock2`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Engine => "engine",
            Self::Lock => "lock",
            Self::Stream => "stream",
            Self::Final => "final",
        }
    }
}

/// Info verbosity levels for each flag.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InfoLevels {
    /// Session lifecycle level.
    pub session: u8,
    /// Statistics level.
    pub stats: u8,
}

impl InfoLevels {
    /// Get the level for a specific flag.
    pub fn get(&self, flag: InfoFlag) -> u8 {
        match flag {
            InfoFlag::Session => self.session,
            InfoFlag::Stats => self.stats,
        }
    }

    /// Set the level for a specific flag.
    pub fn set(&mut self, flag: InfoFlag, level: u8) {
        match flag {
            InfoFlag::Session => self.session = level,
            InfoFlag::Stats => self.stats = level,
        }
    }

    /// Set all flags to the specified level.
    pub fn set_all(&mut self, level: u8) {
        self.session = level;
        self.stats = level;
    }
}

/// Debug verbosity levels for each flag.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebugLevels {
    /// Block engine level.
    pub engine: u8,
    /// Engine lock level.
    pub lock: u8,
    /// Accumulator buffering level.
    pub stream: u8,
    /// Finalization level.
    pub final_: u8,
}

impl DebugLevels {
    /// Get the level for a specific flag.
    pub fn get(&self, flag: DebugFlag) -> u8 {
        match flag {
            DebugFlag::Engine => self.engine,
            DebugFlag::Lock => self.lock,
            DebugFlag::Stream => self.stream,
            DebugFlag::Final => self.final_,
        }
    }

    /// Set the level for a specific flag.
    pub fn set(&mut self, flag: DebugFlag, level: u8) {
        match flag {
            DebugFlag::Engine => self.engine = level,
            DebugFlag::Lock => self.lock = level,
            DebugFlag::Stream => self.stream = level,
            DebugFlag::Final => self.final_ = level,
        }
    }

    /// Set all flags to the specified level.
    pub fn set_all(&mut self, level: u8) {
        self.engine = level;
        self.lock = level;
        self.stream = level;
        self.final_ = level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_levels_get_set_roundtrip() {
        let mut levels = InfoLevels::default();
        for (i, flag) in InfoFlag::ALL.into_iter().enumerate() {
            levels.set(flag, i as u8 + 1);
        }
        assert_eq!(levels.get(InfoFlag::Session), 1);
        assert_eq!(levels.get(InfoFlag::Stats), 2);
    }

    #[test]
    fn debug_levels_set_all() {
        let mut levels = DebugLevels::default();
        levels.set_all(3);
        for flag in DebugFlag::ALL {
            assert_eq!(levels.get(flag), 3);
        }
    }

    #[test]
    fn flag_names_are_unique() {
        let names: Vec<_> = DebugFlag::ALL.iter().map(|f| f.name()).collect();
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
