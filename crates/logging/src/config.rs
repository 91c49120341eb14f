//! Verbosity configuration combining info and debug levels.

use super::levels::{DebugFlag, DebugLevels, InfoFlag, InfoLevels};

/// Combined verbosity configuration for info and debug flags.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerbosityConfig {
    /// Info flag levels.
    pub info: InfoLevels,
    /// Debug flag levels.
    pub debug: DebugLevels,
}

impl VerbosityConfig {
    /// Create a configuration from a `-v` count.
    ///
    /// Level 0 is silent, 1 reports sessions, 2 adds statistics and engine
    /// runs, 3 and above turns every debug flag on.
    pub fn from_verbose_level(level: u8) -> Self {
        let mut config = Self::default();

        match level {
            0 => {}
            1 => {
                config.info.session = 1;
            }
            2 => {
                config.info.session = 1;
                config.info.stats = 1;
                config.debug.engine = 1;
                config.debug.final_ = 1;
            }
            _ => {
                config.info.set_all(2);
                config.debug.set_all(2);
            }
        }

        config
    }

    /// Apply a single info flag token (e.g., "stats2", "session").
    pub fn apply_info_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;

        if name == "all" {
            self.info.set_all(level);
            return Ok(());
        }

        let flag = InfoFlag::ALL
            .into_iter()
            .find(|flag| flag.name() == name)
            .ok_or_else(|| format!("unknown info flag: {name}"))?;

        self.info.set(flag, level);
        Ok(())
    }

    /// Apply a single debug flag token (e.g., "lock2", "engine").
    pub fn apply_debug_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;

        if name == "all" {
            self.debug.set_all(level);
            return Ok(());
        }

        let flag = DebugFlag::ALL
            .into_iter()
            .find(|flag| flag.name() == name)
            .ok_or_else(|| format!("unknown debug flag: {name}"))?;

        self.debug.set(flag, level);
        Ok(())
    }

    /// Apply a comma-separated list of debug tokens (`"lock2,engine"`).
    pub fn apply_debug_list(&mut self, list: &str) -> Result<(), String> {
        list.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .try_for_each(|token| self.apply_debug_flag(token))
    }

    /// Apply a comma-separated list of info tokens (`"stats,session2"`).
    pub fn apply_info_list(&mut self, list: &str) -> Result<(), String> {
        list.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .try_for_each(|token| self.apply_info_flag(token))
    }
}

/// Parse a flag token like "lock2" into ("lock", 2) or "engine" into ("engine", 1).
fn parse_flag_token(token: &str) -> Result<(&str, u8), String> {
    if token.is_empty() {
        return Err("empty flag token".to_string());
    }

    let digit_start = token.find(|c: char| c.is_ascii_digit());

    match digit_start {
        Some(0) => Err(format!("flag token has no name: {token}")),
        Some(pos) => {
            let name = &token[..pos];
            let level = token[pos..]
                .parse::<u8>()
                .map_err(|_| format!("invalid level in flag: {token}"))?;
            Ok((name, level))
        }
        None => Ok((token, 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_verbose_level_0_is_silent() {
        assert_eq!(VerbosityConfig::from_verbose_level(0), VerbosityConfig::default());
    }

    #[test]
    fn test_from_verbose_level_2() {
        let config = VerbosityConfig::from_verbose_level(2);

        assert_eq!(config.info.session, 1);
        assert_eq!(config.info.stats, 1);
        assert_eq!(config.debug.engine, 1);
        assert_eq!(config.debug.final_, 1);
        assert_eq!(config.debug.lock, 0);
        assert_eq!(config.debug.stream, 0);
    }

    #[test]
    fn test_from_verbose_level_saturates() {
        let three = VerbosityConfig::from_verbose_level(3);
        let nine = VerbosityConfig::from_verbose_level(9);
        assert_eq!(three, nine);
        assert_eq!(three.debug.lock, 2);
    }

    #[test]
    fn test_parse_flag_token() {
        assert_eq!(parse_flag_token("lock").unwrap(), ("lock", 1));
        assert_eq!(parse_flag_token("lock2").unwrap(), ("lock", 2));
        assert_eq!(parse_flag_token("engine0").unwrap(), ("engine", 0));
        assert!(parse_flag_token("").is_err());
        assert!(parse_flag_token("7").is_err());
        assert!(parse_flag_token("lock999").is_err());
    }

    #[test]
    fn test_apply_debug_flag() {
        let mut config = VerbosityConfig::default();
        config.apply_debug_flag("stream3").unwrap();
        config.apply_debug_flag("final").unwrap();

        assert_eq!(config.debug.stream, 3);
        assert_eq!(config.debug.final_, 1);
        assert!(config.apply_debug_flag("bogus").is_err());
    }

    #[test]
    fn test_apply_info_flag_all() {
        let mut config = VerbosityConfig::default();
        config.apply_info_flag("all2").unwrap();
        assert_eq!(config.info.session, 2);
        assert_eq!(config.info.stats, 2);
    }

    #[test]
    fn test_apply_debug_list() {
        let mut config = VerbosityConfig::default();
        config.apply_debug_list("lock2, engine ,").unwrap();
        assert_eq!(config.debug.lock, 2);
        assert_eq!(config.debug.engine, 1);

        let err = config.apply_debug_list("lock,nope").unwrap_err();
        assert!(err.contains("nope"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_shape() {
        let config = VerbosityConfig::from_verbose_level(1);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["info"]["session"], 1);
        assert_eq!(json["debug"]["lock"], 0);

        let back: VerbosityConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}
