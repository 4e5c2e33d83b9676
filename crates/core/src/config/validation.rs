//! Configuration validation for ensuring configs are usable before a build

use crate::{
    config::TreeConfig,
    error::{Error, Result},
};

/// Deepest separator nesting accepted in `grouping.max_level`
pub const MAX_GROUP_LEVEL: usize = 10;

impl TreeConfig {
    pub fn validate(&self) -> Result<()> {
        let grouping = &self.grouping;
        if grouping.max_level == 0 || grouping.max_level > MAX_GROUP_LEVEL {
            return Err(Error::ConfigError(format!(
                "grouping.max_level must be between 1 and {MAX_GROUP_LEVEL}, got {}",
                grouping.max_level
            )));
        }
        if grouping.separator.is_whitespace() {
            return Err(Error::ConfigError(
                "grouping.separator must not be whitespace".to_string(),
            ));
        }
        if self.special_folders.num_last_tasks == 0 {
            return Err(Error::ConfigError(
                "special_folders.num_last_tasks must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TreeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = TreeConfig::default();
        config.grouping.max_level = MAX_GROUP_LEVEL + 1;
        assert!(config.validate().is_err());

        let mut config = TreeConfig::default();
        config.grouping.separator = ' ';
        assert!(config.validate().is_err());

        let mut config = TreeConfig::default();
        config.special_folders.num_last_tasks = 0;
        assert!(config.validate().is_err());
    }
}
