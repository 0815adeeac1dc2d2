use core_config::{ConfigError, FromEnv, env_parse_or};

/// Switches for rules that differ between deployments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlogPolicy {
    /// Require a valid token from the blog's creator on update
    pub require_owner_for_update: bool,
}

impl BlogPolicy {
    pub fn owner_only_updates() -> Self {
        Self {
            require_owner_for_update: true,
        }
    }
}

/// - `BLOG_UPDATE_REQUIRES_OWNER` (optional, default: false)
impl FromEnv for BlogPolicy {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            require_owner_for_update: env_parse_or("BLOG_UPDATE_REQUIRES_OWNER", false)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_defaults_to_open_updates() {
        temp_env::with_var_unset("BLOG_UPDATE_REQUIRES_OWNER", || {
            assert_eq!(BlogPolicy::from_env().unwrap(), BlogPolicy::default());
        });
    }

    #[test]
    fn test_policy_from_env() {
        temp_env::with_var("BLOG_UPDATE_REQUIRES_OWNER", Some("true"), || {
            assert!(BlogPolicy::from_env().unwrap().require_owner_for_update);
        });
        temp_env::with_var("BLOG_UPDATE_REQUIRES_OWNER", Some("sometimes"), || {
            assert!(BlogPolicy::from_env().is_err());
        });
    }
}
