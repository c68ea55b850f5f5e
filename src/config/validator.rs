use crate::config::Config;
use crate::error::{HitmergeError, Result, ValidationError};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_schema_version(config, &mut errors);
        Self::validate_search(config, &mut errors);
        Self::validate_display(config, &mut errors);
        Self::validate_profiles(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(HitmergeError::ConfigValidation { errors })
        }
    }

    fn validate_schema_version(config: &Config, errors: &mut Vec<ValidationError>) {
        let version = &config.meta.schema_version;
        if version != "1.0.0" {
            errors.push(ValidationError::new(
                "_meta.schema_version",
                format!("Unsupported schema version: {}", version),
            ));
        }
    }

    fn validate_search(config: &Config, errors: &mut Vec<ValidationError>) {
        // A per-request limit of 0 is legal, a default of 0 would silence every search
        if config.search.default_limit == 0 {
            errors.push(ValidationError::new(
                "search.default_limit",
                "Default limit must be greater than 0",
            ));
        }
    }

    fn validate_display(config: &Config, errors: &mut Vec<ValidationError>) {
        if let Some(icon) = &config.display.default_icon {
            if icon.trim().is_empty() {
                errors.push(ValidationError::new(
                    "display.default_icon",
                    "Default icon cannot be blank; omit it instead",
                ));
            }
        }
    }

    fn validate_profiles(config: &Config, errors: &mut Vec<ValidationError>) {
        for (name, overrides) in &config.profiles {
            if name.trim().is_empty() {
                errors.push(ValidationError::new("profiles", "Profile name cannot be empty"));
            }

            if overrides.default_limit == Some(0) {
                errors.push(ValidationError::new(
                    format!("profiles.{}.default_limit", name),
                    "Default limit must be greater than 0",
                ));
            }

            if let Some(icon) = &overrides.default_icon {
                if icon.trim().is_empty() {
                    errors.push(ValidationError::new(
                        format!("profiles.{}.default_icon", name),
                        "Default icon cannot be blank",
                    ));
                }
            }
        }
    }
}
