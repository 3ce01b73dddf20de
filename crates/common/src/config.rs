use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn from_env() -> Self {
        Self::parse(&env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_production_aliases() {
        assert_eq!(Environment::parse("production"), Environment::Production);
        assert_eq!(Environment::parse("PROD"), Environment::Production);
    }

    #[test]
    fn test_parse_defaults_to_development() {
        assert_eq!(Environment::parse("development"), Environment::Development);
        assert_eq!(
            Environment::parse("anything-else"),
            Environment::Development,
            "Unrecognized values should fall back to development"
        );
    }

    #[test]
    fn test_as_str_round_trip() {
        assert_eq!(Environment::Production.as_str(), "production");
        assert_eq!(Environment::Development.as_str(), "development");
    }
}
