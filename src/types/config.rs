use crate::calculator::EngineOptions;
use crate::error::RekrutError;
use crate::report::OutputFormat;
use serde::Deserialize;

pub const MAX_DECIMALS: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RekrutConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub strict_requirements: bool,
    #[serde(default)]
    pub cap_stage_scores: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_decimals")]
    pub decimals: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            decimals: default_decimals(),
        }
    }
}

fn default_decimals() -> usize {
    2
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_dir")]
    pub dir: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            dir: default_catalog_dir(),
        }
    }
}

fn default_catalog_dir() -> String {
    "formulas".to_string()
}

impl RekrutConfig {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            strict_requirements: self.engine.strict_requirements,
            cap_stage_scores: self.engine.cap_stage_scores,
        }
    }

    pub fn validate(&self) -> Result<(), RekrutError> {
        if self.report.decimals > MAX_DECIMALS {
            return Err(RekrutError::ConfigParse(format!(
                "report.decimals must be at most {MAX_DECIMALS} (found {})",
                self.report.decimals
            )));
        }
        if self.catalog.dir.trim().is_empty() {
            return Err(RekrutError::ConfigParse(
                "catalog.dir must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: RekrutConfig = toml::from_str("").expect("empty config should parse");
        assert_eq!(cfg, RekrutConfig::default());
        assert_eq!(cfg.report.decimals, 2);
        assert_eq!(cfg.report.format, OutputFormat::Md);
        assert_eq!(cfg.catalog.dir, "formulas");
        assert_eq!(cfg.engine_options(), EngineOptions::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn parse_full_config() {
        let cfg: RekrutConfig = toml::from_str(
            r#"
[engine]
strict_requirements = true
cap_stage_scores = true

[report]
format = "json"
decimals = 4

[catalog]
dir = "data/formulas"
"#,
        )
        .expect("full config should parse");

        assert_eq!(cfg.report.format, OutputFormat::Json);
        assert_eq!(cfg.report.decimals, 4);
        assert_eq!(cfg.catalog.dir, "data/formulas");
        let options = cfg.engine_options();
        assert!(options.strict_requirements);
        assert!(options.cap_stage_scores);
    }

    #[test]
    fn unknown_report_format_fails_to_parse() {
        let parsed: Result<RekrutConfig, _> = toml::from_str(
            r#"
[report]
format = "sarif"
"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn validate_rejects_too_many_decimals() {
        let cfg: RekrutConfig = toml::from_str(
            r#"
[report]
decimals = 7
"#,
        )
        .expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("report.decimals"));
    }

    #[test]
    fn validate_rejects_blank_catalog_dir() {
        let cfg: RekrutConfig = toml::from_str(
            r#"
[catalog]
dir = "  "
"#,
        )
        .expect("config should parse");
        assert!(cfg.validate().is_err());
    }
}
