//! TOML parameter file for wire generation.
//!
//! All keys live under a `[Parameters]` table. Keys this crate does not know
//! (such as switches for downstream stages) are ignored when loading.
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::batch::output::FileNaming;
use crate::batch::{BatchGenerator, LevelPlan};
use crate::error::{Error, Result};
use crate::sampling::{AttributeSource, DistributionTable};
use crate::wire::placer::WireBounds;

/// Contents of a parameter file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireConfig {
    #[serde(rename = "Parameters", default)]
    pub parameters: WireParameters,
}

/// Generation parameters. Missing keys take their default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireParameters {
    pub min_length: f64,
    pub max_length: f64,
    pub bool_length_by_list: bool,
    pub length_prop_list: String,

    pub min_width: f64,
    pub max_width: f64,
    pub bool_width_by_list: bool,
    pub width_prop_list: String,

    /// Degrees.
    pub max_opening_angle: f64,
    pub bool_alpha_by_list: bool,
    pub alpha_prop_list: String,

    pub image_size: u32,
    pub n_start: usize,
    pub n_end: usize,
    pub n_step: usize,
    pub allow_outside: bool,
    pub destinationpath: PathBuf,

    /// Worker threads; host parallelism when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
    /// Base seed; random when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for WireParameters {
    fn default() -> Self {
        Self {
            min_length: 500.0,
            max_length: 1000.0,
            bool_length_by_list: false,
            length_prop_list: String::new(),
            min_width: 10.0,
            max_width: 20.0,
            bool_width_by_list: false,
            width_prop_list: String::new(),
            max_opening_angle: 90.0,
            bool_alpha_by_list: false,
            alpha_prop_list: String::new(),
            image_size: 4096,
            n_start: 100,
            n_end: 100,
            n_step: 10,
            allow_outside: false,
            destinationpath: PathBuf::from("wires"),
            threads: None,
            seed: None,
        }
    }
}

impl WireConfig {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = Self::parse(&fs::read_to_string(path)?)?;
        info!("Loaded parameters from {}.", path.display());
        Ok(config)
    }

    /// Loads `path`, writing a default file first if none exists.
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }
        let config = Self::default();
        config.save(path)?;
        info!("Created default parameter file {}.", path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        debug!("Saved parameters to {}.", path.display());
        Ok(())
    }

    /// Validates the parameters, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        let p = &self.parameters;
        if p.image_size == 0 {
            return Err(Error::InvalidConfig("image_size must be > 0".into()));
        }
        check_range("length", p.min_length, p.max_length)?;
        check_range("width", p.min_width, p.max_width)?;
        if !(0.0..=360.0).contains(&p.max_opening_angle) {
            return Err(Error::InvalidConfig(format!(
                "max_opening_angle must lie in [0, 360], got {}",
                p.max_opening_angle
            )));
        }
        self.plan().validate()?;
        for (enabled, list, key) in [
            (p.bool_length_by_list, &p.length_prop_list, "length_prop_list"),
            (p.bool_width_by_list, &p.width_prop_list, "width_prop_list"),
            (p.bool_alpha_by_list, &p.alpha_prop_list, "alpha_prop_list"),
        ] {
            if enabled && list.trim().is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "{key} must name a file when its list mode is enabled"
                )));
            }
        }
        if p.threads == Some(0) {
            return Err(Error::InvalidConfig("threads must be > 0".into()));
        }
        Ok(())
    }

    /// Builds placement bounds, loading every enabled distribution table.
    ///
    /// A missing or malformed table is an error, since it would affect every level.
    pub fn bounds(&self) -> Result<WireBounds> {
        self.validate()?;
        let p = &self.parameters;
        let source = |by_list: bool, list: &str, min: f64, max: f64| -> Result<AttributeSource> {
            if by_list {
                Ok(AttributeSource::Table(DistributionTable::load(list.trim())?))
            } else {
                Ok(AttributeSource::uniform(min, max))
            }
        };

        let bounds = WireBounds::uniform(
            p.image_size,
            (p.min_length, p.max_length),
            (p.min_width, p.max_width),
            p.max_opening_angle,
        )
        .with_length(source(
            p.bool_length_by_list,
            &p.length_prop_list,
            p.min_length,
            p.max_length,
        )?)
        .with_width(source(
            p.bool_width_by_list,
            &p.width_prop_list,
            p.min_width,
            p.max_width,
        )?)
        .with_opening_angle(source(
            p.bool_alpha_by_list,
            &p.alpha_prop_list,
            0.0,
            p.max_opening_angle,
        )?)
        .with_allow_outside(p.allow_outside);
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn plan(&self) -> LevelPlan {
        let p = &self.parameters;
        LevelPlan::new(p.n_start, p.n_end, p.n_step)
    }

    pub fn naming(&self) -> FileNaming {
        let p = &self.parameters;
        FileNaming::new(
            (p.min_length, p.max_length),
            (p.min_width, p.max_width),
            p.image_size,
        )
    }

    pub fn destination(&self) -> &Path {
        &self.parameters.destinationpath
    }

    /// Builds a generator honouring the optional `threads` and `seed` keys.
    pub fn generator(&self) -> Result<BatchGenerator> {
        let mut generator = BatchGenerator::try_new(self.bounds()?, self.plan())?;
        if let Some(threads) = self.parameters.threads {
            generator = generator.with_workers(threads);
        }
        if let Some(seed) = self.parameters.seed {
            generator = generator.with_seed(seed);
        }
        Ok(generator)
    }
}

fn check_range(name: &str, min: f64, max: f64) -> Result<()> {
    if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
        return Err(Error::InvalidConfig(format!(
            "{name} bounds must satisfy 0 < min <= max, got [{min}, {max}]"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::AttributeSampling;

    #[test]
    fn defaults_match_standard_configuration() {
        let p = WireConfig::default().parameters;
        assert_eq!((p.min_length, p.max_length), (500.0, 1000.0));
        assert_eq!((p.min_width, p.max_width), (10.0, 20.0));
        assert_eq!(p.image_size, 4096);
        assert_eq!((p.n_start, p.n_end, p.n_step), (100, 100, 10));
        assert_eq!(p.max_opening_angle, 90.0);
        assert!(!p.allow_outside);
        assert!(WireConfig::default().validate().is_ok());
        assert_eq!(WireConfig::default().plan().level_count(), 1);
    }

    #[test]
    fn parses_parameters_and_ignores_unknown_keys() {
        let config = WireConfig::parse(
            r#"
            [Parameters]
            min_length = 50
            max_length = 80.5
            image_size = 512
            n_start = 10
            n_end = 30
            n_step = 10
            perform_fcr = true
            perform_skeletonize = false
            seed = 7
            "#,
        )
        .unwrap();
        let p = &config.parameters;
        assert_eq!(p.min_length, 50.0);
        assert_eq!(p.max_length, 80.5);
        assert_eq!(p.image_size, 512);
        assert_eq!(p.min_width, 10.0);
        assert_eq!(p.seed, Some(7));
        assert_eq!(config.plan().level_count(), 3);
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            WireConfig::parse("[Parameters]\nimage_size = \"big\""),
            Err(Error::Toml(_))
        ));
    }

    #[test]
    fn validation_catches_bad_values() {
        let mut config = WireConfig::default();
        config.parameters.min_length = 0.0;
        assert!(config.validate().is_err());

        let mut config = WireConfig::default();
        config.parameters.min_width = 30.0;
        assert!(config.validate().is_err());

        let mut config = WireConfig::default();
        config.parameters.max_opening_angle = 400.0;
        assert!(config.validate().is_err());

        let mut config = WireConfig::default();
        config.parameters.n_step = 0;
        assert!(config.validate().is_err());

        let mut config = WireConfig::default();
        config.parameters.bool_width_by_list = true;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn load_or_create_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("wires.toml");
        let created = WireConfig::load_or_create(&path).unwrap();
        assert!(path.is_file());
        assert_eq!(created, WireConfig::default());

        let mut edited = created.clone();
        edited.parameters.n_end = 200;
        edited.parameters.threads = Some(2);
        edited.save(&path).unwrap();
        assert_eq!(WireConfig::load_or_create(&path).unwrap(), edited);
    }

    #[test]
    fn bounds_load_enabled_tables() {
        let dir = tempfile::tempdir().unwrap();
        let table = dir.path().join("lengths.csv");
        fs::write(&table, "100,1\n200,3\n").unwrap();

        let mut config = WireConfig::default();
        config.parameters.bool_length_by_list = true;
        config.parameters.length_prop_list = table.display().to_string();
        let bounds = config.bounds().unwrap();
        assert!(matches!(bounds.length, AttributeSource::Table(_)));
        assert_eq!(bounds.length.range(), (100.0, 200.0));
        assert!(matches!(bounds.width, AttributeSource::Uniform(_)));
        assert_eq!(bounds.opening_angle_deg.range(), (0.0, 90.0));
    }

    #[test]
    fn missing_table_is_fatal() {
        let mut config = WireConfig::default();
        config.parameters.bool_alpha_by_list = true;
        config.parameters.alpha_prop_list = "/nonexistent/angles.csv".into();
        assert!(matches!(config.bounds(), Err(Error::Table { .. })));
        assert!(config.generator().is_err());
    }

    #[test]
    fn generator_applies_threads_and_seed() {
        let mut config = WireConfig::default();
        config.parameters.threads = Some(3);
        config.parameters.seed = Some(99);
        let generator = config.generator().unwrap();
        assert_eq!(generator.workers(), 3);
        assert_eq!(generator.seed(), 99);
        assert_eq!(
            config.naming().stem(100),
            "wires_n-100_length-500-1000_width-10-20_size-4096"
        );
    }
}
