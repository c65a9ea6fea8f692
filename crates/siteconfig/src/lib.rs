use std::fmt;
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

pub const CONFIG_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Easing applied to the transition timeline. Defaults to the quadratic
/// ease-out `power1.out`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    Smoothstep,
    EaseInOut,
    #[default]
    #[serde(alias = "power1.out")]
    Power1Out,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SiteConfig {
    pub version: u32,
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub transition: TransitionSettings,
    #[serde(default)]
    pub render: RenderSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Distance from the camera to the image planes at z = 0.
    pub distance: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            distance: 200.0,
            near: 100.0,
            far: 2000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TransitionSettings {
    #[serde(
        default = "default_transition_duration",
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub duration: Duration,
    #[serde(default = "default_timeline_end")]
    pub timeline_end: f32,
    #[serde(default)]
    pub easing: Easing,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            duration: default_transition_duration(),
            timeline_end: default_timeline_end(),
            easing: Easing::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Amount added to `uTime` every frame, independent of wall-clock time.
    pub time_step: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self { time_step: 0.3 }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            camera: CameraSettings::default(),
            transition: TransitionSettings::default(),
            render: RenderSettings::default(),
        }
    }
}

fn default_transition_duration() -> Duration {
    Duration::from_secs(2)
}

fn default_timeline_end() -> f32 {
    4.0
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Duration::from_secs(v))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Duration::from_secs(v as u64))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if !v.is_finite() || v.is_sign_negative() {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Duration::from_secs_f64(v))
        }
    }

    deserializer.deserialize_any(Visitor)
}

fn serialize_duration<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&humantime::format_duration(*value).to_string())
}

impl SiteConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: SiteConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected {CONFIG_VERSION}",
                self.version
            )));
        }

        let camera = &self.camera;
        if !camera.distance.is_finite() || camera.distance <= 0.0 {
            return Err(ConfigError::Invalid(
                "camera.distance must be greater than zero".into(),
            ));
        }
        if !(camera.near > 0.0 && camera.near < camera.far && camera.far.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "camera clip planes must satisfy 0 < near < far (near={}, far={})",
                camera.near, camera.far
            )));
        }

        if self.transition.duration.is_zero() {
            return Err(ConfigError::Invalid(
                "transition.duration must be greater than zero".into(),
            ));
        }
        let end = self.transition.timeline_end;
        if !end.is_finite() || end <= 0.0 {
            return Err(ConfigError::Invalid(
                "transition.timeline_end must be a positive number".into(),
            ));
        }

        let step = self.render.time_step;
        if !step.is_finite() || step <= 0.0 {
            return Err(ConfigError::Invalid(
                "render.time_step must be a positive number".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
version = 1

[camera]
distance = 250.0
near = 50
far = 1500

[transition]
duration = "1500ms"
timeline_end = 4.0
easing = "ease-in-out"

[render]
time_step = 0.5
"#;

    #[test]
    fn parses_sample_config() {
        let config = SiteConfig::from_toml_str(SAMPLE).expect("parse config");
        assert_eq!(config.camera.distance, 250.0);
        assert_eq!(config.camera.near, 50.0);
        assert_eq!(config.transition.duration, Duration::from_millis(1500));
        assert_eq!(config.transition.easing, Easing::EaseInOut);
        assert_eq!(config.render.time_step, 0.5);
    }

    #[test]
    fn minimal_config_uses_page_defaults() {
        let config = SiteConfig::from_toml_str("version = 1").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.transition.duration, Duration::from_secs(2));
        assert_eq!(config.transition.easing, Easing::Power1Out);
        assert_eq!(config.render.time_step, 0.3);
    }

    #[test]
    fn accepts_numeric_duration_and_dotted_easing() {
        let config = SiteConfig::from_toml_str(
            r#"
version = 1

[transition]
duration = 3
easing = "power1.out"
"#,
        )
        .unwrap();
        assert_eq!(config.transition.duration, Duration::from_secs(3));
        assert_eq!(config.transition.easing, Easing::Power1Out);
    }

    #[test]
    fn rejects_unknown_version() {
        let err = SiteConfig::from_toml_str("version = 2").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_inverted_clip_planes() {
        let err = SiteConfig::from_toml_str(
            r#"
version = 1

[camera]
near = 500
far = 100
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_duration_and_step() {
        let zero_duration = SiteConfig::from_toml_str(
            r#"
version = 1

[transition]
duration = 0
"#,
        )
        .unwrap_err();
        assert!(matches!(zero_duration, ConfigError::Invalid(_)));

        let zero_step = SiteConfig::from_toml_str(
            r#"
version = 1

[render]
time_step = 0.0
"#,
        )
        .unwrap_err();
        assert!(matches!(zero_step, ConfigError::Invalid(_)));
    }

    #[test]
    fn serialized_config_parses_back() {
        let config = SiteConfig::from_toml_str(SAMPLE).unwrap();
        let rendered = config.to_toml_string().unwrap();
        assert!(rendered.contains("duration = \"1s 500ms\""));
        let reparsed = SiteConfig::from_toml_str(&rendered).unwrap();
        assert_eq!(reparsed, config);
    }
}
