//! # 机械臂配置
//!
//! 减速比、关节范围、速度窗口与夹爪参数。默认值对应参考机构，
//! 也可以从 TOML 文件加载：
//!
//! ```toml
//! initial_mode = "normal"
//!
//! [axes.x]
//! gear_ratio = 4.89
//! min_deg = -65.0
//! max_deg = 120.0
//!
//! [servos.w]
//! min_deg = -90.0
//! max_deg = 90.0
//!
//! [speed]
//! min = 50.0
//! max = 1000.0
//! default = 50.0
//!
//! [gripper]
//! pwm = 200
//! pulse_ms = 100
//! ```

use crate::axis::{AngleRange, StepperAxis, StepperGeometry};
use crate::error::ConfigError;
use crate::mode::ArmMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 步进电机步距角（每微步的度数）
pub const DEG_PER_STEP: f32 = 0.1125;

pub const X_AXIS_GEAR_RATIO: f32 = 4.89;
pub const Y_AXIS_GEAR_RATIO: f32 = 6.0;
pub const Z_AXIS_GEAR_RATIO: f32 = 4.2;

pub const MIN_SPEED: f32 = 50.0;
pub const MAX_SPEED: f32 = 1000.0;
pub const DEFAULT_SPEED: f32 = 50.0;

pub const GRIPPER_PWM: u8 = 200;
pub const GRIPPER_PULSE_MS: u64 = 100;

/// 机械臂配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmConfig {
    /// 启动时的工作模式（不持久化）
    pub initial_mode: ArmMode,

    /// 步进电机步距角（度/微步）
    pub deg_per_step: f32,

    pub axes: StepperAxes,

    pub servos: ServoAxes,

    pub speed: SpeedLimits,

    pub gripper: GripperConfig,
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            initial_mode: ArmMode::Normal,
            deg_per_step: DEG_PER_STEP,
            axes: StepperAxes::default(),
            servos: ServoAxes::default(),
            speed: SpeedLimits::default(),
            gripper: GripperConfig::default(),
        }
    }
}

/// 三个步进轴的配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepperAxes {
    pub x: AxisConfig,
    pub y: AxisConfig,
    pub z: AxisConfig,
}

impl StepperAxes {
    pub fn get(&self, axis: StepperAxis) -> &AxisConfig {
        match axis {
            StepperAxis::X => &self.x,
            StepperAxis::Y => &self.y,
            StepperAxis::Z => &self.z,
        }
    }
}

impl Default for StepperAxes {
    fn default() -> Self {
        Self {
            x: AxisConfig::new(X_AXIS_GEAR_RATIO, AngleRange::bounded(-65.0, 120.0)),
            y: AxisConfig::new(Y_AXIS_GEAR_RATIO, AngleRange::bounded(-180.0, 5.0)),
            // 参考机构中 z 轴不限位
            z: AxisConfig::new(Z_AXIS_GEAR_RATIO, AngleRange::UNBOUNDED),
        }
    }
}

/// 单个步进轴的配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    /// 减速比（电机轴转角 / 关节转角）
    pub gear_ratio: f32,

    #[serde(flatten)]
    pub range: AngleRange,

    /// 标定时当前位置对应的关节角度（度）
    #[serde(default)]
    pub reference_offset_deg: f32,
}

impl AxisConfig {
    pub fn new(gear_ratio: f32, range: AngleRange) -> Self {
        Self {
            gear_ratio,
            range,
            reference_offset_deg: 0.0,
        }
    }

    /// 推导几何参数
    pub fn geometry(&self, deg_per_step: f32) -> StepperGeometry {
        StepperGeometry::new(
            deg_per_step,
            self.gear_ratio,
            self.range,
            self.reference_offset_deg,
        )
    }
}

/// 两个舵机轴的范围
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServoAxes {
    pub v: AngleRange,
    pub w: AngleRange,
}

impl Default for ServoAxes {
    fn default() -> Self {
        Self {
            // 参考机构中 v 轴不限位
            v: AngleRange::UNBOUNDED,
            w: AngleRange::bounded(-90.0, 90.0),
        }
    }
}

/// 速度（步进电机加速度）窗口
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedLimits {
    pub min: f32,
    pub max: f32,
    /// 启动时应用的加速度
    pub default: f32,
}

impl Default for SpeedLimits {
    fn default() -> Self {
        Self {
            min: MIN_SPEED,
            max: MAX_SPEED,
            default: DEFAULT_SPEED,
        }
    }
}

/// 夹爪驱动参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GripperConfig {
    /// 驱动线上的 PWM 占空比（0-255）
    pub pwm: u8,
    /// 脉冲持续时间（毫秒）
    pub pulse_ms: u64,
}

impl GripperConfig {
    pub fn pulse(&self) -> Duration {
        Duration::from_millis(self.pulse_ms)
    }
}

impl Default for GripperConfig {
    fn default() -> Self {
        Self {
            pwm: GRIPPER_PWM,
            pulse_ms: GRIPPER_PULSE_MS,
        }
    }
}

impl ArmConfig {
    /// 从 TOML 字符串解析并校验
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ArmConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载并校验
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 序列化为 TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// 校验配置
    ///
    /// # 错误
    ///
    /// - 步距角或减速比不是正的有限值
    /// - 范围上下限颠倒或不是有限值
    /// - 速度窗口不满足 `0 < min <= default <= max`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.deg_per_step.is_finite() && self.deg_per_step > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "deg_per_step must be positive, got {}",
                self.deg_per_step
            )));
        }

        for axis in StepperAxis::ALL {
            let cfg = self.axes.get(axis);
            if !(cfg.gear_ratio.is_finite() && cfg.gear_ratio > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "gear_ratio of axis {} must be positive, got {}",
                    axis.axis(),
                    cfg.gear_ratio
                )));
            }
            if !cfg.reference_offset_deg.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "reference_offset_deg of axis {} must be finite",
                    axis.axis()
                )));
            }
            validate_range(&axis.axis().to_string(), &cfg.range)?;
        }
        validate_range("v", &self.servos.v)?;
        validate_range("w", &self.servos.w)?;

        let speed = &self.speed;
        let ordered = speed.min > 0.0 && speed.min <= speed.default && speed.default <= speed.max;
        if !ordered || !speed.max.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "speed limits must satisfy 0 < min <= default <= max, got min={} default={} max={}",
                speed.min, speed.default, speed.max
            )));
        }

        Ok(())
    }

    /// 三个步进轴的几何参数，按 x, y, z 顺序
    pub fn geometries(&self) -> [StepperGeometry; 3] {
        StepperAxis::ALL.map(|axis| self.axes.get(axis).geometry(self.deg_per_step))
    }
}

fn validate_range(name: &str, range: &AngleRange) -> Result<(), ConfigError> {
    for bound in [range.min_deg, range.max_deg].into_iter().flatten() {
        if !bound.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "range bound of axis {name} must be finite"
            )));
        }
    }
    match (range.min_deg, range.max_deg) {
        (Some(min), Some(max)) if min > max => Err(ConfigError::Invalid(format!(
            "range of axis {name} is inverted: min {min} > max {max}"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_reference_mechanism() {
        let config = ArmConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.initial_mode, ArmMode::Normal);
        assert_eq!(config.axes.x.gear_ratio, 4.89);
        assert_eq!(config.axes.x.range, AngleRange::bounded(-65.0, 120.0));
        assert_eq!(config.axes.y.range, AngleRange::bounded(-180.0, 5.0));
        assert!(config.axes.z.range.is_unbounded());
        assert!(config.servos.v.is_unbounded());
        assert_eq!(config.servos.w, AngleRange::bounded(-90.0, 90.0));
        assert_eq!(config.speed.min, 50.0);
        assert_eq!(config.speed.max, 1000.0);
        assert_eq!(config.gripper.pulse(), Duration::from_millis(100));
    }

    #[test]
    fn test_from_toml_partial_override() {
        let config = ArmConfig::from_toml_str(
            r#"
initial_mode = "calibration"

[axes.z]
gear_ratio = 4.2
min_deg = -90.0
max_deg = 90.0

[servos.v]
min_deg = -90.0
max_deg = 90.0

[gripper]
pulse_ms = 5
"#,
        )
        .unwrap();

        assert_eq!(config.initial_mode, ArmMode::Calibration);
        assert_eq!(config.axes.z.range, AngleRange::bounded(-90.0, 90.0));
        assert_eq!(config.servos.v, AngleRange::bounded(-90.0, 90.0));
        // 未覆盖的字段保留默认值
        assert_eq!(config.axes.x, StepperAxes::default().x);
        assert_eq!(config.servos.w, AngleRange::bounded(-90.0, 90.0));
        assert_eq!(config.gripper.pwm, GRIPPER_PWM);
        assert_eq!(config.gripper.pulse_ms, 5);
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = ArmConfig::default();
        config.axes.y.reference_offset_deg = -90.0;
        let text = config.to_toml_string().unwrap();
        let parsed = ArmConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validate_rejects_bad_gear_ratio() {
        let mut config = ArmConfig::default();
        config.axes.y.gear_ratio = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("gear_ratio of axis y"));
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let mut config = ArmConfig::default();
        config.servos.w = AngleRange::bounded(10.0, -10.0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_speed_window() {
        let mut config = ArmConfig::default();
        config.speed.default = 2000.0;
        assert!(config.validate().is_err());

        let mut config = ArmConfig::default();
        config.speed.min = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error() {
        let err = ArmConfig::from_toml_str("initial_mode = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[speed]\nmin = 60.0\nmax = 800.0\ndefault = 100.0").unwrap();

        let config = ArmConfig::load(file.path()).unwrap();
        assert_eq!(config.speed.min, 60.0);
        assert_eq!(config.speed.max, 800.0);
        assert_eq!(config.speed.default, 100.0);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ArmConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_geometries_order() {
        let [x, y, z] = ArmConfig::default().geometries();
        assert!((x.steps_per_degree() - 4.89 / DEG_PER_STEP).abs() < 1e-3);
        assert!((y.steps_per_degree() - 6.0 / DEG_PER_STEP).abs() < 1e-3);
        assert!((z.steps_per_degree() - 4.2 / DEG_PER_STEP).abs() < 1e-3);
    }
}
