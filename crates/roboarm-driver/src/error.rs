//! 驱动层错误类型定义

use crate::axis::Axis;
use roboarm_protocol::ResultCode;
use thiserror::Error;

/// 关节命令处理错误
///
/// 每个变体都不会修改机械臂状态：校验总是先于执行。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArmError {
    /// 未标定且不在标定模式
    #[error("Arm is not calibrated")]
    NotCalibrated,

    /// 操作要求处于标定模式
    #[error("Arm is not in calibration mode")]
    NotInCalibrationMode,

    /// 仍有步进轴在运动
    #[error("Arm is in move")]
    InMove,

    /// 目标角度超出该轴允许范围（或不是有限值）
    #[error("Angle {angle} is out of range for axis {axis}")]
    InvalidMoveRange { axis: Axis, angle: f32 },

    #[error("Speed {speed} is beyond max speed limit {max}")]
    BeyondMaxSpeedLimit { speed: f32, max: f32 },

    #[error("Speed {speed} is below min speed limit {min}")]
    SpeedTooSlow { speed: f32, min: f32 },
}

impl ArmError {
    /// 映射为回传给主机的结果码
    pub fn result_code(&self) -> ResultCode {
        match self {
            ArmError::NotCalibrated => ResultCode::ArmNotCalibrated,
            ArmError::NotInCalibrationMode => ResultCode::ArmNotInCalibrationMode,
            ArmError::InMove => ResultCode::ArmInMove,
            ArmError::InvalidMoveRange { .. } => ResultCode::ArmInvalidMoveRange,
            ArmError::BeyondMaxSpeedLimit { .. } => ResultCode::BeyondMaxSpeedLimit,
            ArmError::SpeedTooSlow { .. } => ResultCode::SpeedTooSlow,
        }
    }
}

impl From<ArmError> for ResultCode {
    fn from(err: ArmError) -> Self {
        err.result_code()
    }
}

/// 配置加载/校验错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
