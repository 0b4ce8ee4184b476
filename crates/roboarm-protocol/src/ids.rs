//! 动作 ID 与结果码定义
//!
//! 主机 → 设备方向的请求以动作 ID 开头，设备 → 主机方向的响应以结果码开头。

use crate::ProtocolError;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// 动作 ID（请求帧第 0 字节）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ActionId {
    /// 设置新的关节目标位置
    SetNewPosition = 1,
    /// 设置步进电机加速度
    SetSpeed = 2,
    /// 查询当前关节位置
    GetCurrentPosition = 3,
    /// 查询是否已标定
    CheckCalibration = 4,
    /// 进入标定模式
    StartCalibration = 5,
    /// 完成标定（当前位置设为零位）
    FinishCalibration = 6,
    /// 放弃标定
    AbortCalibration = 7,
    /// 查询是否空闲
    CheckIdle = 8,
    /// 张开夹爪
    OpenGripper = 9,
    /// 闭合夹爪
    CloseGripper = 10,
}

impl ActionId {
    /// 所有动作 ID，按数值升序
    pub const ALL: [ActionId; 10] = [
        ActionId::SetNewPosition,
        ActionId::SetSpeed,
        ActionId::GetCurrentPosition,
        ActionId::CheckCalibration,
        ActionId::StartCalibration,
        ActionId::FinishCalibration,
        ActionId::AbortCalibration,
        ActionId::CheckIdle,
        ActionId::OpenGripper,
        ActionId::CloseGripper,
    ];

    /// 转换为 u8
    pub fn as_u8(self) -> u8 {
        self.into()
    }

    /// 请求帧是否携带关节角度载荷
    pub fn carries_joints(self) -> bool {
        self == ActionId::SetNewPosition
    }
}

/// 从原始字节解析动作 ID
pub fn parse_action_id(value: u8) -> Result<ActionId, ProtocolError> {
    ActionId::try_from(value).map_err(|_| ProtocolError::UnknownAction(value))
}

/// 结果码（响应帧第 0 字节）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ResultCode {
    Ok = 1,
    InvalidNumberOfParameters = 10,
    UnknownAction = 11,
    ArmNotCalibrated = 12,
    BeyondMaxSpeedLimit = 13,
    SpeedTooSlow = 14,
    ArmInMove = 15,
    ArmNotInCalibrationMode = 16,
    ArmInvalidMoveRange = 17,
}

impl ResultCode {
    /// 转换为 u8
    pub fn as_u8(self) -> u8 {
        self.into()
    }

    pub fn is_ok(self) -> bool {
        self == ResultCode::Ok
    }
}

/// 从原始字节解析结果码
pub fn parse_result_code(value: u8) -> Result<ResultCode, ProtocolError> {
    ResultCode::try_from(value).map_err(|_| ProtocolError::UnknownResultCode(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_id_values() {
        assert_eq!(ActionId::SetNewPosition.as_u8(), 1);
        assert_eq!(ActionId::SetSpeed.as_u8(), 2);
        assert_eq!(ActionId::GetCurrentPosition.as_u8(), 3);
        assert_eq!(ActionId::CheckCalibration.as_u8(), 4);
        assert_eq!(ActionId::StartCalibration.as_u8(), 5);
        assert_eq!(ActionId::FinishCalibration.as_u8(), 6);
        assert_eq!(ActionId::AbortCalibration.as_u8(), 7);
        assert_eq!(ActionId::CheckIdle.as_u8(), 8);
        assert_eq!(ActionId::OpenGripper.as_u8(), 9);
        assert_eq!(ActionId::CloseGripper.as_u8(), 10);
    }

    #[test]
    fn test_action_id_all_is_complete() {
        for (i, action) in ActionId::ALL.iter().enumerate() {
            assert_eq!(action.as_u8() as usize, i + 1);
            assert_eq!(parse_action_id(action.as_u8()), Ok(*action));
        }
    }

    #[test]
    fn test_parse_unknown_action() {
        assert_eq!(parse_action_id(0), Err(ProtocolError::UnknownAction(0)));
        assert_eq!(parse_action_id(11), Err(ProtocolError::UnknownAction(11)));
        assert_eq!(
            parse_action_id(0xFF),
            Err(ProtocolError::UnknownAction(0xFF))
        );
    }

    #[test]
    fn test_result_code_values() {
        assert_eq!(ResultCode::Ok.as_u8(), 1);
        assert_eq!(ResultCode::InvalidNumberOfParameters.as_u8(), 10);
        assert_eq!(ResultCode::UnknownAction.as_u8(), 11);
        assert_eq!(ResultCode::ArmNotCalibrated.as_u8(), 12);
        assert_eq!(ResultCode::BeyondMaxSpeedLimit.as_u8(), 13);
        assert_eq!(ResultCode::SpeedTooSlow.as_u8(), 14);
        assert_eq!(ResultCode::ArmInMove.as_u8(), 15);
        assert_eq!(ResultCode::ArmNotInCalibrationMode.as_u8(), 16);
        assert_eq!(ResultCode::ArmInvalidMoveRange.as_u8(), 17);
    }

    #[test]
    fn test_parse_result_code() {
        assert_eq!(parse_result_code(1), Ok(ResultCode::Ok));
        assert_eq!(parse_result_code(17), Ok(ResultCode::ArmInvalidMoveRange));
        // 2..=9 为保留值
        assert_eq!(parse_result_code(2), Err(ProtocolError::UnknownResultCode(2)));
        assert_eq!(
            parse_result_code(18),
            Err(ProtocolError::UnknownResultCode(18))
        );
    }

    #[test]
    fn test_carries_joints() {
        assert!(ActionId::SetNewPosition.carries_joints());
        assert!(!ActionId::GetCurrentPosition.carries_joints());
        assert!(!ActionId::SetSpeed.carries_joints());
    }
}
