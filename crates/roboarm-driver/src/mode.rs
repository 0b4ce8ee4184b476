//! 机械臂工作模式与状态
//!
//! 两种模式：标定（Calibration）与正常（Normal）。模式切换不带任何副作用，
//! 只改变后续调用所受的守卫条件。

use serde::{Deserialize, Serialize};

/// 机械臂工作模式
///
/// # 模式说明
///
/// - **Calibration**: 标定模式，放宽位置守卫，允许重新定义零位
/// - **Normal**: 正常模式，位置相关操作要求已标定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmMode {
    Calibration,

    #[default]
    Normal,
}

impl ArmMode {
    /// 是否为标定模式
    pub fn is_calibration(self) -> bool {
        self == Self::Calibration
    }

    /// 是否为正常模式
    pub fn is_normal(self) -> bool {
        self == Self::Normal
    }
}

/// 机械臂状态
///
/// 仅由 [`Arm`](crate::Arm) 持有，只能通过 `set_mode` 与 `set_calibration` 修改。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArmState {
    pub mode: ArmMode,
    pub is_calibrated: bool,
}

impl ArmState {
    pub fn new(mode: ArmMode) -> Self {
        Self {
            mode,
            is_calibrated: false,
        }
    }

    /// 绝对位置是否可信
    ///
    /// 已标定，或处于标定模式（此时位置守卫放宽）。
    pub fn position_known(&self) -> bool {
        self.is_calibrated || self.mode.is_calibration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_predicates() {
        assert!(ArmMode::Calibration.is_calibration());
        assert!(!ArmMode::Calibration.is_normal());
        assert!(ArmMode::Normal.is_normal());
        assert_eq!(ArmMode::default(), ArmMode::Normal);
    }

    #[test]
    fn test_position_known() {
        let mut state = ArmState::new(ArmMode::Normal);
        assert!(!state.is_calibrated);
        assert!(!state.position_known());

        state.mode = ArmMode::Calibration;
        assert!(state.position_known());

        state.mode = ArmMode::Normal;
        state.is_calibrated = true;
        assert!(state.position_known());
    }
}
