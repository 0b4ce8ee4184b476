//! 轴定义与单位换算
//!
//! - 步进轴：角度 ↔ 步数（经减速比），四舍五入到整步
//! - 舵机轴：关节角度 ↔ 舵机指令（固定机械偏置）

use roboarm_protocol::JointAngles;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 舵机 w 的最小指令值（机械限位）
pub const W_SERVO_MIN_COMMAND: i32 = 5;

/// 舵机零位对应的指令值
pub const SERVO_CENTER_COMMAND: i32 = 90;

/// 步进目标的最大绝对步数，超出即视为越界
pub const MAX_TARGET_STEPS: i64 = i32::MAX as i64;

/// 机械臂的自由度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    V,
    W,
}

impl Axis {
    /// 从关节角度中取出本轴的值
    pub fn angle_of(self, joints: &JointAngles) -> f32 {
        match self {
            Axis::X => joints.x,
            Axis::Y => joints.y,
            Axis::Z => joints.z,
            Axis::V => joints.v,
            Axis::W => joints.w,
        }
    }

    /// 写入本轴的值
    pub fn set_angle(self, joints: &mut JointAngles, angle: f32) {
        match self {
            Axis::X => joints.x = angle,
            Axis::Y => joints.y = angle,
            Axis::Z => joints.z = angle,
            Axis::V => joints.v = angle,
            Axis::W => joints.w = angle,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
            Axis::V => "v",
            Axis::W => "w",
        };
        f.write_str(name)
    }
}

/// 步进电机驱动的轴
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepperAxis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl StepperAxis {
    pub const ALL: [StepperAxis; 3] = [StepperAxis::X, StepperAxis::Y, StepperAxis::Z];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn axis(self) -> Axis {
        match self {
            StepperAxis::X => Axis::X,
            StepperAxis::Y => Axis::Y,
            StepperAxis::Z => Axis::Z,
        }
    }
}

/// 角度范围（度），任一端可为开放
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AngleRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_deg: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_deg: Option<f32>,
}

impl AngleRange {
    pub const UNBOUNDED: AngleRange = AngleRange {
        min_deg: None,
        max_deg: None,
    };

    pub const fn bounded(min_deg: f32, max_deg: f32) -> Self {
        Self {
            min_deg: Some(min_deg),
            max_deg: Some(max_deg),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min_deg.is_none() && self.max_deg.is_none()
    }

    /// 检查角度是否允许
    ///
    /// 非有限值（NaN、无穷大）在任何轴上都不允许。
    pub fn contains(&self, angle: f32) -> bool {
        angle.is_finite()
            && self.min_deg.is_none_or(|min| angle >= min)
            && self.max_deg.is_none_or(|max| angle <= max)
    }
}

/// 步进轴几何参数（由减速比推导，进程生命周期内不变）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepperGeometry {
    steps_per_degree: f32,
    degrees_per_step: f32,
    range: AngleRange,
    reference_steps: i64,
}

impl StepperGeometry {
    /// # 参数
    ///
    /// - `deg_per_step`: 电机本身的步距角（每微步的度数）
    /// - `gear_ratio`: 电机轴转角与关节转角之比
    /// - `range`: 关节允许范围
    /// - `reference_offset_deg`: 标定时零位对应的关节角度
    pub fn new(
        deg_per_step: f32,
        gear_ratio: f32,
        range: AngleRange,
        reference_offset_deg: f32,
    ) -> Self {
        let steps_per_degree = gear_ratio / deg_per_step;
        let degrees_per_step = deg_per_step / gear_ratio;
        Self {
            steps_per_degree,
            degrees_per_step,
            range,
            reference_steps: (reference_offset_deg * steps_per_degree).round() as i64,
        }
    }

    pub fn steps_per_degree(&self) -> f32 {
        self.steps_per_degree
    }

    pub fn degrees_per_step(&self) -> f32 {
        self.degrees_per_step
    }

    pub fn range(&self) -> AngleRange {
        self.range
    }

    /// 标定时写入步数计数器的值
    pub fn reference_steps(&self) -> i64 {
        self.reference_steps
    }

    /// 角度 → 绝对步数（四舍五入，远离零）
    pub fn angle_to_steps(&self, angle_deg: f32) -> i64 {
        (angle_deg * self.steps_per_degree).round() as i64
    }

    /// 角度 → 可装载的目标步数，超出 `MAX_TARGET_STEPS` 返回 `None`
    pub fn target_steps(&self, angle_deg: f32) -> Option<i64> {
        let steps = self.angle_to_steps(angle_deg);
        (-MAX_TARGET_STEPS..=MAX_TARGET_STEPS)
            .contains(&steps)
            .then_some(steps)
    }

    /// 绝对步数 → 角度
    pub fn steps_to_angle(&self, steps: i64) -> f32 {
        steps as f32 * self.degrees_per_step
    }

    /// 量化后机构实际能到达的角度
    pub fn quantize(&self, angle_deg: f32) -> f32 {
        self.steps_to_angle(self.angle_to_steps(angle_deg))
    }
}

fn round_to_i32(deg: f32) -> Option<i32> {
    let rounded = deg.round();
    (rounded >= i32::MIN as f32 && rounded < i32::MAX as f32).then_some(rounded as i32)
}

/// 关节角度 v → 舵机指令（绝对值），指令超出 `i32` 时返回 `None`
pub fn servo_v_command(v_deg: f32) -> Option<i32> {
    round_to_i32(v_deg)?.checked_add(SERVO_CENTER_COMMAND)
}

/// 关节角度 w → 舵机指令（反向安装，下限为 `W_SERVO_MIN_COMMAND`）
pub fn servo_w_command(w_deg: f32) -> Option<i32> {
    let command = SERVO_CENTER_COMMAND.checked_sub(round_to_i32(w_deg)?)?;
    Some(command.max(W_SERVO_MIN_COMMAND))
}

/// 舵机 v 读数 → 关节角度
pub fn servo_v_angle(command: i32) -> f32 {
    (command - SERVO_CENTER_COMMAND) as f32
}

/// 舵机 w 读数 → 关节角度
pub fn servo_w_angle(command: i32) -> f32 {
    (SERVO_CENTER_COMMAND - command) as f32
}
