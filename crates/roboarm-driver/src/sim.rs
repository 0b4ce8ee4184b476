//! 软件模拟执行器
//!
//! 用于测试和 CLI，无硬件依赖。可观察行为与真实执行器一致，
//! 另外记录调用次数，便于断言"未产生任何执行器调用"。

use crate::actuator::{GripperDriver, Servo, Stepper};
use crate::arm::{Arm, ArmHardware};
use crate::config::ArmConfig;
use crate::error::ConfigError;

/// 舵机指令范围
pub const SERVO_MIN_ANGLE: i32 = 0;
pub const SERVO_MAX_ANGLE: i32 = 180;

/// 模拟步进电机
///
/// 每次 `run()` 朝目标前进恰好一步（不模拟加减速时序）。
/// `set_acceleration` 的值只被记录，可通过 `acceleration()` 读回，
/// 不影响模拟的运动节奏。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimStepper {
    position: i64,
    target: i64,
    /// 只记录，不参与步进时序
    acceleration: f32,
    max_speed: f32,
    /// `move_to` 调用次数
    pub move_calls: usize,
    /// 累计走过的步数
    pub steps_taken: u64,
}

impl SimStepper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target_position(&self) -> i64 {
        self.target
    }
}

impl Stepper for SimStepper {
    fn move_to(&mut self, absolute: i64) {
        self.move_calls += 1;
        self.target = absolute;
    }

    fn run(&mut self) -> bool {
        let distance = self.target.saturating_sub(self.position);
        if distance == 0 {
            return false;
        }
        self.position += distance.signum();
        self.steps_taken += 1;
        self.position != self.target
    }

    fn distance_to_go(&self) -> i64 {
        self.target.saturating_sub(self.position)
    }

    fn current_position(&self) -> i64 {
        self.position
    }

    fn set_current_position(&mut self, position: i64) {
        self.position = position;
        self.target = position;
    }

    fn set_acceleration(&mut self, acceleration: f32) {
        self.acceleration = acceleration;
    }

    fn acceleration(&self) -> f32 {
        self.acceleration
    }

    fn set_max_speed(&mut self, speed: f32) {
        self.max_speed = speed;
    }

    fn max_speed(&self) -> f32 {
        self.max_speed
    }
}

/// 模拟舵机
///
/// 写入值被限制在 0-180，所有写入按顺序记录。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimServo {
    angle: i32,
    pub writes: Vec<i32>,
}

impl SimServo {
    pub fn new() -> Self {
        Self::default()
    }

    /// 最近一次写入的原始（未限幅）指令
    pub fn last_command(&self) -> Option<i32> {
        self.writes.last().copied()
    }
}

impl Servo for SimServo {
    fn write(&mut self, angle: i32) {
        self.writes.push(angle);
        self.angle = angle.clamp(SERVO_MIN_ANGLE, SERVO_MAX_ANGLE);
    }

    fn read(&self) -> i32 {
        self.angle
    }
}

/// 模拟夹爪驱动，记录每次 `drive` 调用
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimGripper {
    pub pulses: Vec<(u8, u8)>,
}

impl SimGripper {
    pub fn new() -> Self {
        Self::default()
    }

    /// 两条驱动线是否都已断电
    pub fn is_idle(&self) -> bool {
        self.pulses.last().is_none_or(|&(b1, b2)| b1 == 0 && b2 == 0)
    }
}

impl GripperDriver for SimGripper {
    fn drive(&mut self, b1: u8, b2: u8) {
        self.pulses.push((b1, b2));
    }
}

/// 全部由模拟执行器组成的机械臂
pub type SimArm = Arm<SimStepper, SimServo, SimGripper>;

impl ArmHardware<SimStepper, SimServo, SimGripper> {
    pub fn simulated() -> Self {
        ArmHardware::new(
            SimStepper::new(),
            SimStepper::new(),
            SimStepper::new(),
            SimServo::new(),
            SimServo::new(),
            SimGripper::new(),
        )
    }
}

/// 用给定配置构建模拟机械臂
pub fn simulated_arm(config: ArmConfig) -> Result<SimArm, ConfigError> {
    Arm::new(config, ArmHardware::simulated())
}
