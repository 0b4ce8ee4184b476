//! 关节命令处理器
//!
//! 本模块提供五轴机械臂（x/y/z 步进轴、v/w 舵机轴、直流电机夹爪）的设备端逻辑：
//! - 标定/正常两种工作模式的状态机
//! - 关节角度 → 执行器指令的换算（整步量化、舵机机械偏置）
//! - 逐轴范围与速度窗口校验
//! - 请求帧分发
//!
//! # 使用场景
//!
//! 外部轮询循环交替调用 [`dispatch::handle_frame`] 处理串口帧，
//! 以及 [`Arm::service`] 推进步进电机运动。
//!
//! ```
//! use roboarm_driver::{ArmConfig, ArmMode, dispatch, sim::simulated_arm};
//! use roboarm_protocol::{ActionId, ResultCode};
//!
//! let mut arm = simulated_arm(ArmConfig::default()).unwrap();
//! let response = dispatch::execute(&mut arm, &[ActionId::StartCalibration.as_u8()]);
//! assert_eq!(response.code(), ResultCode::Ok);
//! assert_eq!(arm.mode(), ArmMode::Calibration);
//! ```

pub mod actuator;
mod arm;
pub mod axis;
pub mod config;
pub mod dispatch;
mod error;
pub mod mode;
pub mod sim;

pub use actuator::{GripperDriver, Servo, Stepper};
pub use arm::{Arm, ArmHardware};
pub use axis::{AngleRange, Axis, StepperAxis, StepperGeometry};
pub use config::ArmConfig;
pub use error::{ArmError, ConfigError};
pub use mode::{ArmMode, ArmState};
