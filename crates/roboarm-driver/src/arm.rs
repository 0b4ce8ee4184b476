//! 关节命令处理器
//!
//! [`Arm`] 是唯一持有执行器句柄与 [`ArmState`] 的聚合体，所有操作都通过 `&mut self`
//! 访问，不存在全局状态。
//!
//! # 执行顺序
//!
//! 每个操作先检查守卫条件并校验全部参数，全部通过后才驱动执行器；
//! 失败时机械臂状态与执行器目标保持不变。
//!
//! # 运动推进
//!
//! `set_new_position` 只装载目标，步进电机的实际运动由外部循环高频调用
//! [`Arm::service`] 推进，每次每轴最多一步。

use crate::actuator::{GripperDriver, Servo, Stepper};
use crate::axis::{
    AngleRange, Axis, StepperAxis, StepperGeometry, servo_v_angle, servo_v_command,
    servo_w_angle, servo_w_command,
};
use crate::config::ArmConfig;
use crate::error::{ArmError, ConfigError};
use crate::mode::{ArmMode, ArmState};
use roboarm_protocol::JointAngles;
use spin_sleep::SpinSleeper;
use tracing::{debug, info, trace, warn};

/// 机械臂的全部执行器
///
/// 三个步进轴（x, y, z）、两个舵机轴（v, w）以及夹爪驱动。
#[derive(Debug, Clone)]
pub struct ArmHardware<S, V, G> {
    /// 按 x, y, z 顺序
    pub steppers: [S; 3],
    pub v: V,
    pub w: V,
    pub gripper: G,
}

impl<S, V, G> ArmHardware<S, V, G> {
    pub fn new(x: S, y: S, z: S, v: V, w: V, gripper: G) -> Self {
        Self {
            steppers: [x, y, z],
            v,
            w,
            gripper,
        }
    }

    pub fn stepper(&self, axis: StepperAxis) -> &S {
        &self.steppers[axis.index()]
    }

    pub fn stepper_mut(&mut self, axis: StepperAxis) -> &mut S {
        &mut self.steppers[axis.index()]
    }
}

/// 五轴机械臂
pub struct Arm<S, V, G> {
    config: ArmConfig,
    geometry: [StepperGeometry; 3],
    state: ArmState,
    hardware: ArmHardware<S, V, G>,
    sleeper: SpinSleeper,
}

impl<S, V, G> Arm<S, V, G>
where
    S: Stepper,
    V: Servo,
    G: GripperDriver,
{
    /// 校验配置并初始化电机
    ///
    /// 所有步进电机的位置计数器清零，最大速度设为 `speed.max`，
    /// 加速度设为 `speed.default`。
    pub fn new(config: ArmConfig, hardware: ArmHardware<S, V, G>) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut arm = Self {
            geometry: config.geometries(),
            state: ArmState::new(config.initial_mode),
            config,
            hardware,
            sleeper: SpinSleeper::default(),
        };
        arm.initialize_motors();
        Ok(arm)
    }

    fn initialize_motors(&mut self) {
        let speed = self.config.speed.clone();
        for stepper in &mut self.hardware.steppers {
            stepper.set_current_position(0);
            stepper.set_max_speed(speed.max);
            stepper.set_acceleration(speed.default);
        }

        for axis in StepperAxis::ALL {
            if self.geometry[axis.index()].range().is_unbounded() {
                warn!("Axis {} has no configured range limits", axis.axis());
            }
        }
        if self.config.servos.v.is_unbounded() {
            warn!("Axis v has no configured range limits");
        }
        if self.config.servos.w.is_unbounded() {
            warn!("Axis w has no configured range limits");
        }

        info!(
            "Arm initialized: mode={:?}, acceleration={}, max_speed={}",
            self.state.mode, speed.default, speed.max
        );
    }

    // ==================== 状态 ====================

    pub fn state(&self) -> ArmState {
        self.state
    }

    pub fn mode(&self) -> ArmMode {
        self.state.mode
    }

    /// 切换工作模式（不驱动任何轴）
    pub fn set_mode(&mut self, mode: ArmMode) {
        if self.state.mode != mode {
            info!("Arm mode: {:?} -> {:?}", self.state.mode, mode);
        }
        self.state.mode = mode;
    }

    pub fn is_calibrated(&self) -> bool {
        self.state.is_calibrated
    }

    pub fn set_calibration(&mut self, calibrated: bool) {
        if self.state.is_calibrated != calibrated {
            info!("Arm calibration flag set to {}", calibrated);
        }
        self.state.is_calibrated = calibrated;
    }

    /// 已标定时返回 `Ok`（不考虑模式）
    pub fn check_calibration(&self) -> Result<(), ArmError> {
        if self.state.is_calibrated {
            Ok(())
        } else {
            Err(ArmError::NotCalibrated)
        }
    }

    pub fn config(&self) -> &ArmConfig {
        &self.config
    }

    pub fn geometry(&self, axis: StepperAxis) -> &StepperGeometry {
        &self.geometry[axis.index()]
    }

    pub fn hardware(&self) -> &ArmHardware<S, V, G> {
        &self.hardware
    }

    pub fn hardware_mut(&mut self) -> &mut ArmHardware<S, V, G> {
        &mut self.hardware
    }

    fn ensure_position_known(&self) -> Result<(), ArmError> {
        if self.state.position_known() {
            Ok(())
        } else {
            Err(ArmError::NotCalibrated)
        }
    }

    fn ensure_idle(&self) -> Result<(), ArmError> {
        if self.is_in_move() {
            Err(ArmError::InMove)
        } else {
            Ok(())
        }
    }

    fn range_of(&self, axis: Axis) -> AngleRange {
        match axis {
            Axis::X => self.geometry[StepperAxis::X.index()].range(),
            Axis::Y => self.geometry[StepperAxis::Y.index()].range(),
            Axis::Z => self.geometry[StepperAxis::Z.index()].range(),
            Axis::V => self.config.servos.v,
            Axis::W => self.config.servos.w,
        }
    }

    // ==================== 运动 ====================

    /// 设置新的关节目标（非阻塞）
    ///
    /// 返回机构实际会到达的角度：步进轴为量化到整步后的角度，
    /// 舵机轴为四舍五入后的请求角度。调用方应以返回值作为新的参考角度。
    ///
    /// # 错误
    ///
    /// - `NotCalibrated`: 未标定且不在标定模式
    /// - `InvalidMoveRange`: 任一轴超出范围，或换算出的步数/舵机指令溢出（此时不驱动任何轴）
    pub fn set_new_position(&mut self, target: &JointAngles) -> Result<JointAngles, ArmError> {
        if let Err(err) = self.ensure_position_known() {
            debug!("set_new_position rejected: {}", err);
            return Err(err);
        }

        for axis in [Axis::X, Axis::Y, Axis::Z, Axis::V, Axis::W] {
            let angle = axis.angle_of(target);
            if !self.range_of(axis).contains(angle) {
                let err = ArmError::InvalidMoveRange { axis, angle };
                debug!("set_new_position rejected: {}", err);
                return Err(err);
            }
        }

        // 全部指令先算好，任何一轴溢出都不驱动执行器
        let out_of_range = |axis: Axis| {
            let err = ArmError::InvalidMoveRange {
                axis,
                angle: axis.angle_of(target),
            };
            debug!("set_new_position rejected: {} (command overflow)", err);
            err
        };
        let mut steps = [0i64; 3];
        for axis in StepperAxis::ALL {
            steps[axis.index()] = self.geometry[axis.index()]
                .target_steps(axis.axis().angle_of(target))
                .ok_or_else(|| out_of_range(axis.axis()))?;
        }
        let v_command = servo_v_command(target.v).ok_or_else(|| out_of_range(Axis::V))?;
        let w_command = servo_w_command(target.w).ok_or_else(|| out_of_range(Axis::W))?;

        let mut achieved = *target;
        for axis in StepperAxis::ALL {
            let steps = steps[axis.index()];
            self.hardware.steppers[axis.index()].move_to(steps);
            let angle = self.geometry[axis.index()].steps_to_angle(steps);
            axis.axis().set_angle(&mut achieved, angle);
        }

        self.hardware.v.write(v_command);
        self.hardware.w.write(w_command);
        achieved.v = target.v.round();
        achieved.w = target.w.round();

        debug!(
            "New target: x={:.4} y={:.4} z={:.4} v={} w={}",
            achieved.x, achieved.y, achieved.z, achieved.v, achieved.w
        );
        Ok(achieved)
    }

    /// 设置三个步进电机的加速度
    ///
    /// # 错误
    ///
    /// - `InMove`: 有轴在运动
    /// - `BeyondMaxSpeedLimit` / `SpeedTooSlow`: 超出速度窗口（NaN 视为过慢）
    pub fn set_speed(&mut self, speed: f32) -> Result<(), ArmError> {
        self.ensure_idle()?;

        let limits = &self.config.speed;
        if speed > limits.max {
            return Err(ArmError::BeyondMaxSpeedLimit {
                speed,
                max: limits.max,
            });
        }
        if !(speed >= limits.min) {
            return Err(ArmError::SpeedTooSlow {
                speed,
                min: limits.min,
            });
        }

        for stepper in &mut self.hardware.steppers {
            stepper.set_acceleration(speed);
        }
        debug!("Stepper acceleration set to {}", speed);
        Ok(())
    }

    /// 把当前位置定义为零位（不产生物理运动）
    ///
    /// 各步进轴的计数器被设为该轴配置的参考偏移（默认 0 步）。
    /// 不修改标定标志。
    pub fn set_current_position_as_reference(&mut self) -> Result<(), ArmError> {
        if !self.state.mode.is_calibration() {
            return Err(ArmError::NotInCalibrationMode);
        }
        self.ensure_idle()?;

        for axis in StepperAxis::ALL {
            let reference = self.geometry[axis.index()].reference_steps();
            self.hardware.steppers[axis.index()].set_current_position(reference);
        }
        info!("Current position set as reference");
        Ok(())
    }

    /// 读取当前关节角度
    pub fn get_current_position(&self) -> Result<JointAngles, ArmError> {
        self.ensure_position_known()?;

        let mut joints = JointAngles::default();
        for axis in StepperAxis::ALL {
            let steps = self.hardware.steppers[axis.index()].current_position();
            let angle = self.geometry[axis.index()].steps_to_angle(steps);
            axis.axis().set_angle(&mut joints, angle);
        }
        joints.v = servo_v_angle(self.hardware.v.read());
        joints.w = servo_w_angle(self.hardware.w.read());
        Ok(joints)
    }

    /// 是否有步进轴未到达目标
    pub fn is_in_move(&self) -> bool {
        self.hardware
            .steppers
            .iter()
            .any(|stepper| stepper.distance_to_go() != 0)
    }

    /// 推进一个调度节拍：每个未到达目标的步进轴前进一步
    ///
    /// 返回节拍结束后是否仍在运动。
    pub fn service(&mut self) -> bool {
        for stepper in &mut self.hardware.steppers {
            if stepper.distance_to_go() != 0 {
                stepper.run();
            }
        }
        self.is_in_move()
    }

    /// 反复调用 `service` 直到空闲或达到 `max_ticks`，返回实际节拍数
    pub fn service_until_idle(&mut self, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while ticks < max_ticks && self.is_in_move() {
            self.service();
            ticks += 1;
        }
        if self.is_in_move() {
            trace!("Arm still in move after {} ticks", ticks);
        }
        ticks
    }

    // ==================== 夹爪 ====================

    /// 张开夹爪（阻塞一个脉冲周期）
    pub fn open_gripper(&mut self) {
        let pwm = self.config.gripper.pwm;
        self.pulse_gripper(pwm, 0);
    }

    /// 闭合夹爪（阻塞一个脉冲周期）
    pub fn close_gripper(&mut self) {
        let pwm = self.config.gripper.pwm;
        self.pulse_gripper(0, pwm);
    }

    fn pulse_gripper(&mut self, b1: u8, b2: u8) {
        self.hardware.gripper.drive(b1, b2);
        self.sleeper.sleep(self.config.gripper.pulse());
        self.hardware.gripper.drive(0, 0);
    }
}
