//! 执行器抽象
//!
//! 底层电机控制（加减速曲线、PWM 生成、步进脉冲时序）由外部实现提供，
//! 本模块只定义处理器需要的最小接口。软件实现见 [`sim`](crate::sim)。

/// 步进电机
///
/// 语义与常见的加减速步进库一致：`move_to` 只设置目标，
/// 实际运动由反复调用 `run()` 推进。
pub trait Stepper {
    /// 设置绝对目标位置（步）
    fn move_to(&mut self, absolute: i64);

    /// 设置相对于当前位置的目标（步）
    fn move_by(&mut self, relative: i64) {
        let target = self.current_position() + relative;
        self.move_to(target);
    }

    /// 朝目标推进（非阻塞），返回是否仍未到达
    fn run(&mut self) -> bool;

    /// 剩余步数（目标 - 当前）
    fn distance_to_go(&self) -> i64;

    fn is_running(&self) -> bool {
        self.distance_to_go() != 0
    }

    /// 当前绝对位置（步）
    fn current_position(&self) -> i64;

    /// 重设当前位置计数器，不产生物理运动（目标同时被重设）
    fn set_current_position(&mut self, position: i64);

    fn set_acceleration(&mut self, acceleration: f32);

    fn acceleration(&self) -> f32;

    fn set_max_speed(&mut self, speed: f32);

    fn max_speed(&self) -> f32;
}

/// 舵机
pub trait Servo {
    /// 写入绝对角度指令（舵机坐标，0-180 度）
    fn write(&mut self, angle: i32);

    /// 读回最近一次的角度指令
    fn read(&self) -> i32;
}

/// 夹爪直流电机的 H 桥驱动
pub trait GripperDriver {
    /// 设置两条驱动线的 PWM 占空比（0 表示断电）
    fn drive(&mut self, b1: u8, b2: u8);
}
