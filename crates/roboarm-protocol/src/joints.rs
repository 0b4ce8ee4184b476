//! 关节角度载荷

/// 五个关节的角度（单位：度）
///
/// - `x`, `y`, `z`: 步进电机轴（经固定减速比映射到物理关节）
/// - `v`, `w`: 舵机轴（腕部姿态）
///
/// 同一类型既用于请求载荷（期望的绝对角度），也用于响应载荷
/// （实际可达角度或当前角度，取决于调用场景）。本层不做任何单位换算。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointAngles {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub v: f32,
    pub w: f32,
}

impl JointAngles {
    pub const fn new(x: f32, y: f32, z: f32, v: f32, w: f32) -> Self {
        Self { x, y, z, v, w }
    }

    /// 按线序 x, y, z, v, w 转为数组
    pub fn to_array(self) -> [f32; 5] {
        [self.x, self.y, self.z, self.v, self.w]
    }

    /// 从线序数组构建
    pub fn from_array(values: [f32; 5]) -> Self {
        let [x, y, z, v, w] = values;
        Self { x, y, z, v, w }
    }

    /// 逐位比较（区分 -0.0 与 0.0，NaN 与自身相等）
    pub fn bit_eq(&self, other: &Self) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl From<[f32; 5]> for JointAngles {
    fn from(values: [f32; 5]) -> Self {
        Self::from_array(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_order() {
        let joints = JointAngles::new(1.0, 2.0, 3.0, 4.0, 5.0);
        assert_eq!(joints.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(JointAngles::from_array(joints.to_array()), joints);
    }

    #[test]
    fn test_bit_eq() {
        let a = JointAngles::new(0.0, 1.0, 2.0, 3.0, 4.0);
        let b = JointAngles::new(-0.0, 1.0, 2.0, 3.0, 4.0);
        assert_eq!(a, b); // IEEE 比较认为 0.0 == -0.0
        assert!(!a.bit_eq(&b));
        assert!(a.bit_eq(&a));
    }

    #[test]
    fn test_default_is_zero() {
        assert_eq!(JointAngles::default().to_array(), [0.0; 5]);
    }
}
