use std::f64::consts::FRAC_PI_2;

/// Minimum pose vector length carrying a quaternion at indices 3..=6.
pub const MIN_POSE_LEN: usize = 7;

/// Unit orientation quaternion `(w, x, y, z)`.
///
/// Unit norm is assumed, not validated — the device produces normalized
/// quaternions and the conversion clamps where drift would matter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Derived orientation in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerAngles {
    /// Rotation about the vertical (Z) axis.
    pub yaw_deg: f64,
    /// Rotation about the lateral (Y) axis.
    pub pitch_deg: f64,
    /// Rotation about the forward (X) axis.
    pub roll_deg: f64,
}

impl Quaternion {
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// The identity rotation.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    /// Extract the quaternion from a headset pose vector.
    ///
    /// The SDK lays the pose out as `[x, y, z, qx, qy, qz, qw, ...]`;
    /// returns `None` if the vector is too short to carry indices 3..=6.
    pub fn from_pose_vector(pose: &[f64]) -> Option<Self> {
        if pose.len() < MIN_POSE_LEN {
            return None;
        }
        Some(Self {
            x: pose[3],
            y: pose[4],
            z: pose[5],
            w: pose[6],
        })
    }

    /// Convert to yaw/pitch/roll in degrees.
    ///
    /// Standard closed-form conversion. The pitch term is clamped to
    /// ±π/2 (sign-preserving) when numerical drift pushes `2(wy - zx)`
    /// outside `asin`'s domain near a ±90° pitch.
    pub fn to_euler(&self) -> EulerAngles {
        let Self { w, x, y, z } = *self;

        let siny_cosp = 2.0 * (w * z + x * y);
        let cosy_cosp = 1.0 - 2.0 * (y * y + z * z);
        let yaw = siny_cosp.atan2(cosy_cosp);

        let sinp = 2.0 * (w * y - z * x);
        let pitch = if sinp.abs() >= 1.0 {
            FRAC_PI_2.copysign(sinp)
        } else {
            sinp.asin()
        };

        let sinr_cosp = 2.0 * (w * x + y * z);
        let cosr_cosp = 1.0 - 2.0 * (x * x + y * y);
        let roll = sinr_cosp.atan2(cosr_cosp);

        EulerAngles {
            yaw_deg: yaw.to_degrees(),
            pitch_deg: pitch.to_degrees(),
            roll_deg: roll.to_degrees(),
        }
    }
}
