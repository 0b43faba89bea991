use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

/// A 3-dimensional coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// A 4-dimensional coordinate, used for rotations and RGBA colours.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Vec4 {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

/// An integer-coded enumeration carried in a VMC payload.
///
/// Raw values outside the known range are rejected by the decoder, never
/// clamped.
pub trait VmcEnum: Sized + Copy {
    /// Field name reported in `InvalidEnumValue`.
    const FIELD: &'static str;

    fn from_raw(raw: i32) -> Option<Self>;

    fn name(self) -> &'static str;
}

/// Human-readable name for a raw enum value, `Unknown(<raw>)` when out of range.
///
/// # Examples
/// ```
/// use vmcparser_core::vmc::{CalibrationState, enum_name};
///
/// assert_eq!(enum_name::<CalibrationState>(3), "Calibrated");
/// assert_eq!(enum_name::<CalibrationState>(9), "Unknown(9)");
/// ```
pub fn enum_name<E: VmcEnum>(raw: i32) -> Cow<'static, str> {
    match E::from_raw(raw) {
        Some(value) => Cow::Borrowed(value.name()),
        None => Cow::Owned(format!("Unknown({raw})")),
    }
}

macro_rules! vmc_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal { $($variant:ident = $raw:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum $name {
            $($variant),+
        }

        impl VmcEnum for $name {
            const FIELD: &'static str = $field;

            fn from_raw(raw: i32) -> Option<Self> {
                match raw {
                    $($raw => Some(Self::$variant),)+
                    _ => None,
                }
            }

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

vmc_enum! {
    /// Calibration progress of the sending avatar.
    CalibrationState, "calibration state" {
        Uncalibrated = 0,
        WaitingForCalibration = 1,
        Calibrating = 2,
        Calibrated = 3,
    }
}

vmc_enum! {
    CalibrationMode, "calibration mode" {
        Normal = 0,
        MrNormal = 1,
        MrFloorFix = 2,
    }
}

vmc_enum! {
    /// Controller button state.
    ControllerActive, "active (controller)" {
        Release = 0,
        Press = 1,
        ChangeAxis = 2,
    }
}

vmc_enum! {
    TrackingStatus, "tracking status" {
        Bad = 0,
        Ok = 1,
    }
}

/// Tracked device class of a device transform.
///
/// Taken from the message address, never from the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Device {
    Hmd,
    Con,
    Tra,
}

impl Device {
    pub fn name(self) -> &'static str {
        match self {
            Self::Hmd => "Hmd",
            Self::Con => "Con",
            Self::Tra => "Tra",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
