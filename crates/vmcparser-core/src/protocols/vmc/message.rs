//! Decoded VMC records.
//!
//! String fields borrow from the decoded buffer. Fields that only newer
//! protocol revisions send are `Option`s: `None` means the sender's revision
//! does not carry the field, which is not the same as a zero value.

use serde::Serialize;

use super::layout;
use super::types::{
    CalibrationMode, CalibrationState, ControllerActive, Device, TrackingStatus, Vec3, Vec4,
};

/// Availability of the sending application (`/VMC/Ext/OK`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Available {
    pub loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration_state: Option<CalibrationState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration_mode: Option<CalibrationMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_status: Option<TrackingStatus>,
}

/// Sender time in seconds (`/VMC/Ext/T`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RelativeTime {
    pub time: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RootTransform<'a> {
    pub name: &'a str,
    pub position: Vec3,
    pub quaternion: Vec4,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<Vec3>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoneTransform<'a> {
    pub name: &'a str,
    pub position: Vec3,
    pub quaternion: Vec4,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlendShapeProxyValue<'a> {
    pub name: &'a str,
    pub value: f32,
}

/// Apply all blend shape values sent since the previous apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlendShapeProxyApply;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraTransform<'a> {
    pub name: &'a str,
    pub position: Vec3,
    pub quaternion: Vec4,
    pub fov: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControllerInput<'a> {
    pub active: ControllerActive,
    pub name: &'a str,
    pub is_left: bool,
    pub is_touch: bool,
    pub is_axis: bool,
    pub axis: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyboardInput<'a> {
    pub active: bool,
    pub name: &'a str,
    pub key_code: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MidiNoteInput {
    pub active: bool,
    pub channel: i32,
    pub note: i32,
    pub velocity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MidiCcValueInput {
    pub knob: i32,
    pub value: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MidiCcButtonInput {
    pub knob: i32,
    pub active: bool,
}

/// Pose of a tracked device.
///
/// `local` selects the device's raw scale instead of the avatar scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeviceTransform<'a> {
    pub device: Device,
    pub local: bool,
    pub serial: &'a str,
    pub position: Vec3,
    pub quaternion: Vec4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReceiveEnable<'a> {
    pub enable: bool,
    pub port: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DirectionalLight<'a> {
    pub name: &'a str,
    pub position: Vec3,
    pub quaternion: Vec4,
    pub color: Vec4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocalVrm<'a> {
    pub path: &'a str,
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RemoteVrm<'a> {
    pub service: &'a str,
    pub json: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionString<'a> {
    pub option: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BackgroundColor {
    pub color: Vec4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowAttribute {
    pub is_top_most: bool,
    pub is_transparent: bool,
    pub window_click_through: bool,
    pub hide_border: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadedSettingPath<'a> {
    pub path: &'a str,
}

/// Any decoded VMC message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum VmcMessage<'a> {
    Available(Available),
    RelativeTime(RelativeTime),
    RootTransform(RootTransform<'a>),
    BoneTransform(BoneTransform<'a>),
    BlendShapeProxyValue(BlendShapeProxyValue<'a>),
    BlendShapeProxyApply(BlendShapeProxyApply),
    CameraTransform(CameraTransform<'a>),
    ControllerInput(ControllerInput<'a>),
    KeyboardInput(KeyboardInput<'a>),
    MidiNoteInput(MidiNoteInput),
    MidiCcValueInput(MidiCcValueInput),
    MidiCcButtonInput(MidiCcButtonInput),
    DeviceTransform(DeviceTransform<'a>),
    ReceiveEnable(ReceiveEnable<'a>),
    DirectionalLight(DirectionalLight<'a>),
    LocalVrm(LocalVrm<'a>),
    RemoteVrm(RemoteVrm<'a>),
    OptionString(OptionString<'a>),
    BackgroundColor(BackgroundColor),
    WindowAttribute(WindowAttribute),
    LoadedSettingPath(LoadedSettingPath<'a>),
}

impl VmcMessage<'_> {
    /// The OSC address this message is sent on.
    pub fn address(&self) -> &'static str {
        match self {
            Self::Available(_) => layout::ADDRESS_AVAILABLE,
            Self::RelativeTime(_) => layout::ADDRESS_RELATIVE_TIME,
            Self::RootTransform(_) => layout::ADDRESS_ROOT_TRANSFORM,
            Self::BoneTransform(_) => layout::ADDRESS_BONE_TRANSFORM,
            Self::BlendShapeProxyValue(_) => layout::ADDRESS_BLEND_SHAPE_PROXY_VALUE,
            Self::BlendShapeProxyApply(_) => layout::ADDRESS_BLEND_SHAPE_PROXY_APPLY,
            Self::CameraTransform(_) => layout::ADDRESS_CAMERA_TRANSFORM,
            Self::ControllerInput(_) => layout::ADDRESS_CONTROLLER_INPUT,
            Self::KeyboardInput(_) => layout::ADDRESS_KEYBOARD_INPUT,
            Self::MidiNoteInput(_) => layout::ADDRESS_MIDI_NOTE_INPUT,
            Self::MidiCcValueInput(_) => layout::ADDRESS_MIDI_CC_VALUE_INPUT,
            Self::MidiCcButtonInput(_) => layout::ADDRESS_MIDI_CC_BUTTON_INPUT,
            Self::DeviceTransform(transform) => device_address(transform.device, transform.local),
            Self::ReceiveEnable(_) => layout::ADDRESS_RECEIVE_ENABLE,
            Self::DirectionalLight(_) => layout::ADDRESS_DIRECTIONAL_LIGHT,
            Self::LocalVrm(_) => layout::ADDRESS_LOCAL_VRM,
            Self::RemoteVrm(_) => layout::ADDRESS_REMOTE_VRM,
            Self::OptionString(_) => layout::ADDRESS_OPTION_STRING,
            Self::BackgroundColor(_) => layout::ADDRESS_BACKGROUND_COLOR,
            Self::WindowAttribute(_) => layout::ADDRESS_WINDOW_ATTRIBUTE,
            Self::LoadedSettingPath(_) => layout::ADDRESS_LOADED_SETTING_PATH,
        }
    }

    /// Stable record kind name, identical to the serialized `kind` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Available(_) => "Available",
            Self::RelativeTime(_) => "RelativeTime",
            Self::RootTransform(_) => "RootTransform",
            Self::BoneTransform(_) => "BoneTransform",
            Self::BlendShapeProxyValue(_) => "BlendShapeProxyValue",
            Self::BlendShapeProxyApply(_) => "BlendShapeProxyApply",
            Self::CameraTransform(_) => "CameraTransform",
            Self::ControllerInput(_) => "ControllerInput",
            Self::KeyboardInput(_) => "KeyboardInput",
            Self::MidiNoteInput(_) => "MidiNoteInput",
            Self::MidiCcValueInput(_) => "MidiCcValueInput",
            Self::MidiCcButtonInput(_) => "MidiCcButtonInput",
            Self::DeviceTransform(_) => "DeviceTransform",
            Self::ReceiveEnable(_) => "ReceiveEnable",
            Self::DirectionalLight(_) => "DirectionalLight",
            Self::LocalVrm(_) => "LocalVrm",
            Self::RemoteVrm(_) => "RemoteVrm",
            Self::OptionString(_) => "OptionString",
            Self::BackgroundColor(_) => "BackgroundColor",
            Self::WindowAttribute(_) => "WindowAttribute",
            Self::LoadedSettingPath(_) => "LoadedSettingPath",
        }
    }
}

pub(crate) fn device_address(device: Device, local: bool) -> &'static str {
    match (device, local) {
        (Device::Hmd, false) => layout::ADDRESS_DEVICE_TRANSFORM_HMD,
        (Device::Con, false) => layout::ADDRESS_DEVICE_TRANSFORM_CON,
        (Device::Tra, false) => layout::ADDRESS_DEVICE_TRANSFORM_TRA,
        (Device::Hmd, true) => layout::ADDRESS_DEVICE_TRANSFORM_HMD_LOCAL,
        (Device::Con, true) => layout::ADDRESS_DEVICE_TRANSFORM_CON_LOCAL,
        (Device::Tra, true) => layout::ADDRESS_DEVICE_TRANSFORM_TRA_LOCAL,
    }
}
