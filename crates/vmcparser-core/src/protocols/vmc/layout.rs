//! VMC addresses and the type tag signatures each one accepts.
//!
//! Signatures with several entries list successive protocol revisions, each
//! appending optional trailing fields to the previous one.

pub const ADDRESS_AVAILABLE: &str = "/VMC/Ext/OK";
pub const ADDRESS_RELATIVE_TIME: &str = "/VMC/Ext/T";
pub const ADDRESS_ROOT_TRANSFORM: &str = "/VMC/Ext/Root/Pos";
pub const ADDRESS_BONE_TRANSFORM: &str = "/VMC/Ext/Bone/Pos";
pub const ADDRESS_BLEND_SHAPE_PROXY_VALUE: &str = "/VMC/Ext/Blend/Val";
pub const ADDRESS_BLEND_SHAPE_PROXY_APPLY: &str = "/VMC/Ext/Blend/Apply";
pub const ADDRESS_CAMERA_TRANSFORM: &str = "/VMC/Ext/Cam";
pub const ADDRESS_CONTROLLER_INPUT: &str = "/VMC/Ext/Con";
pub const ADDRESS_KEYBOARD_INPUT: &str = "/VMC/Ext/Key";
pub const ADDRESS_MIDI_NOTE_INPUT: &str = "/VMC/Ext/Midi/Note";
pub const ADDRESS_MIDI_CC_VALUE_INPUT: &str = "/VMC/Ext/Midi/CC/Val";
pub const ADDRESS_MIDI_CC_BUTTON_INPUT: &str = "/VMC/Ext/Midi/CC/Bit";
pub const ADDRESS_DEVICE_TRANSFORM_HMD: &str = "/VMC/Ext/Hmd/Pos";
pub const ADDRESS_DEVICE_TRANSFORM_CON: &str = "/VMC/Ext/Con/Pos";
pub const ADDRESS_DEVICE_TRANSFORM_TRA: &str = "/VMC/Ext/Tra/Pos";
pub const ADDRESS_DEVICE_TRANSFORM_HMD_LOCAL: &str = "/VMC/Ext/Hmd/Pos/Local";
pub const ADDRESS_DEVICE_TRANSFORM_CON_LOCAL: &str = "/VMC/Ext/Con/Pos/Local";
pub const ADDRESS_DEVICE_TRANSFORM_TRA_LOCAL: &str = "/VMC/Ext/Tra/Pos/Local";
pub const ADDRESS_RECEIVE_ENABLE: &str = "/VMC/Ext/Rcv";
pub const ADDRESS_DIRECTIONAL_LIGHT: &str = "/VMC/Ext/Light";
pub const ADDRESS_LOCAL_VRM: &str = "/VMC/Ext/VRM";
pub const ADDRESS_REMOTE_VRM: &str = "/VMC/Ext/Remote";
pub const ADDRESS_OPTION_STRING: &str = "/VMC/Ext/Opt";
pub const ADDRESS_BACKGROUND_COLOR: &str = "/VMC/Ext/Setting/Color";
pub const ADDRESS_WINDOW_ATTRIBUTE: &str = "/VMC/Ext/Setting/Win";
pub const ADDRESS_LOADED_SETTING_PATH: &str = "/VMC/Ext/Config";

/// Loaded flag, then calibration state and mode, then tracking status.
pub const SIGNATURES_AVAILABLE: &[&str] = &["i", "iii", "iiii"];
pub const SIGNATURES_RELATIVE_TIME: &[&str] = &["f"];
/// Name, position, rotation, then scale and offset.
pub const SIGNATURES_ROOT_TRANSFORM: &[&str] = &["sfffffff", "sfffffffffffff"];
pub const SIGNATURES_BONE_TRANSFORM: &[&str] = &["sfffffff"];
pub const SIGNATURES_BLEND_SHAPE_PROXY_VALUE: &[&str] = &["sf"];
pub const SIGNATURES_BLEND_SHAPE_PROXY_APPLY: &[&str] = &[""];
pub const SIGNATURES_CAMERA_TRANSFORM: &[&str] = &["sffffffff"];
pub const SIGNATURES_CONTROLLER_INPUT: &[&str] = &["isiiifff"];
pub const SIGNATURES_KEYBOARD_INPUT: &[&str] = &["isi"];
pub const SIGNATURES_MIDI_NOTE_INPUT: &[&str] = &["iiif"];
pub const SIGNATURES_MIDI_CC_VALUE_INPUT: &[&str] = &["if"];
pub const SIGNATURES_MIDI_CC_BUTTON_INPUT: &[&str] = &["ii"];
pub const SIGNATURES_DEVICE_TRANSFORM: &[&str] = &["sfffffff"];
/// Enable flag and port, then the listen address.
pub const SIGNATURES_RECEIVE_ENABLE: &[&str] = &["ii", "iis"];
pub const SIGNATURES_DIRECTIONAL_LIGHT: &[&str] = &["sfffffffffff"];
/// Path and title, then the model hash.
pub const SIGNATURES_LOCAL_VRM: &[&str] = &["ss", "sss"];
pub const SIGNATURES_REMOTE_VRM: &[&str] = &["ss"];
pub const SIGNATURES_OPTION_STRING: &[&str] = &["s"];
pub const SIGNATURES_BACKGROUND_COLOR: &[&str] = &["ffff"];
pub const SIGNATURES_WINDOW_ATTRIBUTE: &[&str] = &["iiii"];
pub const SIGNATURES_LOADED_SETTING_PATH: &[&str] = &["s"];

/// Every address the catalogue decodes, paired with its signatures.
pub const CATALOGUE: &[(&str, &[&str])] = &[
    (ADDRESS_AVAILABLE, SIGNATURES_AVAILABLE),
    (ADDRESS_RELATIVE_TIME, SIGNATURES_RELATIVE_TIME),
    (ADDRESS_ROOT_TRANSFORM, SIGNATURES_ROOT_TRANSFORM),
    (ADDRESS_BONE_TRANSFORM, SIGNATURES_BONE_TRANSFORM),
    (ADDRESS_BLEND_SHAPE_PROXY_VALUE, SIGNATURES_BLEND_SHAPE_PROXY_VALUE),
    (ADDRESS_BLEND_SHAPE_PROXY_APPLY, SIGNATURES_BLEND_SHAPE_PROXY_APPLY),
    (ADDRESS_CAMERA_TRANSFORM, SIGNATURES_CAMERA_TRANSFORM),
    (ADDRESS_CONTROLLER_INPUT, SIGNATURES_CONTROLLER_INPUT),
    (ADDRESS_KEYBOARD_INPUT, SIGNATURES_KEYBOARD_INPUT),
    (ADDRESS_MIDI_NOTE_INPUT, SIGNATURES_MIDI_NOTE_INPUT),
    (ADDRESS_MIDI_CC_VALUE_INPUT, SIGNATURES_MIDI_CC_VALUE_INPUT),
    (ADDRESS_MIDI_CC_BUTTON_INPUT, SIGNATURES_MIDI_CC_BUTTON_INPUT),
    (ADDRESS_DEVICE_TRANSFORM_HMD, SIGNATURES_DEVICE_TRANSFORM),
    (ADDRESS_DEVICE_TRANSFORM_CON, SIGNATURES_DEVICE_TRANSFORM),
    (ADDRESS_DEVICE_TRANSFORM_TRA, SIGNATURES_DEVICE_TRANSFORM),
    (ADDRESS_DEVICE_TRANSFORM_HMD_LOCAL, SIGNATURES_DEVICE_TRANSFORM),
    (ADDRESS_DEVICE_TRANSFORM_CON_LOCAL, SIGNATURES_DEVICE_TRANSFORM),
    (ADDRESS_DEVICE_TRANSFORM_TRA_LOCAL, SIGNATURES_DEVICE_TRANSFORM),
    (ADDRESS_RECEIVE_ENABLE, SIGNATURES_RECEIVE_ENABLE),
    (ADDRESS_DIRECTIONAL_LIGHT, SIGNATURES_DIRECTIONAL_LIGHT),
    (ADDRESS_LOCAL_VRM, SIGNATURES_LOCAL_VRM),
    (ADDRESS_REMOTE_VRM, SIGNATURES_REMOTE_VRM),
    (ADDRESS_OPTION_STRING, SIGNATURES_OPTION_STRING),
    (ADDRESS_BACKGROUND_COLOR, SIGNATURES_BACKGROUND_COLOR),
    (ADDRESS_WINDOW_ATTRIBUTE, SIGNATURES_WINDOW_ATTRIBUTE),
    (ADDRESS_LOADED_SETTING_PATH, SIGNATURES_LOADED_SETTING_PATH),
];

/// Width in payload bytes of every fixed-width VMC tag (`i` and `f`).
pub const FIXED_FIELD_LEN: usize = 4;
