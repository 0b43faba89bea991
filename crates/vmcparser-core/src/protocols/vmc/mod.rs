//! VMC (Virtual Motion Capture) message decoding on top of OSC.
//!
//! Every VMC message is an OSC message at a fixed address with a fixed
//! argument schema. The catalogue in `layout` maps each address to the type
//! tag signatures it accepts; several addresses accept more than one
//! signature because newer protocol revisions append trailing fields.
//!
//! Two entry points share the same record builders:
//! - `decode_message` / `read_message` decode straight from the payload
//!   bytes and can skip unwanted addresses before touching the payload;
//! - `parse_message` converts an already decoded `osc::Message`.
//!
//! Unknown and filtered addresses are ordinary outcomes, not errors. Device
//! transforms take their `Device` and `local` values from the address.

pub mod error;
pub mod layout;
pub mod message;
mod parser;
mod reader;
pub mod types;

pub use error::VmcError;
pub use message::{
    Available, BackgroundColor, BlendShapeProxyApply, BlendShapeProxyValue, BoneTransform,
    CameraTransform, ControllerInput, DeviceTransform, DirectionalLight, KeyboardInput,
    LoadedSettingPath, LocalVrm, MidiCcButtonInput, MidiCcValueInput, MidiNoteInput,
    OptionString, ReceiveEnable, RelativeTime, RemoteVrm, RootTransform, VmcMessage,
    WindowAttribute,
};
pub use parser::{AddressFilter, Decoded, decode_message, parse_message, read_message};
pub use types::{
    CalibrationMode, CalibrationState, ControllerActive, Device, TrackingStatus, Vec3, Vec4,
    VmcEnum, enum_name,
};
