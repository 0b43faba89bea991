use std::collections::HashSet;

use crate::protocols::osc::layout::ADDRESS_PREFIX;
use crate::protocols::osc::parser::read_tags;
use crate::protocols::osc::{Message, OscError, OscReader};

use super::error::VmcError;
use super::layout;
use super::message::*;
use super::reader::{ArgumentFields, FieldSource, PayloadFields, expected_len};
use super::types::Device;

/// Allow-list of addresses a consumer cares about. An empty filter accepts
/// every address.
///
/// # Examples
/// ```
/// use vmcparser_core::vmc::AddressFilter;
///
/// let filter = AddressFilter::new(["/VMC/Ext/Root/Pos"]);
/// assert!(filter.accepts(b"/VMC/Ext/Root/Pos"));
/// assert!(!filter.accepts(b"/VMC/Ext/Bone/Pos"));
/// assert!(AddressFilter::all().accepts(b"/anything"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressFilter {
    addresses: HashSet<Box<[u8]>>,
}

impl AddressFilter {
    pub fn new<I, A>(addresses: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: AsRef<[u8]>,
    {
        Self {
            addresses: addresses
                .into_iter()
                .map(|address| Box::from(address.as_ref()))
                .collect(),
        }
    }

    /// A filter that accepts everything.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn accepts(&self, address: &[u8]) -> bool {
        self.addresses.is_empty() || self.addresses.contains(address)
    }
}

/// Outcome of decoding one message through the catalogue.
///
/// `Unknown` and `Filtered` are not failures; a receive loop skips them and
/// carries on with the next message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decoded<'a> {
    Message(VmcMessage<'a>),
    /// The address is not part of the VMC catalogue.
    Unknown,
    /// The address was rejected by the filter; nothing after it was read.
    Filtered,
}

impl<'a> Decoded<'a> {
    pub fn message(self) -> Option<VmcMessage<'a>> {
        match self {
            Self::Message(message) => Some(message),
            Self::Unknown | Self::Filtered => None,
        }
    }
}

/// Decode a VMC message from its address, type tags (without `,`) and the
/// argument payload that follows the tags.
///
/// The tags must match one of the address's signatures exactly and the
/// payload must be exactly as long as that signature implies. Strings in the
/// result borrow from `payload`.
///
/// # Examples
/// ```
/// use vmcparser_core::vmc::{AddressFilter, Decoded, VmcMessage, decode_message};
///
/// let decoded = decode_message(
///     b"/VMC/Ext/T",
///     b"f",
///     &[0x40, 0xA0, 0x00, 0x00],
///     &AddressFilter::all(),
/// )
/// .unwrap();
/// let Decoded::Message(VmcMessage::RelativeTime(time)) = decoded else {
///     panic!("expected relative time");
/// };
/// assert_eq!(time.time, 5.0);
/// ```
pub fn decode_message<'a>(
    address: &[u8],
    type_tags: &[u8],
    payload: &'a [u8],
    filter: &AddressFilter,
) -> Result<Decoded<'a>, VmcError> {
    if !filter.accepts(address) {
        return Ok(Decoded::Filtered);
    }
    let Some(route) = Route::find(address) else {
        return Ok(Decoded::Unknown);
    };
    let signature = match_signature(route, type_tags)?;

    let expected = expected_len(signature, payload)?;
    if payload.len() != expected {
        return Err(VmcError::InvalidBufferLength {
            found: payload.len(),
            expected,
        });
    }

    let mut fields = PayloadFields::new(payload);
    route.build(signature, &mut fields).map(Decoded::Message)
}

/// Decode a complete, unbundled OSC message as a VMC message.
///
/// The address is checked against `filter` before the type tags are read.
/// Every byte after the type tags belongs to the payload, so trailing data
/// is reported as `InvalidBufferLength`.
pub fn read_message<'a>(buf: &'a [u8], filter: &AddressFilter) -> Result<Decoded<'a>, VmcError> {
    let mut reader = OscReader::new(buf);
    match reader.peek() {
        None => return Err(OscError::InputEmpty.into()),
        Some(ADDRESS_PREFIX) => {}
        Some(marker) => return Err(OscError::InvalidPacket { marker }.into()),
    }

    let address = reader.read_string()?;
    if !filter.accepts(address) {
        return Ok(Decoded::Filtered);
    }
    if Route::find(address).is_none() {
        return Ok(Decoded::Unknown);
    }

    let type_tags = read_tags(&mut reader)?;
    decode_message(address, type_tags, reader.rest(), filter)
}

/// Convert a decoded OSC message into a VMC message.
///
/// Returns `Ok(None)` when the address is not part of the catalogue.
///
/// # Examples
/// ```
/// use vmcparser_core::osc::{Packet, read_packet};
/// use vmcparser_core::vmc::{CalibrationState, VmcMessage, parse_message};
///
/// let buf = b"/VMC/Ext/OK\0,iii\0\0\0\0\0\0\0\x01\0\0\0\x03\0\0\0\x01";
/// let (Packet::Message(message), _) = read_packet(buf).unwrap() else {
///     panic!("expected a message");
/// };
/// let Some(VmcMessage::Available(available)) = parse_message(&message).unwrap() else {
///     panic!("expected availability");
/// };
/// assert!(available.loaded);
/// assert_eq!(available.calibration_state, Some(CalibrationState::Calibrated));
/// ```
pub fn parse_message<'a>(message: &Message<'a>) -> Result<Option<VmcMessage<'a>>, VmcError> {
    let Some(route) = Route::find(message.address) else {
        return Ok(None);
    };
    let signature = match_signature(route, message.type_tags)?;
    let mut fields = ArgumentFields::new(&message.arguments);
    route.build(signature, &mut fields).map(Some)
}

fn match_signature(route: Route, type_tags: &[u8]) -> Result<&'static str, VmcError> {
    let accepted = route.signatures();
    accepted
        .iter()
        .copied()
        .find(|signature| signature.as_bytes() == type_tags)
        .ok_or_else(|| VmcError::InvalidTypeTags {
            found: String::from_utf8_lossy(type_tags).into_owned(),
            expected: accepted,
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Available,
    RelativeTime,
    RootTransform,
    BoneTransform,
    BlendShapeProxyValue,
    BlendShapeProxyApply,
    CameraTransform,
    ControllerInput,
    KeyboardInput,
    MidiNoteInput,
    MidiCcValueInput,
    MidiCcButtonInput,
    DeviceTransform(Device, bool),
    ReceiveEnable,
    DirectionalLight,
    LocalVrm,
    RemoteVrm,
    OptionString,
    BackgroundColor,
    WindowAttribute,
    LoadedSettingPath,
}

impl Route {
    fn find(address: &[u8]) -> Option<Self> {
        let address = std::str::from_utf8(address).ok()?;
        let route = match address {
            layout::ADDRESS_AVAILABLE => Self::Available,
            layout::ADDRESS_RELATIVE_TIME => Self::RelativeTime,
            layout::ADDRESS_ROOT_TRANSFORM => Self::RootTransform,
            layout::ADDRESS_BONE_TRANSFORM => Self::BoneTransform,
            layout::ADDRESS_BLEND_SHAPE_PROXY_VALUE => Self::BlendShapeProxyValue,
            layout::ADDRESS_BLEND_SHAPE_PROXY_APPLY => Self::BlendShapeProxyApply,
            layout::ADDRESS_CAMERA_TRANSFORM => Self::CameraTransform,
            layout::ADDRESS_CONTROLLER_INPUT => Self::ControllerInput,
            layout::ADDRESS_KEYBOARD_INPUT => Self::KeyboardInput,
            layout::ADDRESS_MIDI_NOTE_INPUT => Self::MidiNoteInput,
            layout::ADDRESS_MIDI_CC_VALUE_INPUT => Self::MidiCcValueInput,
            layout::ADDRESS_MIDI_CC_BUTTON_INPUT => Self::MidiCcButtonInput,
            layout::ADDRESS_DEVICE_TRANSFORM_HMD => Self::DeviceTransform(Device::Hmd, false),
            layout::ADDRESS_DEVICE_TRANSFORM_CON => Self::DeviceTransform(Device::Con, false),
            layout::ADDRESS_DEVICE_TRANSFORM_TRA => Self::DeviceTransform(Device::Tra, false),
            layout::ADDRESS_DEVICE_TRANSFORM_HMD_LOCAL => Self::DeviceTransform(Device::Hmd, true),
            layout::ADDRESS_DEVICE_TRANSFORM_CON_LOCAL => Self::DeviceTransform(Device::Con, true),
            layout::ADDRESS_DEVICE_TRANSFORM_TRA_LOCAL => Self::DeviceTransform(Device::Tra, true),
            layout::ADDRESS_RECEIVE_ENABLE => Self::ReceiveEnable,
            layout::ADDRESS_DIRECTIONAL_LIGHT => Self::DirectionalLight,
            layout::ADDRESS_LOCAL_VRM => Self::LocalVrm,
            layout::ADDRESS_REMOTE_VRM => Self::RemoteVrm,
            layout::ADDRESS_OPTION_STRING => Self::OptionString,
            layout::ADDRESS_BACKGROUND_COLOR => Self::BackgroundColor,
            layout::ADDRESS_WINDOW_ATTRIBUTE => Self::WindowAttribute,
            layout::ADDRESS_LOADED_SETTING_PATH => Self::LoadedSettingPath,
            _ => return None,
        };
        Some(route)
    }

    fn signatures(self) -> &'static [&'static str] {
        match self {
            Self::Available => layout::SIGNATURES_AVAILABLE,
            Self::RelativeTime => layout::SIGNATURES_RELATIVE_TIME,
            Self::RootTransform => layout::SIGNATURES_ROOT_TRANSFORM,
            Self::BoneTransform => layout::SIGNATURES_BONE_TRANSFORM,
            Self::BlendShapeProxyValue => layout::SIGNATURES_BLEND_SHAPE_PROXY_VALUE,
            Self::BlendShapeProxyApply => layout::SIGNATURES_BLEND_SHAPE_PROXY_APPLY,
            Self::CameraTransform => layout::SIGNATURES_CAMERA_TRANSFORM,
            Self::ControllerInput => layout::SIGNATURES_CONTROLLER_INPUT,
            Self::KeyboardInput => layout::SIGNATURES_KEYBOARD_INPUT,
            Self::MidiNoteInput => layout::SIGNATURES_MIDI_NOTE_INPUT,
            Self::MidiCcValueInput => layout::SIGNATURES_MIDI_CC_VALUE_INPUT,
            Self::MidiCcButtonInput => layout::SIGNATURES_MIDI_CC_BUTTON_INPUT,
            Self::DeviceTransform(..) => layout::SIGNATURES_DEVICE_TRANSFORM,
            Self::ReceiveEnable => layout::SIGNATURES_RECEIVE_ENABLE,
            Self::DirectionalLight => layout::SIGNATURES_DIRECTIONAL_LIGHT,
            Self::LocalVrm => layout::SIGNATURES_LOCAL_VRM,
            Self::RemoteVrm => layout::SIGNATURES_REMOTE_VRM,
            Self::OptionString => layout::SIGNATURES_OPTION_STRING,
            Self::BackgroundColor => layout::SIGNATURES_BACKGROUND_COLOR,
            Self::WindowAttribute => layout::SIGNATURES_WINDOW_ATTRIBUTE,
            Self::LoadedSettingPath => layout::SIGNATURES_LOADED_SETTING_PATH,
        }
    }

    /// Build the record for an already matched `signature`. Optional fields
    /// are present exactly when the signature carries them.
    fn build<'a, F: FieldSource<'a>>(
        self,
        signature: &str,
        fields: &mut F,
    ) -> Result<VmcMessage<'a>, VmcError> {
        let message = match self {
            Self::Available => {
                let loaded = fields.flag()?;
                let (calibration_state, calibration_mode) = if signature.len() >= 3 {
                    (Some(fields.enumeration()?), Some(fields.enumeration()?))
                } else {
                    (None, None)
                };
                let tracking_status = if signature.len() >= 4 {
                    Some(fields.enumeration()?)
                } else {
                    None
                };
                VmcMessage::Available(Available {
                    loaded,
                    calibration_state,
                    calibration_mode,
                    tracking_status,
                })
            }
            Self::RelativeTime => VmcMessage::RelativeTime(RelativeTime {
                time: fields.float()?,
            }),
            Self::RootTransform => {
                let name = fields.string("name")?;
                let position = fields.vec3()?;
                let quaternion = fields.vec4()?;
                let (scale, offset) = if signature.len() > 8 {
                    (Some(fields.vec3()?), Some(fields.vec3()?))
                } else {
                    (None, None)
                };
                VmcMessage::RootTransform(RootTransform {
                    name,
                    position,
                    quaternion,
                    scale,
                    offset,
                })
            }
            Self::BoneTransform => VmcMessage::BoneTransform(BoneTransform {
                name: fields.string("name")?,
                position: fields.vec3()?,
                quaternion: fields.vec4()?,
            }),
            Self::BlendShapeProxyValue => {
                VmcMessage::BlendShapeProxyValue(BlendShapeProxyValue {
                    name: fields.string("name")?,
                    value: fields.float()?,
                })
            }
            Self::BlendShapeProxyApply => VmcMessage::BlendShapeProxyApply(BlendShapeProxyApply),
            Self::CameraTransform => VmcMessage::CameraTransform(CameraTransform {
                name: fields.string("name")?,
                position: fields.vec3()?,
                quaternion: fields.vec4()?,
                fov: fields.float()?,
            }),
            Self::ControllerInput => VmcMessage::ControllerInput(ControllerInput {
                active: fields.enumeration()?,
                name: fields.string("name")?,
                is_left: fields.flag()?,
                is_touch: fields.flag()?,
                is_axis: fields.flag()?,
                axis: fields.vec3()?,
            }),
            Self::KeyboardInput => VmcMessage::KeyboardInput(KeyboardInput {
                active: fields.flag()?,
                name: fields.string("name")?,
                key_code: fields.int()?,
            }),
            Self::MidiNoteInput => VmcMessage::MidiNoteInput(MidiNoteInput {
                active: fields.flag()?,
                channel: fields.int()?,
                note: fields.int()?,
                velocity: fields.float()?,
            }),
            Self::MidiCcValueInput => VmcMessage::MidiCcValueInput(MidiCcValueInput {
                knob: fields.int()?,
                value: fields.float()?,
            }),
            Self::MidiCcButtonInput => VmcMessage::MidiCcButtonInput(MidiCcButtonInput {
                knob: fields.int()?,
                active: fields.flag()?,
            }),
            Self::DeviceTransform(device, local) => {
                VmcMessage::DeviceTransform(DeviceTransform {
                    device,
                    local,
                    serial: fields.string("serial")?,
                    position: fields.vec3()?,
                    quaternion: fields.vec4()?,
                })
            }
            Self::ReceiveEnable => {
                let enable = fields.flag()?;
                let port = fields.int()?;
                let ip_address = if signature.len() > 2 {
                    Some(fields.string("ip address")?)
                } else {
                    None
                };
                VmcMessage::ReceiveEnable(ReceiveEnable {
                    enable,
                    port,
                    ip_address,
                })
            }
            Self::DirectionalLight => VmcMessage::DirectionalLight(DirectionalLight {
                name: fields.string("name")?,
                position: fields.vec3()?,
                quaternion: fields.vec4()?,
                color: fields.vec4()?,
            }),
            Self::LocalVrm => {
                let path = fields.string("path")?;
                let title = fields.string("title")?;
                let hash = if signature.len() > 2 {
                    Some(fields.string("hash")?)
                } else {
                    None
                };
                VmcMessage::LocalVrm(LocalVrm { path, title, hash })
            }
            Self::RemoteVrm => VmcMessage::RemoteVrm(RemoteVrm {
                service: fields.string("service")?,
                json: fields.string("json")?,
            }),
            Self::OptionString => VmcMessage::OptionString(OptionString {
                option: fields.string("option")?,
            }),
            Self::BackgroundColor => VmcMessage::BackgroundColor(BackgroundColor {
                color: fields.vec4()?,
            }),
            Self::WindowAttribute => VmcMessage::WindowAttribute(WindowAttribute {
                is_top_most: fields.flag()?,
                is_transparent: fields.flag()?,
                window_click_through: fields.flag()?,
                hide_border: fields.flag()?,
            }),
            Self::LoadedSettingPath => VmcMessage::LoadedSettingPath(LoadedSettingPath {
                path: fields.string("path")?,
            }),
        };
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::osc::{Argument, Packet, read_packet};
    use crate::protocols::vmc::types::{CalibrationMode, CalibrationState, TrackingStatus};

    const AVAILABLE_III: &[u8] = b"/VMC/Ext/OK\0,iii\0\0\0\0\0\0\0\x01\0\0\0\x03\0\0\0\x01";

    fn ints(values: &[i32]) -> Vec<u8> {
        values.iter().flat_map(|value| value.to_be_bytes()).collect()
    }

    #[test]
    fn every_catalogue_address_routes() {
        for (address, signatures) in layout::CATALOGUE {
            let route = Route::find(address.as_bytes()).unwrap();
            assert_eq!(route.signatures(), *signatures, "{address}");
        }
        assert_eq!(Route::find(b"/VMC/Ext/Nope"), None);
        assert_eq!(Route::find(&[b'/', 0xFF]), None);
    }

    #[test]
    fn reads_available_from_full_message() {
        let decoded = read_message(AVAILABLE_III, &AddressFilter::all()).unwrap();
        assert_eq!(
            decoded,
            Decoded::Message(VmcMessage::Available(Available {
                loaded: true,
                calibration_state: Some(CalibrationState::Calibrated),
                calibration_mode: Some(CalibrationMode::MrNormal),
                tracking_status: None,
            }))
        );
    }

    #[test]
    fn available_versions_fill_optional_fields() {
        let filter = AddressFilter::all();
        let oldest_payload = ints(&[0]);
        let oldest = decode_message(b"/VMC/Ext/OK", b"i", &oldest_payload, &filter).unwrap();
        assert_eq!(
            oldest.message(),
            Some(VmcMessage::Available(Available {
                loaded: false,
                calibration_state: None,
                calibration_mode: None,
                tracking_status: None,
            }))
        );

        let payload = ints(&[1, 0, 0, 1]);
        let newest = decode_message(b"/VMC/Ext/OK", b"iiii", &payload, &filter).unwrap();
        let Some(VmcMessage::Available(available)) = newest.message() else {
            panic!("expected availability");
        };
        assert_eq!(available.calibration_state, Some(CalibrationState::Uncalibrated));
        assert_eq!(available.calibration_mode, Some(CalibrationMode::Normal));
        assert_eq!(available.tracking_status, Some(TrackingStatus::Ok));
    }

    #[test]
    fn rejects_unlisted_signature() {
        let err = decode_message(b"/VMC/Ext/OK", b"ii", &ints(&[1, 1]), &AddressFilter::all())
            .unwrap_err();
        assert_eq!(
            err,
            VmcError::InvalidTypeTags {
                found: "ii".to_string(),
                expected: &["i", "iii", "iiii"],
            }
        );
    }

    #[test]
    fn rejects_wrong_payload_length() {
        let err = decode_message(b"/VMC/Ext/OK", b"i", &ints(&[1, 1]), &AddressFilter::all())
            .unwrap_err();
        assert_eq!(
            err,
            VmcError::InvalidBufferLength {
                found: 8,
                expected: 4
            }
        );
    }

    #[test]
    fn rejects_out_of_range_enum() {
        let err = decode_message(
            b"/VMC/Ext/OK",
            b"iii",
            &ints(&[1, 9, 0]),
            &AddressFilter::all(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            VmcError::InvalidEnumValue {
                field: "calibration state",
                value: 9
            }
        );
    }

    #[test]
    fn filter_short_circuits_before_payload() {
        let filter = AddressFilter::new(["/VMC/Ext/Root/Pos"]);
        let decoded = decode_message(b"/VMC/Ext/Bone/Pos", b"garbage", &[1, 2, 3], &filter).unwrap();
        assert_eq!(decoded, Decoded::Filtered);

        let mut buf = b"/VMC/Ext/Bone/Pos\0\0\0".to_vec();
        buf.extend_from_slice(b"no type tags here");
        assert_eq!(read_message(&buf, &filter).unwrap(), Decoded::Filtered);
    }

    #[test]
    fn unknown_address_is_not_an_error() {
        let filter = AddressFilter::all();
        assert_eq!(
            decode_message(b"/foo", b"i", &[0, 0, 0, 1], &filter).unwrap(),
            Decoded::Unknown
        );
        assert_eq!(
            read_message(b"/foo\0\0\0\0,i\0\0\0\0\0\x01", &filter).unwrap(),
            Decoded::Unknown
        );
    }

    #[test]
    fn read_message_rejects_non_messages() {
        let filter = AddressFilter::all();
        assert_eq!(
            read_message(b"", &filter).unwrap_err(),
            VmcError::Osc(OscError::InputEmpty)
        );
        assert_eq!(
            read_message(b"#bundle\0", &filter).unwrap_err(),
            VmcError::Osc(OscError::InvalidPacket { marker: b'#' })
        );
    }

    #[test]
    fn read_message_requires_type_tags() {
        let err = read_message(b"/VMC/Ext/T\0\0i\0\0\0", &AddressFilter::all()).unwrap_err();
        assert_eq!(err, VmcError::Osc(OscError::TypeTagsStartMissing));
    }

    #[test]
    fn read_message_rejects_trailing_bytes() {
        let mut buf = AVAILABLE_III.to_vec();
        buf.extend_from_slice(&[0, 0, 0, 0]);
        let err = read_message(&buf, &AddressFilter::all()).unwrap_err();
        assert_eq!(
            err,
            VmcError::InvalidBufferLength {
                found: 16,
                expected: 12
            }
        );
    }

    #[test]
    fn generic_path_matches_zero_copy_path() {
        let (packet, _) = read_packet(AVAILABLE_III).unwrap();
        let Packet::Message(message) = packet else {
            panic!("expected message");
        };
        let generic = parse_message(&message).unwrap();
        let direct = decode_message(
            message.address,
            message.type_tags,
            message.payload,
            &AddressFilter::all(),
        )
        .unwrap()
        .message();
        assert_eq!(generic, direct);
    }

    #[test]
    fn generic_path_reports_mismatched_arguments() {
        let message = Message {
            address: b"/VMC/Ext/T",
            type_tags: b"f",
            arguments: vec![Argument::Int(3)],
            raw: &[],
            payload: &[],
        };
        assert_eq!(
            parse_message(&message).unwrap_err(),
            VmcError::ArgumentMismatch { index: 0 }
        );
    }

    #[test]
    fn generic_path_skips_unknown_addresses() {
        let message = Message {
            address: b"/other",
            type_tags: b"",
            arguments: Vec::new(),
            raw: &[],
            payload: &[],
        };
        assert_eq!(parse_message(&message).unwrap(), None);
    }
}
