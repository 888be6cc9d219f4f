//! Serialized files: the object tables stored inside bundle nodes.
//!
//! Only what asset lookup needs is read: the object table, the
//! `AssetBundle` container map and `TextAsset` payloads. Both classes have
//! had a fixed field layout since format 14 (Unity 5), so type trees are
//! skipped rather than interpreted.

use super::UnityError;
use super::stream::Stream;

pub(crate) const FORMAT: &str = "SerializedFile";
pub(crate) const MIN_VERSION: u32 = 14;
pub(crate) const MAX_VERSION: u32 = 22;

pub(crate) const CLASS_TEXT_ASSET: i32 = 49;
pub(crate) const CLASS_MONO_BEHAVIOUR: i32 = 114;
pub(crate) const CLASS_ASSET_BUNDLE: i32 = 142;

/// Reference to an object, possibly in another serialized file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PPtr {
    pub file_id: i32,
    pub path_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ObjectInfo {
    pub path_id: i64,
    pub class_id: i32,
    start: usize,
    size: usize,
}

/// Object table of one serialized file. Payloads are read from the node
/// bytes on demand.
#[derive(Debug)]
pub(crate) struct SerializedFile {
    pub version: u32,
    big_endian: bool,
    pub objects: Vec<ObjectInfo>,
}

impl SerializedFile {
    pub(crate) fn parse(data: &[u8]) -> Result<Self, UnityError> {
        let mut s = Stream::new(data, true);

        let _metadata_size = s.u32()?;
        let _file_size = s.u32()?;
        let version = s.u32()?;
        let mut data_offset = u64::from(s.u32()?);
        if !(MIN_VERSION..=MAX_VERSION).contains(&version) {
            return Err(UnityError::UnsupportedVersion {
                format: FORMAT,
                version,
            });
        }
        let big_endian = s.u8()? != 0;
        s.bytes(3)?;
        if version >= 22 {
            let _metadata_size = s.u32()?;
            let _file_size = s.u64()?;
            data_offset = s.u64()?;
            s.u64()?;
        }
        s.set_big_endian(big_endian);

        let engine = s.cstr()?;
        let _platform = s.i32()?;
        let type_tree = s.u8()? != 0;

        let type_count = s.count()?;
        let mut classes = Vec::with_capacity(type_count.min(1024));
        for _ in 0..type_count {
            classes.push(read_type(&mut s, version, type_tree)?);
        }

        let object_count = s.count()?;
        let mut objects = Vec::with_capacity(object_count.min(4096));
        for _ in 0..object_count {
            s.align(4)?;
            let path_id = s.i64()?;
            let start = if version >= 22 {
                s.u64()?
            } else {
                u64::from(s.u32()?)
            };
            let size = s.u32()?;
            let type_index = s.i32()?;
            let class_id = if version < 16 {
                i32::from(s.u16()?)
            } else {
                usize::try_from(type_index)
                    .ok()
                    .and_then(|i| classes.get(i).copied())
                    .ok_or(UnityError::BadTypeIndex(type_index))?
            };
            if version < 17 {
                let _script_index = s.u16()?;
            }
            if version == 15 || version == 16 {
                let _stripped = s.u8()?;
            }

            let start = start
                .checked_add(data_offset)
                .and_then(|v| usize::try_from(v).ok())
                .ok_or(UnityError::Truncated {
                    offset: usize::MAX,
                    wanted: size as usize,
                })?;
            objects.push(ObjectInfo {
                path_id,
                class_id,
                start,
                size: size as usize,
            });
        }

        log::debug!(
            "SerializedFile v{version} ({engine}): {} types, {} objects",
            classes.len(),
            objects.len()
        );
        Ok(Self {
            version,
            big_endian,
            objects,
        })
    }

    pub(crate) fn object(&self, path_id: i64) -> Option<&ObjectInfo> {
        self.objects.iter().find(|o| o.path_id == path_id)
    }

    /// Cursor positioned at an object's payload, bounded by its size.
    fn object_stream<'a>(
        &self,
        data: &'a [u8],
        object: &ObjectInfo,
    ) -> Result<Stream<'a>, UnityError> {
        let end = object
            .start
            .checked_add(object.size)
            .filter(|&end| end <= data.len())
            .ok_or(UnityError::Truncated {
                offset: object.start,
                wanted: object.size,
            })?;
        let mut s = Stream::new(&data[..end], self.big_endian);
        s.seek(object.start)?;
        Ok(s)
    }

    /// `m_Container` of the file's `AssetBundle` object, or nothing if the
    /// file has none.
    pub(crate) fn container(&self, data: &[u8]) -> Result<Vec<(String, PPtr)>, UnityError> {
        let Some(bundle) = self
            .objects
            .iter()
            .find(|o| o.class_id == CLASS_ASSET_BUNDLE)
        else {
            return Ok(Vec::new());
        };
        let mut s = self.object_stream(data, bundle)?;

        let _name = s.aligned_string()?;
        let preload_count = s.count()?;
        for _ in 0..preload_count {
            read_pptr(&mut s)?;
        }

        let count = s.count()?;
        let mut entries = Vec::with_capacity(count.min(4096));
        for _ in 0..count {
            let path = s.aligned_string()?;
            let _preload_index = s.i32()?;
            let _preload_size = s.i32()?;
            entries.push((path, read_pptr(&mut s)?));
        }
        Ok(entries)
    }

    /// `m_Script` of a `TextAsset` object.
    pub(crate) fn text_asset_script<'a>(
        &self,
        data: &'a [u8],
        object: &ObjectInfo,
    ) -> Result<&'a [u8], UnityError> {
        let mut s = self.object_stream(data, object)?;
        let _name = s.aligned_string()?;
        s.byte_array()
    }
}

fn read_pptr(s: &mut Stream<'_>) -> Result<PPtr, UnityError> {
    Ok(PPtr {
        file_id: s.i32()?,
        path_id: s.i64()?,
    })
}

/// Read one type entry and return its class ID.
fn read_type(s: &mut Stream<'_>, version: u32, type_tree: bool) -> Result<i32, UnityError> {
    let class_id = s.i32()?;
    if version >= 16 {
        let _stripped = s.u8()?;
    }
    if version >= 17 {
        let _script_index = s.u16()?;
    }
    let has_script_id = if version < 16 {
        class_id < 0
    } else {
        class_id == CLASS_MONO_BEHAVIOUR
    };
    if has_script_id {
        s.bytes(16)?;
    }
    // Type hash
    s.bytes(16)?;

    if type_tree {
        let node_count = s.count()?;
        let string_size = s.count()?;
        let node_size = if version >= 19 { 32 } else { 24 };
        let nodes_len = node_count
            .checked_mul(node_size)
            .ok_or(UnityError::BadCount(i32::MAX))?;
        s.bytes(nodes_len)?;
        s.bytes(string_size)?;
        if version >= 21 {
            let deps = s.count()?;
            s.bytes(deps.checked_mul(4).ok_or(UnityError::BadCount(i32::MAX))?)?;
        }
    }
    Ok(class_id)
}
