//! Writers for small bundles and serialized files used as test fixtures.

use std::io::Write;
use std::path::Path;

use lzma_rust2::{LzmaOptions, LzmaWriter};

use super::fs::{Compression, FLAG_INFO_AT_END, FLAG_INFO_PADDING};
use super::serialized::{CLASS_ASSET_BUNDLE, CLASS_TEXT_ASSET};

/// Byte sink with switchable endianness and Unity string conventions.
pub(crate) struct Out {
    pub buf: Vec<u8>,
    big_endian: bool,
}

impl Out {
    pub(crate) fn new(big_endian: bool) -> Self {
        Self {
            buf: Vec::new(),
            big_endian,
        }
    }

    fn int<const N: usize>(&mut self, be: [u8; N], le: [u8; N]) {
        self.buf
            .extend_from_slice(if self.big_endian { &be } else { &le });
    }

    pub(crate) fn u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub(crate) fn u16(&mut self, v: u16) {
        self.int(v.to_be_bytes(), v.to_le_bytes());
    }

    pub(crate) fn u32(&mut self, v: u32) {
        self.int(v.to_be_bytes(), v.to_le_bytes());
    }

    pub(crate) fn i32(&mut self, v: i32) {
        self.int(v.to_be_bytes(), v.to_le_bytes());
    }

    pub(crate) fn u64(&mut self, v: u64) {
        self.int(v.to_be_bytes(), v.to_le_bytes());
    }

    pub(crate) fn i64(&mut self, v: i64) {
        self.int(v.to_be_bytes(), v.to_le_bytes());
    }

    pub(crate) fn cstr(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(0);
    }

    pub(crate) fn align(&mut self, n: usize) {
        let len = self.buf.len().next_multiple_of(n);
        self.buf.resize(len, 0);
    }

    /// Length-prefixed, 4-byte aligned byte array.
    pub(crate) fn bytes(&mut self, data: &[u8]) {
        self.i32(data.len() as i32);
        self.buf.extend_from_slice(data);
        self.align(4);
    }

    pub(crate) fn string(&mut self, s: &str) {
        self.bytes(s.as_bytes());
    }
}

struct TestObject {
    path_id: i64,
    class_id: i32,
    body: Box<dyn Fn(&mut Out)>,
}

/// Builds a serialized file holding the given objects.
pub(crate) struct SerializedBuilder {
    version: u32,
    big_endian: bool,
    type_tree: bool,
    objects: Vec<TestObject>,
}

impl SerializedBuilder {
    pub(crate) fn new() -> Self {
        Self {
            version: 21,
            big_endian: false,
            type_tree: false,
            objects: Vec::new(),
        }
    }

    pub(crate) fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub(crate) fn big_endian(mut self) -> Self {
        self.big_endian = true;
        self
    }

    /// Emit a (dummy) type tree for every type.
    pub(crate) fn type_tree(mut self) -> Self {
        self.type_tree = true;
        self
    }

    pub(crate) fn object(
        mut self,
        path_id: i64,
        class_id: i32,
        body: impl Fn(&mut Out) + 'static,
    ) -> Self {
        self.objects.push(TestObject {
            path_id,
            class_id,
            body: Box::new(body),
        });
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let v = self.version;
        let mut classes: Vec<i32> = Vec::new();
        for o in &self.objects {
            if !classes.contains(&o.class_id) {
                classes.push(o.class_id);
            }
        }

        // Object payloads, each starting on an 8-byte boundary
        let mut data = Out::new(self.big_endian);
        let mut placed = Vec::new();
        for o in &self.objects {
            data.align(8);
            let start = data.buf.len();
            (o.body)(&mut data);
            placed.push((start, data.buf.len() - start));
        }

        let header_len = if v >= 22 { 48 } else { 20 };
        let mut meta = Out::new(self.big_endian);
        // Pad so positions inside `meta` match absolute file offsets
        meta.buf.resize(header_len, 0);
        meta.cstr("2020.3.48f1");
        meta.i32(19);
        meta.u8(self.type_tree as u8);
        meta.i32(classes.len() as i32);
        for &class_id in &classes {
            meta.i32(class_id);
            if v >= 16 {
                meta.u8(0);
            }
            if v >= 17 {
                meta.u16(0xFFFF);
            }
            meta.buf.extend_from_slice(&[0xAB; 16]);
            if self.type_tree {
                let node_size = if v >= 19 { 32 } else { 24 };
                meta.i32(2);
                meta.i32(5);
                meta.buf.extend(std::iter::repeat_n(0x11, 2 * node_size));
                meta.buf.extend_from_slice(b"Base\0");
                if v >= 21 {
                    meta.i32(1);
                    meta.i32(0);
                }
            }
        }
        meta.i32(self.objects.len() as i32);
        for (o, &(start, size)) in self.objects.iter().zip(&placed) {
            meta.align(4);
            meta.i64(o.path_id);
            if v >= 22 {
                meta.u64(start as u64);
            } else {
                meta.u32(start as u32);
            }
            meta.u32(size as u32);
            let type_index = classes.iter().position(|&c| c == o.class_id).unwrap_or(0);
            meta.i32(type_index as i32);
            if v < 16 {
                meta.u16(o.class_id as u16);
            }
            if v < 17 {
                meta.u16(0xFFFF);
            }
            if v == 15 || v == 16 {
                meta.u8(0);
            }
        }
        // Script types, externals, ref types, user info
        meta.i32(0);
        meta.i32(0);
        meta.i32(0);
        meta.u8(0);

        let metadata_size = meta.buf.len() - header_len;
        meta.align(16);
        let data_offset = meta.buf.len();
        let file_size = data_offset + data.buf.len();

        let mut header = Out::new(true);
        if v >= 22 {
            header.u32(0);
            header.u32(0);
            header.u32(v);
            header.u32(0);
        } else {
            header.u32(metadata_size as u32);
            header.u32(file_size as u32);
            header.u32(v);
            header.u32(data_offset as u32);
        }
        header.u8(self.big_endian as u8);
        header.buf.extend_from_slice(&[0; 3]);
        if v >= 22 {
            header.u32(metadata_size as u32);
            header.u64(file_size as u64);
            header.u64(data_offset as u64);
            header.u64(0);
        }
        assert_eq!(header.buf.len(), header_len);

        let mut file = meta.buf;
        file[..header_len].copy_from_slice(&header.buf);
        file.extend_from_slice(&data.buf);
        file
    }
}

/// A serialized file whose `AssetBundle` maps each path to a `TextAsset`
/// holding the given bytes.
pub(crate) fn text_asset_file(assets: &[(&str, &[u8])]) -> SerializedBuilder {
    let paths: Vec<(String, i64)> = assets
        .iter()
        .enumerate()
        .map(|(i, (path, _))| (path.to_string(), 100 + i as i64))
        .collect();

    let mut builder = SerializedBuilder::new().object(1, CLASS_ASSET_BUNDLE, move |w| {
        w.string("rom_assets_all");
        w.i32(paths.len() as i32);
        for (_, path_id) in &paths {
            w.i32(0);
            w.i64(*path_id);
        }
        w.i32(paths.len() as i32);
        for (i, (path, path_id)) in paths.iter().enumerate() {
            w.string(path);
            w.i32(i as i32);
            w.i32(1);
            w.i32(0);
            w.i64(*path_id);
        }
    });
    for (i, (path, script)) in assets.iter().enumerate() {
        let name = Path::new(path)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let script = script.to_vec();
        builder = builder.object(100 + i as i64, CLASS_TEXT_ASSET, move |w| {
            w.string(&name);
            w.bytes(&script);
        });
    }
    builder
}

/// Builds a `UnityFS` bundle with one data block per node.
pub(crate) struct BundleBuilder {
    compression: Compression,
    info_at_end: bool,
    nodes: Vec<(String, u32, Vec<u8>)>,
}

impl BundleBuilder {
    pub(crate) fn new(compression: Compression) -> Self {
        Self {
            compression,
            info_at_end: false,
            nodes: Vec::new(),
        }
    }

    pub(crate) fn info_at_end(mut self) -> Self {
        self.info_at_end = true;
        self
    }

    pub(crate) fn node(mut self, path: &str, flags: u32, data: &[u8]) -> Self {
        self.nodes.push((path.to_string(), flags, data.to_vec()));
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let blocks: Vec<(usize, Vec<u8>)> = self
            .nodes
            .iter()
            .map(|(_, _, data)| (data.len(), compress(self.compression, data)))
            .collect();

        let mut info = Out::new(true);
        info.buf.extend_from_slice(&[0; 16]);
        info.i32(blocks.len() as i32);
        for (size, packed) in &blocks {
            info.u32(*size as u32);
            info.u32(packed.len() as u32);
            info.u16(self.compression.flag() as u16);
        }
        info.i32(self.nodes.len() as i32);
        let mut offset = 0u64;
        for (path, flags, data) in &self.nodes {
            info.u64(offset);
            info.u64(data.len() as u64);
            info.u32(*flags);
            info.cstr(path);
            offset += data.len() as u64;
        }
        let info_packed = compress(self.compression, &info.buf);

        let mut flags = self.compression.flag() | 0x40 | FLAG_INFO_PADDING;
        if self.info_at_end {
            flags |= FLAG_INFO_AT_END;
        }

        let mut out = Out::new(true);
        out.cstr("UnityFS");
        out.u32(7);
        out.cstr("5.x.x");
        out.cstr("2020.3.48f1");
        let size_at = out.buf.len();
        out.i64(0);
        out.u32(info_packed.len() as u32);
        out.u32(info.buf.len() as u32);
        out.u32(flags);
        out.align(16);
        if !self.info_at_end {
            out.buf.extend_from_slice(&info_packed);
            out.align(16);
        }
        for (_, packed) in &blocks {
            out.buf.extend_from_slice(packed);
        }
        if self.info_at_end {
            out.buf.extend_from_slice(&info_packed);
        }
        let total = out.buf.len() as i64;
        out.buf[size_at..size_at + 8].copy_from_slice(&total.to_be_bytes());
        out.buf
    }
}

fn compress(compression: Compression, data: &[u8]) -> Vec<u8> {
    match compression {
        Compression::None => data.to_vec(),
        Compression::Lz4 => lz4_flex::block::compress(data),
        Compression::Lzma => {
            let options = LzmaOptions::with_preset(6);
            let mut writer = LzmaWriter::new_no_header(Vec::new(), &options, false).unwrap();
            writer.write_all(data).unwrap();
            let stream = writer.finish().unwrap();
            let mut out = vec![options.get_props()];
            out.extend_from_slice(&options.dict_size.to_le_bytes());
            out.extend_from_slice(&stream);
            out
        }
    }
}

/// Write a single-file bundle exposing `assets` as `TextAsset`s.
pub(crate) fn write_text_asset_bundle(path: &Path, assets: &[(&str, &[u8])]) {
    let file = text_asset_file(assets).build();
    let bytes = BundleBuilder::new(Compression::Lz4)
        .node("CAB-3f2a", super::fs::NODE_SERIALIZED, &file)
        .build();
    std::fs::write(path, bytes).unwrap();
}
