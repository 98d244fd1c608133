//! Test asset generation
//!
//! Builds texture payloads in memory with the image crate (plus a hand-made
//! DXT1 DDS) and small parsed models to feed the pipeline.

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use quail_export::{
    Animation, Bone, BoneTrack, Keyframe, Material, MaterialProperty, Model, Triangle, Vertex,
};
use std::io::Cursor;

pub const TEXTURE_CATEGORY: u32 = 2;

/// Solid-color RGBA PNG
pub fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color))),
        ImageFormat::Png,
    )
}

/// Solid-color 24-bit BMP
pub fn bmp_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color))),
        ImageFormat::Bmp,
    )
}

fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, format)
        .expect("Failed to encode test image");
    cursor.into_inner()
}

/// DXT1 block whose texels are all pure green (RGB565 0x07E0)
pub const GREEN_BLOCK: [u8; 8] = [0xE0, 0x07, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

/// Minimal DXT1 DDS file. Width and height must be multiples of 4.
pub fn dxt1_dds(width: u32, height: u32, block: [u8; 8]) -> Vec<u8> {
    let blocks = (width / 4) * (height / 4);

    // DDS_HEADER as 31 little-endian u32 words
    let mut header = [0u32; 31];
    header[0] = 124; // dwSize
    header[1] = 0x1 | 0x2 | 0x4 | 0x1000 | 0x80000; // CAPS | HEIGHT | WIDTH | PIXELFORMAT | LINEARSIZE
    header[2] = height;
    header[3] = width;
    header[4] = blocks * 8;
    header[18] = 32; // ddspf.dwSize
    header[19] = 0x4; // DDPF_FOURCC
    header[20] = u32::from_le_bytes(*b"DXT1");
    header[26] = 0x1000; // DDSCAPS_TEXTURE

    let mut data = b"DDS ".to_vec();
    for word in header {
        data.extend_from_slice(&word.to_le_bytes());
    }
    for _ in 0..blocks {
        data.extend_from_slice(&block);
    }
    data
}

pub fn texture_property(file: &str) -> MaterialProperty {
    MaterialProperty::new(TEXTURE_CATEGORY, "e_TextureDiffuse0", file)
}

pub fn quad_vertices() -> Vec<Vertex> {
    vec![
        Vertex::new([-1.0, -1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
        Vertex::new([1.0, -1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0]),
        Vertex::new([1.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
        Vertex::new([-1.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
    ]
}

/// Quad with both triangles painted with `skin`, textured from `skin.bmp`
pub fn skin_quad(name: &str) -> Model {
    Model {
        name: name.to_string(),
        vertices: quad_vertices(),
        triangles: vec![
            Triangle::new([0, 1, 2], "skin"),
            Triangle::new([2, 3, 0], "skin"),
        ],
        materials: vec![
            Material::new("hair", vec![texture_property("hair.png")]),
            Material::new("skin", vec![texture_property("skin.bmp")]),
        ],
        bones: Vec::new(),
    }
}

/// pelvis -> (spine, leg): spine and leg are siblings under pelvis
pub fn three_bones() -> Vec<Bone> {
    vec![
        Bone::linked("pelvis", 1, 1, -1),
        Bone {
            pivot: [0.0, 1.0, 0.0],
            ..Bone::linked("spine", -1, 0, 2)
        },
        Bone {
            pivot: [0.5, -1.0, 0.0],
            ..Bone::linked("leg", -1, 0, -1)
        },
    ]
}

pub fn skinned_quad(name: &str) -> Model {
    Model {
        bones: three_bones(),
        ..skin_quad(name)
    }
}

pub fn track(bone: &str, frames: usize) -> BoneTrack {
    BoneTrack {
        bone: bone.to_string(),
        frames: (0..frames)
            .map(|i| Keyframe {
                translation: [i as f32, 0.0, 0.0],
                ..Default::default()
            })
            .collect(),
    }
}

pub fn walk_and_idle() -> Vec<Animation> {
    vec![
        Animation {
            name: "walk".into(),
            tracks: vec![track("pelvis", 8), track("spine", 8), track("leg", 8)],
        },
        Animation {
            name: "idle".into(),
            tracks: vec![track("pelvis", 2), track("spine", 2), track("leg", 2)],
        },
    ]
}
