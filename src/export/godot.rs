//! Godot scene (`.tscn`) assembly.
//!
//! Writes one `Node2D` root with one `TileMap` child per converted layer:
//!
//! ```text
//! [gd_scene load_steps=3 format=3 uid="uid://b2x7..."]
//!
//! [ext_resource type="Texture2D" uid="uid://bq3n..." path="res://art/main.png" id="1_texture"]
//! [ext_resource type="TileSet" uid="uid://d0a6..." path="res://art/main.tres" id="1_tileset"]
//!
//! [node name="Level_0" type="Node2D"]
//! [node name="Collisions" type="TileMap" parent="."]
//! texture_filter = 1
//! tile_set = ExtResource("1_tileset")
//! format = 2
//! layer_0/tile_data = PackedInt32Array(0, 0, 0, 65537, 65536, 16)
//! ```
//!
//! Layers appear in the order they are given. `load_steps` is
//! `2 * tilesets + 1`.

use crate::convert::{ConversionResult, TranscodedLayer};
use crate::export::{ExportError, Exporter};
use crate::models::Color;
use crate::tileset::ResourceTable;
use crate::transcode::flatten;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Characters Godot uses in textual resource UIDs.
const UID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxy0123456789";
const UID_LENGTH: usize = 12;

/// Replace characters outside `[A-Za-z0-9_]` with `_` and make sure the
/// name starts with a letter or underscore.
pub fn sanitize_node_name(name: &str) -> String {
    let mut out: String =
        name.chars().map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' }).collect();
    match out.chars().next() {
        None => out.push('_'),
        Some(c) if c.is_ascii_digit() => out.insert(0, '_'),
        _ => {}
    }
    out
}

/// File name of the scene for a level.
pub fn scene_file_name(level: &str) -> String {
    format!("{}.tscn", sanitize_node_name(level))
}

/// Hands out `uid://` strings, never the same one twice.
///
/// One generator should serve a whole batch: two generators built from
/// the same seed hand out the same sequence.
#[derive(Debug, Clone)]
pub struct UidGenerator {
    rng: StdRng,
    issued: HashSet<String>,
}

impl UidGenerator {
    /// Seeded generators produce the same sequence every run.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, issued: HashSet::new() }
    }

    pub fn next_uid(&mut self, prefix: char) -> String {
        loop {
            let body: String = (0..UID_LENGTH)
                .map(|_| UID_ALPHABET[self.rng.gen_range(0..UID_ALPHABET.len())] as char)
                .collect();
            let uid = format!("uid://{}{}", prefix, body);
            if self.issued.insert(uid.clone()) {
                return uid;
            }
        }
    }
}

impl Default for UidGenerator {
    fn default() -> Self {
        Self::new(None)
    }
}

fn format_color(color: Color) -> String {
    format!("Color({}, {}, {}, {})", color.r, color.g, color.b, color.a)
}

/// Node names for `layers`, in order: sanitized, with `_2`, `_3`, ...
/// appended to repeats.
pub fn layer_node_names(layers: &[TranscodedLayer]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    layers
        .iter()
        .map(|layer| unique_name(sanitize_node_name(&layer.config.name), &mut used))
        .collect()
}

fn unique_name(base: String, used: &mut HashSet<String>) -> String {
    let mut name = base.clone();
    let mut suffix = 2;
    while !used.insert(name.clone()) {
        name = format!("{}_{}", base, suffix);
        suffix += 1;
    }
    name
}

/// Builds scene text from conversion results.
#[derive(Debug)]
pub struct SceneAssembler<'a> {
    resources: &'a ResourceTable,
    uids: UidGenerator,
}

impl<'a> SceneAssembler<'a> {
    pub fn new(resources: &'a ResourceTable, seed: Option<u64>) -> Self {
        Self { resources, uids: UidGenerator::new(seed) }
    }

    /// Assemble the full scene for one converted level.
    ///
    /// Calling this repeatedly draws fresh UIDs from the same generator.
    pub fn assemble(&mut self, result: &ConversionResult) -> String {
        assemble_scene(self.resources, &mut self.uids, result)
    }
}

fn assemble_scene(
    resources: &ResourceTable,
    uids: &mut UidGenerator,
    result: &ConversionResult,
) -> String {
    let tilesets = result.tilesets();
    let mut lines = Vec::new();

    lines.push(format!(
        "[gd_scene load_steps={} format=3 uid=\"{}\"]",
        2 * tilesets.len() + 1,
        uids.next_uid('b')
    ));
    lines.push(String::new());

    for (index, identifier) in tilesets.iter().enumerate() {
        let n = index + 1;
        let paths = resources.resource_path(identifier);
        lines.push(format!(
            "[ext_resource type=\"Texture2D\" uid=\"{}\" path=\"{}\" id=\"{}_texture\"]",
            uids.next_uid('b'),
            paths.texture,
            n
        ));
        lines.push(format!(
            "[ext_resource type=\"TileSet\" uid=\"{}\" path=\"{}\" id=\"{}_tileset\"]",
            uids.next_uid('d'),
            paths.tileset,
            n
        ));
    }
    if !tilesets.is_empty() {
        lines.push(String::new());
    }

    lines.push(format!("[node name=\"{}\" type=\"Node2D\"]", sanitize_node_name(&result.level)));

    let names = layer_node_names(&result.layers);
    for (index, (layer, name)) in result.layers.iter().zip(&names).enumerate() {
        if index > 0 {
            lines.push(String::new());
        }
        let tileset_id = tilesets.iter().position(|t| *t == layer.tileset).map_or(1, |i| i + 1);
        push_layer(&mut lines, layer, name, tileset_id);
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn push_layer(lines: &mut Vec<String>, layer: &TranscodedLayer, name: &str, tileset_id: usize) {
    lines.push(format!("[node name=\"{}\" type=\"TileMap\" parent=\".\"]", name));
    lines.push("texture_filter = 1".to_string());
    if !layer.visible {
        lines.push("visible = false".to_string());
    }
    let modulate = layer.modulate();
    if modulate != Color::WHITE {
        lines.push(format!("modulate = {}", format_color(modulate)));
    }
    if layer.config.z_index != 0 {
        lines.push(format!("z_index = {}", layer.config.z_index));
    }
    lines.push(format!("tile_set = ExtResource(\"{}_tileset\")", tileset_id));
    lines.push("format = 2".to_string());

    if !layer.triplets.is_empty() {
        let data: Vec<String> = flatten(&layer.triplets).iter().map(|v| v.to_string()).collect();
        lines.push(format!("layer_0/tile_data = PackedInt32Array({})", data.join(", ")));
    }
}

/// Writes `.tscn` files.
///
/// Every scene it produces draws from one UID generator, so scenes of the
/// same batch never share a UID.
#[derive(Debug, Clone, Default)]
pub struct TscnExporter {
    resources: ResourceTable,
    uids: RefCell<UidGenerator>,
}

impl TscnExporter {
    pub fn new(resources: ResourceTable, seed: Option<u64>) -> Self {
        Self { resources, uids: RefCell::new(UidGenerator::new(seed)) }
    }

    /// Restart UID generation from `seed` for reproducible output.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.uids = RefCell::new(UidGenerator::new(Some(seed)));
        self
    }

    pub fn export_to_string(&self, result: &ConversionResult) -> String {
        assemble_scene(&self.resources, &mut self.uids.borrow_mut(), result)
    }

    /// Where [`Exporter::export`] writes `result` for a given `output`.
    pub fn output_path(&self, result: &ConversionResult, output: &Path) -> PathBuf {
        if output.extension().is_some() {
            output.to_path_buf()
        } else {
            output.join(scene_file_name(&result.level))
        }
    }
}

impl Exporter for TscnExporter {
    fn export(&self, result: &ConversionResult, output: &Path) -> Result<PathBuf, ExportError> {
        let output_path = self.output_path(result, output);
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&output_path, self.export_to_string(result))?;
        log::info!("wrote {}", output_path.display());
        Ok(output_path)
    }

    fn format_name(&self) -> &'static str {
        "godot"
    }

    fn extension(&self) -> &'static str {
        "tscn"
    }
}
