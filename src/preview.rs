// src/preview.rs
//! Отладочный вывод карты: PNG-превью и JSON для внешнего рендера
//!
//! Превью рисует каждый тайл гексом («остриём вверх») в цвете его биома.
//! Без флага `visualize_biomes` цвет суши затемняется по высоте, чтобы был виден рельеф.
//! Города — жёлтые, как в [`TOWN_SKIN`]. С флагом `show_coords` центр каждого тайла
//! отмечается чёрной точкой.

use crate::biome::{Biome, BiomeSkins, TOWN_SKIN};
use crate::config::MapConfig;
use crate::error::ExportError;
use crate::generator::GenerationReport;
use crate::map::MapDefinition;
use image::{ImageBuffer, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_polygon_mut};
use imageproc::point::Point;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Цвет для биомов без записи в таблице внешнего вида
const MISSING_SKIN_COLOR: [u8; 3] = [255, 0, 255];
const BACKGROUND: Rgba<u8> = Rgba([12, 18, 28, 255]);
const CENTER_MARK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Минимальный радиус гекса в пикселях
pub const MIN_CELL_SIZE: f32 = 1.0;

#[derive(Debug, Clone, Copy)]
pub struct PreviewOptions {
    /// Радиус гекса в пикселях
    pub cell_size: f32,
    /// Затемнять сушу по высоте
    pub shade_by_height: bool,
    /// Отмечать центры тайлов
    pub mark_centers: bool,
}

impl PreviewOptions {
    #[must_use]
    pub fn for_config(config: &MapConfig) -> Self {
        Self {
            shade_by_height: !config.debug.visualize_biomes,
            mark_centers: config.debug.show_coords,
            ..Self::default()
        }
    }
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            cell_size: 6.0,
            shade_by_height: true,
            mark_centers: false,
        }
    }
}

/// Рисует карту в RGBA-изображение
pub fn render_preview(
    map: &MapDefinition,
    skins: &BiomeSkins,
    options: PreviewOptions,
) -> Result<RgbaImage, ExportError> {
    let cell = options.cell_size;
    if cell.is_nan() || cell < MIN_CELL_SIZE {
        return Err(ExportError::CellTooSmall(cell));
    }
    let tiles = map.render_tiles(skins, cell);
    if tiles.is_empty() {
        return Err(ExportError::EmptyImage);
    }

    let (min_x, max_x, min_z, max_z) = tiles.iter().fold(
        (f32::INFINITY, f32::NEG_INFINITY, f32::INFINITY, f32::NEG_INFINITY),
        |(ax, bx, az, bz), t| {
            (
                ax.min(t.world[0]),
                bx.max(t.world[0]),
                az.min(t.world[2]),
                bz.max(t.world[2]),
            )
        },
    );
    let width = (max_x - min_x + cell * 2.0).ceil() as u32 + 1;
    let height = (max_z - min_z + cell * 2.0).ceil() as u32 + 1;
    let mut img: RgbaImage = ImageBuffer::from_pixel(width, height, BACKGROUND);

    let (lo, hi) = height_range(map);
    for tile in &tiles {
        let cx = tile.world[0] - min_x + cell;
        let cz = tile.world[2] - min_z + cell;

        let mut rgb = match tile.skin {
            Some(skin) => skin.color,
            None => MISSING_SKIN_COLOR,
        };
        if options.shade_by_height && !tile.has_town && tile.biome != Biome::Water {
            let h = map.surface_height(tile.position).unwrap_or(lo);
            let t = if hi > lo { (h - lo) / (hi - lo) } else { 1.0 };
            rgb = shade(rgb, 0.55 + 0.45 * t);
        }
        if tile.has_town {
            rgb = TOWN_SKIN.color;
        }

        fill_hex(&mut img, cx, cz, cell, Rgba([rgb[0], rgb[1], rgb[2], 255]));
        if options.mark_centers {
            let mark_radius = ((cell / 5.0).round() as i32).max(0);
            draw_filled_circle_mut(
                &mut img,
                (cx.round() as i32, cz.round() as i32),
                mark_radius,
                CENTER_MARK,
            );
        }
    }

    Ok(img)
}

/// Сохраняет превью в PNG
pub fn save_preview_png(
    map: &MapDefinition,
    skins: &BiomeSkins,
    options: PreviewOptions,
    path: impl AsRef<Path>,
) -> Result<(), ExportError> {
    let img = render_preview(map, skins, options)?;
    img.save(path)?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct TileExport {
    x: i32,
    z: i32,
    biome: Biome,
    has_town: bool,
    /// Высота для рендера (вода — на уровне воды)
    height: f32,
}

#[derive(Debug, Serialize)]
struct MapExport<'a> {
    seed: f64,
    config: &'a MapConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a GenerationReport>,
    tiles: Vec<TileExport>,
}

/// Карта в JSON: конфигурация, сводка генерации и плоский список тайлов
pub fn map_to_json(
    map: &MapDefinition,
    report: Option<&GenerationReport>,
) -> Result<String, ExportError> {
    let tiles = map
        .tiles()
        .values()
        .map(|t| TileExport {
            x: t.position.x,
            z: t.position.z,
            biome: t.biome,
            has_town: t.has_town,
            height: map
                .surface_height(t.position)
                .unwrap_or(map.config().water_level),
        })
        .collect();
    let export = MapExport {
        seed: map.seed(),
        config: map.config(),
        report,
        tiles,
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

pub fn save_json(
    map: &MapDefinition,
    report: Option<&GenerationReport>,
    path: impl AsRef<Path>,
) -> Result<(), ExportError> {
    fs::write(path, map_to_json(map, report)?)?;
    Ok(())
}

fn height_range(map: &MapDefinition) -> (f32, f32) {
    map.tiles()
        .keys()
        .filter_map(|&c| map.surface_height(c))
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), h| {
            (lo.min(h), hi.max(h))
        })
}

/// Закрашивает гекс; при мелких размерах округлённые углы могут совпасть
fn fill_hex(img: &mut RgbaImage, cx: f32, cz: f32, radius: f32, color: Rgba<u8>) {
    let mut polygon = hex_polygon(cx, cz, radius).to_vec();
    polygon.dedup();
    while polygon.len() > 1 && polygon.first() == polygon.last() {
        polygon.pop();
    }
    if polygon.len() >= 3 {
        draw_polygon_mut(img, &polygon, color);
        return;
    }
    let (x, z) = (cx.round(), cz.round());
    if x >= 0.0 && z >= 0.0 && (x as u32) < img.width() && (z as u32) < img.height() {
        img.put_pixel(x as u32, z as u32, color);
    }
}

fn hex_polygon(cx: f32, cz: f32, radius: f32) -> [Point<i32>; 6] {
    std::array::from_fn(|i| {
        let angle = (60.0 * i as f32 - 30.0).to_radians();
        Point::new(
            (cx + radius * angle.cos()).round() as i32,
            (cz + radius * angle.sin()).round() as i32,
        )
    })
}

fn shade(rgb: [u8; 3], factor: f32) -> [u8; 3] {
    rgb.map(|c| (f32::from(c) * factor).clamp(0.0, 255.0) as u8)
}
