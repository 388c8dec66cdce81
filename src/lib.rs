pub mod biome;
pub mod config;
pub mod error;
pub mod flood_fill;
pub mod generator;
pub mod heightmap;
pub mod hex;
pub mod island;
pub mod map;
pub mod preview;
pub mod towns;

pub use biome::{Biome, BiomeClassifier, BiomeSkins};
pub use config::{BiomePolicy, BiomeSettings, HeightSettings, MapConfig, TownSettings};
pub use error::{ConfigError, ExportError, MapGenError};
pub use generator::{GeneratedMap, GenerationReport, MapGenerator, generate_map};
pub use heightmap::{HeightField, Heightmap, NoiseSource};
pub use hex::{AxialCoord, CubeCoord};
pub use map::{MapDefinition, Tile, TileMap};
pub use towns::{PlacementOutcome, PlacementReport};
