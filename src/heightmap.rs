use crate::config::HeightSettings;
use crate::hex::{self, AxialCoord};
use fastnoise_lite::{FastNoiseLite, NoiseType};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::collections::HashMap;

/// Детерминированный трёхмерный шум со значениями примерно в `[-1, 1]`
///
/// Генератору подходит любая непрерывная функция с таким контрактом.
pub trait NoiseSource: Sync {
    fn sample(&self, x: f32, y: f32, z: f32) -> f32;
}

/// Шум `OpenSimplex2` из `fastnoise-lite`
pub struct OpenSimplexNoise {
    noise: FastNoiseLite,
}

impl OpenSimplexNoise {
    /// `frequency = 1.0` — координаты передаются в шум как есть
    #[must_use]
    pub fn new(noise_seed: i32, frequency: f32) -> Self {
        let mut noise = FastNoiseLite::new();
        noise.set_seed(Some(noise_seed));
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(frequency));
        Self { noise }
    }
}

impl Default for OpenSimplexNoise {
    fn default() -> Self {
        Self::new(0, 1.0)
    }
}

impl NoiseSource for OpenSimplexNoise {
    fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        self.noise.get_noise_3d(x, y, z)
    }
}

/// Поле высот: шум минус радиальное затухание к краю карты
///
/// `height(c) = noise(x / scale, z / scale, seed) - distance(c) / (radius * decay)`
///
/// Чистая функция от `(координата, сид, радиус)`: одинаковые аргументы дают побитово одинаковый результат.
pub struct HeightField<N = OpenSimplexNoise> {
    noise: N,
    seed: f32,
    radius: i32,
    scale: f32,
    decay: f32,
    floor: Option<f32>,
}

impl HeightField<OpenSimplexNoise> {
    #[must_use]
    pub fn new(seed: f64, radius: i32, settings: &HeightSettings) -> Self {
        Self::with_noise(OpenSimplexNoise::default(), seed, radius, settings)
    }
}

impl<N: NoiseSource> HeightField<N> {
    #[must_use]
    pub fn with_noise(noise: N, seed: f64, radius: i32, settings: &HeightSettings) -> Self {
        Self {
            noise,
            seed: seed as f32,
            radius,
            scale: settings.noise_scale(radius),
            decay: settings.decay,
            floor: settings.floor,
        }
    }

    /// Высота тайла. Определена для любой координаты, в том числе за пределами диска
    #[must_use]
    pub fn height(&self, axial: AxialCoord) -> f32 {
        let value = self.noise.sample(
            axial.x as f32 / self.scale,
            axial.z as f32 / self.scale,
            self.seed,
        );
        let falloff = axial.distance() as f32 / (self.radius as f32 * self.decay);
        let height = value - falloff;
        match self.floor {
            Some(floor) => height.max(floor),
            None => height,
        }
    }

    #[must_use]
    pub fn radius(&self) -> i32 {
        self.radius
    }

    #[must_use]
    pub fn seed(&self) -> f32 {
        self.seed
    }

    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }
}

/// Высоты всех тайлов диска, посчитанные один раз
///
/// Каждый тайл вычисляется независимо, поэтому расчёт идёт параллельно (фича `parallel`).
#[derive(Debug, Clone)]
pub struct Heightmap {
    pub radius: i32,
    data: HashMap<AxialCoord, f32>,
}

impl Heightmap {
    #[must_use]
    pub fn build<N: NoiseSource>(field: &HeightField<N>) -> Self {
        let coords = hex::disc(field.radius());

        #[cfg(feature = "parallel")]
        let heights: Vec<f32> = coords.par_iter().map(|&c| field.height(c)).collect();
        #[cfg(not(feature = "parallel"))]
        let heights: Vec<f32> = coords.iter().map(|&c| field.height(c)).collect();

        let data: HashMap<AxialCoord, f32> = coords.into_iter().zip(heights).collect();
        assert_eq!(data.len(), hex::disc_size(field.radius()));

        Self {
            radius: field.radius(),
            data,
        }
    }

    #[must_use]
    pub fn get(&self, axial: AxialCoord) -> Option<f32> {
        self.data.get(&axial).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Минимум и максимум высот (для нормализации в превью)
    #[must_use]
    pub fn range(&self) -> (f32, f32) {
        self.data
            .values()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
                (lo.min(h), hi.max(h))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Плоский шум: остаётся только радиальное затухание
    struct FlatNoise(f32);

    impl NoiseSource for FlatNoise {
        fn sample(&self, _x: f32, _y: f32, _z: f32) -> f32 {
            self.0
        }
    }

    #[test]
    fn height_is_deterministic() {
        let settings = HeightSettings::default();
        let a = HeightField::new(0.37, 40, &settings);
        let b = HeightField::new(0.37, 40, &settings);
        for c in hex::disc(6) {
            assert_eq!(a.height(c).to_bits(), b.height(c).to_bits());
            assert_eq!(a.height(c).to_bits(), a.height(c).to_bits());
        }
    }

    #[test]
    fn different_seeds_change_terrain() {
        let settings = HeightSettings::default();
        let a = HeightField::new(0.1, 25, &settings);
        let b = HeightField::new(0.6, 25, &settings);
        let differing = hex::disc(10)
            .into_iter()
            .filter(|&c| (a.height(c) - b.height(c)).abs() > 1e-4)
            .count();
        assert!(differing > 0);
    }

    #[test]
    fn radial_decay_lowers_the_edge() {
        let settings = HeightSettings::default();
        let field = HeightField::with_noise(FlatNoise(0.5), 0.0, 20, &settings);
        assert!((field.height(AxialCoord::ORIGIN) - 0.5).abs() < 1e-6);

        let edge = AxialCoord::new(20, 0);
        let expected = 0.5 - 20.0 / (20.0 * 0.95);
        assert!((field.height(edge) - expected).abs() < 1e-6);
        assert!(field.height(edge) < field.height(AxialCoord::new(10, 0)));
    }

    #[test]
    fn floor_policy_clamps_only_when_enabled() {
        let mut settings = HeightSettings::default();
        let edge = AxialCoord::new(0, 30);

        let unclamped = HeightField::with_noise(FlatNoise(-0.9), 0.0, 30, &settings);
        assert!(unclamped.height(edge) < -0.4);

        settings.floor = Some(-0.4);
        let clamped = HeightField::with_noise(FlatNoise(-0.9), 0.0, 30, &settings);
        assert!((clamped.height(edge) + 0.4).abs() < 1e-6);
    }

    #[test]
    fn heightmap_covers_disc_and_matches_field() {
        let settings = HeightSettings::default();
        let field = HeightField::new(0.42, 12, &settings);
        let heightmap = Heightmap::build(&field);
        assert_eq!(heightmap.len(), hex::disc_size(12));
        for c in hex::disc(12) {
            assert_eq!(heightmap.get(c), Some(field.height(c)));
        }
        assert_eq!(heightmap.get(AxialCoord::new(13, 0)), None);

        let (lo, hi) = heightmap.range();
        assert!(lo <= hi);
    }
}
