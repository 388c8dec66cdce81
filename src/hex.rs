// src/hex.rs
//! Математика гексагональной сетки
//!
//! Осевые координаты `(x, z)` — основной способ адресации тайлов.
//! Кубические координаты `(x, y, z)` с инвариантом `x + y + z == 0` используются для расстояний.
//!
//! Все функции чистые: никакого состояния, никаких ошибок.

use serde::{Deserialize, Serialize};

/// Осевая координата тайла на гексагональной сетке
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct AxialCoord {
    pub x: i32,
    pub z: i32,
}

/// Кубическая форма осевой координаты
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CubeCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Смещения шести соседей в осевых координатах
const NEIGHBOR_OFFSETS: [(i32, i32); 6] = [(1, 0), (-1, 0), (0, 1), (0, -1), (1, -1), (-1, 1)];

impl AxialCoord {
    pub const ORIGIN: AxialCoord = AxialCoord { x: 0, z: 0 };

    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    #[must_use]
    pub fn to_cube(self) -> CubeCoord {
        CubeCoord::new(self.x, -self.x - self.z, self.z)
    }

    /// Расстояние до начала координат
    #[must_use]
    pub fn distance(self) -> i32 {
        self.to_cube().length()
    }

    /// Расстояние между двумя тайлами (число шагов по сетке)
    #[must_use]
    pub fn distance_to(self, other: AxialCoord) -> i32 {
        AxialCoord::new(self.x - other.x, self.z - other.z).distance()
    }

    /// Шесть соседних тайлов
    #[must_use]
    pub fn neighbors(self) -> [AxialCoord; 6] {
        NEIGHBOR_OFFSETS.map(|(dx, dz)| AxialCoord::new(self.x + dx, self.z + dz))
    }

    /// Все координаты на расстоянии `1..=range` от `self` (сам `self` не входит)
    ///
    /// Количество: `3·range² + 3·range`.
    #[must_use]
    pub fn neighbors_within_range(self, range: i32) -> Vec<AxialCoord> {
        let mut result = disc_around(self, range);
        result.retain(|&c| c != self);
        result
    }

    /// Мировая позиция центра тайла (гексы «остриём вверх»)
    ///
    /// `outer_radius` — расстояние от центра до вершины гекса.
    /// Возвращает пару `(x, z)` в плоскости земли.
    #[must_use]
    pub fn to_world(self, outer_radius: f32) -> (f32, f32) {
        let inner_radius = outer_radius * (3.0_f32.sqrt() / 2.0);
        let wx = (self.x as f32 + self.z as f32 * 0.5) * (inner_radius * 2.0);
        let wz = self.z as f32 * outer_radius * 1.5;
        (wx, wz)
    }
}

impl CubeCoord {
    #[must_use]
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        debug_assert_eq!(x + y + z, 0, "нарушен инвариант кубических координат");
        Self { x, y, z }
    }

    /// Расстояние Чебышёва до начала координат
    #[must_use]
    pub fn length(self) -> i32 {
        self.x.abs().max(self.y.abs()).max(self.z.abs())
    }

    #[must_use]
    pub fn to_axial(self) -> AxialCoord {
        AxialCoord::new(self.x, self.z)
    }
}

impl From<AxialCoord> for CubeCoord {
    fn from(axial: AxialCoord) -> Self {
        axial.to_cube()
    }
}

/// Диск радиуса `radius` вокруг начала координат, включая центр
///
/// Порядок обхода детерминирован: по кубическому X, затем по кубическому Y.
/// Количество: `3·r² + 3·r + 1` (для `r < 0` — пусто).
#[must_use]
pub fn disc(radius: i32) -> Vec<AxialCoord> {
    disc_around(AxialCoord::ORIGIN, radius)
}

/// Число тайлов в диске радиуса `radius`
#[must_use]
pub fn disc_size(radius: i32) -> usize {
    if radius < 0 {
        return 0;
    }
    let r = radius as usize;
    3 * r * r + 3 * r + 1
}

fn disc_around(center: AxialCoord, range: i32) -> Vec<AxialCoord> {
    let mut result = Vec::with_capacity(disc_size(range));
    for cube_x in -range..=range {
        let y_min = (-range).max(-cube_x - range);
        let y_max = range.min(-cube_x + range);
        for cube_y in y_min..=y_max {
            let cube_z = -cube_x - cube_y;
            result.push(AxialCoord::new(center.x + cube_x, center.z + cube_z));
        }
    }
    result
}
