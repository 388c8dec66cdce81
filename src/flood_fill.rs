// src/flood_fill.rs
//! Заливка (поиск в ширину) по гексагональной сетке
//!
//! Один примитив на две задачи:
//! - вырезание центрального острова (допускается суша, старт — центр карты);
//! - выращивание «пятна» биома (допускаются тайлы-затравки).
//!
//! ## Порядок обхода
//!
//! - `frontier` — очередь FIFO найденных, но ещё не раскрытых координат
//! - `scheduled` — всё, что когда-либо попадало в очередь (защита от повторной постановки)
//! - `visited` — полностью обработанные координаты
//!
//! Всегда раскрывается самая ранняя координата в очереди; обход заканчивается, когда очередь пуста.

use crate::hex::AxialCoord;
use std::collections::{HashSet, VecDeque};

/// Результат заливки
#[derive(Debug, Clone, Default)]
pub struct FloodFillResult {
    /// Связная область, достижимая от старта через допущенные координаты
    pub reached: HashSet<AxialCoord>,

    /// Координаты на границе области, которые были проверены и отвергнуты
    pub rejected: HashSet<AxialCoord>,

    /// Координаты области в порядке раскрытия
    pub order: Vec<AxialCoord>,
}

impl FloodFillResult {
    #[must_use]
    pub fn contains(&self, axial: AxialCoord) -> bool {
        self.reached.contains(&axial)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.reached.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reached.is_empty()
    }
}

/// Заливка от `start`
///
/// * `neighbors` — генератор соседей координаты
/// * `admit` — допускается ли координата в область (проверяется и для старта)
/// * `bound` — максимальное расстояние от центра карты; координаты дальше не рассматриваются
///
/// Если старт не допущен или лежит за границей, область пуста.
pub fn flood_fill<N, I, A>(
    start: AxialCoord,
    mut neighbors: N,
    mut admit: A,
    bound: Option<i32>,
) -> FloodFillResult
where
    N: FnMut(AxialCoord) -> I,
    I: IntoIterator<Item = AxialCoord>,
    A: FnMut(AxialCoord) -> bool,
{
    let in_bounds = |c: AxialCoord| bound.is_none_or(|b| c.distance() <= b);

    let mut result = FloodFillResult::default();
    if !in_bounds(start) || !admit(start) {
        result.rejected.insert(start);
        return result;
    }

    let mut frontier = VecDeque::new();
    let mut scheduled = HashSet::new();
    frontier.push_back(start);
    scheduled.insert(start);

    while let Some(current) = frontier.pop_front() {
        debug_assert!(!result.reached.contains(&current));
        result.reached.insert(current);
        result.order.push(current);

        for next in neighbors(current) {
            if scheduled.contains(&next) || result.rejected.contains(&next) || !in_bounds(next) {
                continue;
            }
            if admit(next) {
                scheduled.insert(next);
                frontier.push_back(next);
            } else {
                result.rejected.insert(next);
            }
        }
    }

    debug_assert_eq!(scheduled.len(), result.reached.len());
    result
}
