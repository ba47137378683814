use std::sync::OnceLock;

use arrayvec::ArrayVec;
use itertools::Itertools;

use crate::coords::Vec4;
use crate::pieces::SliderAxis;

/// The 8 orthogonal unit steps; everything else is derived from these.
pub const ORTHOGONAL_STEPS: [Vec4; 8] = [
    Vec4::new(1, 0, 0, 0),
    Vec4::new(-1, 0, 0, 0),
    Vec4::new(0, 1, 0, 0),
    Vec4::new(0, -1, 0, 0),
    Vec4::new(0, 0, 1, 0),
    Vec4::new(0, 0, -1, 0),
    Vec4::new(0, 0, 0, 1),
    Vec4::new(0, 0, 0, -1),
];

/// Step directions for the sliding axes and the knight, derived once from
/// [`ORTHOGONAL_STEPS`]. Precalculating full *move* tables is not viable in a
/// growing multiverse, but the step tables are cheap and fixed.
#[derive(Debug)]
pub struct StepTables {
    pub diagonal: ArrayVec<Vec4, 24>,
    pub triagonal: ArrayVec<Vec4, 32>,
    pub quadragonal: ArrayVec<Vec4, 16>,
    pub knight: ArrayVec<Vec4, 48>,
}

impl StepTables {
    /// Pure derivation: diagonal steps are sums of two distinct-axis
    /// orthogonal steps that stay unit-length, triagonal of three, quadragonal
    /// of four; knight steps are `2a + b` excluding purely orthogonal results.
    /// All tables are deduplicated.
    pub fn derive() -> Self {
        let orth = &ORTHOGONAL_STEPS;
        let distinct = |a: &Vec4, b: &Vec4| a.abs() != b.abs();

        let mut diagonal = ArrayVec::new();
        for (sa, sb) in orth.iter().cartesian_product(orth) {
            if !distinct(sa, sb) {
                continue;
            }
            let s = *sa + *sb;
            if s.is_unit() && !diagonal.contains(&s) {
                diagonal.push(s);
            }
        }

        let mut triagonal = ArrayVec::new();
        for ((sa, sb), sc) in orth.iter().cartesian_product(orth).cartesian_product(orth) {
            if !(distinct(sa, sb) && distinct(sb, sc) && distinct(sc, sa)) {
                continue;
            }
            let s = *sa + *sb + *sc;
            if s.is_unit() && !triagonal.contains(&s) {
                triagonal.push(s);
            }
        }

        let mut quadragonal = ArrayVec::new();
        for (((sa, sb), sc), sd) in
            orth.iter().cartesian_product(orth).cartesian_product(orth).cartesian_product(orth)
        {
            let all_distinct = [sa, sb, sc, sd]
                .into_iter()
                .tuple_combinations()
                .all(|(p, q)| distinct(p, q));
            if !all_distinct {
                continue;
            }
            let s = *sa + *sb + *sc + *sd;
            if s.is_unit() && !quadragonal.contains(&s) {
                quadragonal.push(s);
            }
        }

        let mut knight = ArrayVec::new();
        for (sa, sb) in orth.iter().cartesian_product(orth) {
            let s = *sa * 2 + *sb;
            if !s.is_orthogonal() && !knight.contains(&s) {
                knight.push(s);
            }
        }

        Self { diagonal, triagonal, quadragonal, knight }
    }

    /// The memoized process-wide tables.
    pub fn get() -> &'static Self {
        static TABLES: OnceLock<StepTables> = OnceLock::new();
        TABLES.get_or_init(Self::derive)
    }

    pub fn slider(&self, axis: SliderAxis) -> &[Vec4] {
        match axis {
            SliderAxis::Orthogonal => &ORTHOGONAL_STEPS,
            SliderAxis::Diagonal => &self.diagonal,
            SliderAxis::Triagonal => &self.triagonal,
            SliderAxis::Quadragonal => &self.quadragonal,
        }
    }
}
