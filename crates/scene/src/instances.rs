use glam::{Mat4, Vec3};
use orbitview_common::Transform;
use serde::{Deserialize, Serialize};

/// Splitmix64 generator: small, fast and fully determined by its seed.
#[derive(Debug, Clone)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform sample in `[0, 1)` with 24 bits of precision.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Uniform sample in `[lo, hi)`; `lo` when the range is empty.
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        let v = lo + (hi - lo) * self.next_f32();
        // f32 rounding can land exactly on `hi`.
        if v < hi { v } else { lo }
    }
}

/// Ranges the instance generator draws from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceParams {
    /// Each offset component is drawn from `[-offset_extent, offset_extent)`.
    pub offset_extent: f32,
    /// Uniform scale is drawn from `[scale_min, scale_max)`.
    pub scale_min: f32,
    pub scale_max: f32,
    /// Rotation axis shared by every instance; normalized on use.
    pub rotation_axis: Vec3,
}

impl Default for InstanceParams {
    fn default() -> Self {
        Self {
            offset_extent: 10.0,
            scale_min: 0.0025,
            scale_max: 0.0125,
            rotation_axis: Vec3::new(1.0, 0.3, 0.5),
        }
    }
}

/// Per-instance parameters as drawn, before composition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InstanceSample {
    pub offset: Vec3,
    pub angle_degrees: f32,
    pub scale: f32,
}

/// Fixed, ordered set of model matrices for one instanced draw.
///
/// Index order is draw order. The table is immutable once generated.
#[derive(Debug, Clone)]
pub struct InstanceTable {
    seed: u64,
    samples: Vec<InstanceSample>,
    matrices: Vec<Mat4>,
}

impl InstanceTable {
    /// Generate `count` instances from `seed`.
    ///
    /// Each matrix is `translate(offset) · rotate(angle, axis) · scale(s)`.
    /// The same seed and params always produce the same table.
    pub fn generate(count: usize, seed: u64, params: &InstanceParams) -> Self {
        let _span = tracing::debug_span!("generate_instances", count, seed).entered();
        let mut rng = SplitMix64::new(seed);
        let extent = params.offset_extent;

        let samples: Vec<InstanceSample> = (0..count)
            .map(|_| {
                let angle_degrees = rng.range(0.0, 360.0);
                let offset = Vec3::new(
                    rng.range(-extent, extent),
                    rng.range(-extent, extent),
                    rng.range(-extent, extent),
                );
                let scale = rng.range(params.scale_min, params.scale_max);
                InstanceSample {
                    offset,
                    angle_degrees,
                    scale,
                }
            })
            .collect();

        let matrices = samples
            .iter()
            .map(|s| {
                Transform::from_axis_angle(
                    s.offset,
                    params.rotation_axis,
                    s.angle_degrees.to_radians(),
                    s.scale,
                )
                .matrix()
            })
            .collect();

        Self {
            seed,
            samples,
            matrices,
        }
    }

    /// Seed derived from the wall clock, for runs that do not pin one.
    pub fn time_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    pub fn matrices(&self) -> &[Mat4] {
        &self.matrices
    }

    pub fn samples(&self) -> &[InstanceSample] {
        &self.samples
    }

    /// Column-major matrices, ready for a one-time GPU upload.
    pub fn to_cols(&self) -> Vec<[[f32; 4]; 4]> {
        self.matrices.iter().map(Mat4::to_cols_array_2d).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitmix_is_deterministic() {
        let mut a = SplitMix64::new(7);
        let mut b = SplitMix64::new(7);
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn range_excludes_upper_bound_under_rounding() {
        // Adjacent floats: most products round the sum up to `hi`.
        let lo = 1.0_f32 - f32::EPSILON / 2.0;
        let hi = 1.0_f32;
        let mut rng = SplitMix64::new(3);
        for _ in 0..1000 {
            let v = rng.range(lo, hi);
            assert!(v >= lo && v < hi, "{v} outside [{lo}, {hi})");
        }
    }

    #[test]
    fn empty_range_yields_lower_bound() {
        let mut rng = SplitMix64::new(9);
        assert_eq!(rng.range(2.0, 2.0), 2.0);
    }

    #[test]
    fn splitmix_unit_range() {
        let mut rng = SplitMix64::new(1);
        for _ in 0..10_000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn generates_requested_count() {
        let table = InstanceTable::generate(1000, 42, &InstanceParams::default());
        assert_eq!(table.len(), 1000);
        assert_eq!(table.samples().len(), 1000);
        assert_eq!(table.to_cols().len(), 1000);
        assert!(!table.is_empty());
    }

    #[test]
    fn same_seed_same_table() {
        let params = InstanceParams::default();
        let a = InstanceTable::generate(64, 99, &params);
        let b = InstanceTable::generate(64, 99, &params);
        assert_eq!(a.matrices(), b.matrices());

        let c = InstanceTable::generate(64, 100, &params);
        assert_ne!(a.matrices(), c.matrices());
    }

    #[test]
    fn samples_respect_ranges() {
        let params = InstanceParams::default();
        let table = InstanceTable::generate(500, 3, &params);
        for s in table.samples() {
            assert!((0.0..360.0).contains(&s.angle_degrees));
            for c in s.offset.to_array() {
                assert!(c >= -params.offset_extent && c < params.offset_extent);
            }
            assert!(s.scale >= params.scale_min && s.scale < params.scale_max);
        }
    }

    #[test]
    fn matrix_composes_translate_rotate_scale() {
        let params = InstanceParams::default();
        let table = InstanceTable::generate(8, 5, &params);
        for (s, m) in table.samples().iter().zip(table.matrices()) {
            let expected = Mat4::from_translation(s.offset)
                * Mat4::from_axis_angle(
                    params.rotation_axis.normalize(),
                    s.angle_degrees.to_radians(),
                )
                * Mat4::from_scale(Vec3::splat(s.scale));
            assert!(m.abs_diff_eq(expected, 1e-5));
            assert_eq!(m.w_axis.truncate(), s.offset);
        }
    }

    #[test]
    fn empty_table() {
        let table = InstanceTable::generate(0, 1, &InstanceParams::default());
        assert!(table.is_empty());
    }
}
