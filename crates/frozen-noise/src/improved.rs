//! Improved (lattice gradient) noise.
//!
//! A 256-entry permutation table and a random lattice offset are drawn from a
//! [`RandomSource`] at construction; sampling hashes the eight surrounding lattice
//! corners into one of sixteen gradients, takes the dot product with the offset to
//! each corner, and blends the results with the quintic fade curve.

use noise::NoiseFn;

use crate::random::RandomSource;

const GRADIENT: [[f64; 3]; 16] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
    [1.0, 1.0, 0.0],
    [0.0, -1.0, 1.0],
    [-1.0, 1.0, 0.0],
    [0.0, -1.0, -1.0],
];

/// Seeded 3D gradient noise sampler. Immutable after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct ImprovedNoise {
    permutation: [u8; 256],
    xo: f64,
    yo: f64,
    zo: f64,
}

impl ImprovedNoise {
    /// Build a lattice from the next values of `random`.
    pub fn new(random: &mut impl RandomSource) -> Self {
        let xo = random.next_double() * 256.0;
        let yo = random.next_double() * 256.0;
        let zo = random.next_double() * 256.0;

        let mut permutation = [0u8; 256];
        for (i, slot) in permutation.iter_mut().enumerate() {
            *slot = i as u8;
        }
        for i in 0..256 {
            let j = random.next_int_bounded(256 - i as i32) as usize;
            permutation.swap(i, i + j);
        }

        Self {
            permutation,
            xo,
            yo,
            zo,
        }
    }

    /// Sample the noise at `(x, y, z)`. The result lies roughly in `[-1, 1]`.
    pub fn noise(&self, x: f64, y: f64, z: f64) -> f64 {
        let dx = x + self.xo;
        let dy = y + self.yo;
        let dz = z + self.zo;
        let fx = dx.floor();
        let fy = dy.floor();
        let fz = dz.floor();
        let tx = dx - fx;
        let ty = dy - fy;
        let tz = dz - fz;
        self.sample_and_lerp(fx as i32, fy as i32, fz as i32, tx, ty, tz)
    }

    /// The lattice offset drawn at construction.
    pub fn origin(&self) -> [f64; 3] {
        [self.xo, self.yo, self.zo]
    }

    fn p(&self, index: i32) -> i32 {
        i32::from(self.permutation[(index & 0xFF) as usize])
    }

    fn sample_and_lerp(&self, x: i32, y: i32, z: i32, tx: f64, ty: f64, tz: f64) -> f64 {
        let a = self.p(x);
        let b = self.p(x.wrapping_add(1));
        let aa = self.p(a.wrapping_add(y));
        let ab = self.p(a.wrapping_add(y).wrapping_add(1));
        let ba = self.p(b.wrapping_add(y));
        let bb = self.p(b.wrapping_add(y).wrapping_add(1));

        let z1 = z.wrapping_add(1);
        let v000 = grad_dot(self.p(aa.wrapping_add(z)), tx, ty, tz);
        let v100 = grad_dot(self.p(ba.wrapping_add(z)), tx - 1.0, ty, tz);
        let v010 = grad_dot(self.p(ab.wrapping_add(z)), tx, ty - 1.0, tz);
        let v110 = grad_dot(self.p(bb.wrapping_add(z)), tx - 1.0, ty - 1.0, tz);
        let v001 = grad_dot(self.p(aa.wrapping_add(z1)), tx, ty, tz - 1.0);
        let v101 = grad_dot(self.p(ba.wrapping_add(z1)), tx - 1.0, ty, tz - 1.0);
        let v011 = grad_dot(self.p(ab.wrapping_add(z1)), tx, ty - 1.0, tz - 1.0);
        let v111 = grad_dot(self.p(bb.wrapping_add(z1)), tx - 1.0, ty - 1.0, tz - 1.0);

        let u = smoothstep(tx);
        let v = smoothstep(ty);
        let w = smoothstep(tz);

        lerp(
            w,
            lerp2(u, v, v000, v100, v010, v110),
            lerp2(u, v, v001, v101, v011, v111),
        )
    }
}

impl NoiseFn<f64, 3> for ImprovedNoise {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.noise(point[0], point[1], point[2])
    }
}

fn grad_dot(hash: i32, x: f64, y: f64, z: f64) -> f64 {
    let g = GRADIENT[(hash & 15) as usize];
    g[0] * x + g[1] * y + g[2] * z
}

fn smoothstep(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

fn lerp2(tx: f64, ty: f64, v00: f64, v10: f64, v01: f64, v11: f64) -> f64 {
    lerp(ty, lerp(tx, v00, v10), lerp(tx, v01, v11))
}
