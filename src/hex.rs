use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TerrainError;
use crate::rng::Rng;

/// Axial hex coordinate. Value type, freely copied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

pub const ORIGIN: Hex = Hex::new(0, 0);

/// Canonical neighbor order. Index `i` of a neighbor list always refers to `DIRECTIONS[i]`.
pub const DIRECTIONS: [Hex; 6] = [
    Hex::new(-1, 1),
    Hex::new(-1, 0),
    Hex::new(0, -1),
    Hex::new(1, -1),
    Hex::new(1, 0),
    Hex::new(0, 1),
];

/// Screen-space unit vector of each direction, used to turn elevation
/// differences into a flow vector.
pub const FLOW_COEFFS: [[f64; 2]; 6] = [
    [-0.75, -0.5],
    [-0.75, 0.5],
    [0.0, -1.0],
    [0.75, -0.5],
    [0.75, 0.5],
    [0.0, 1.0],
];

impl Hex {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Implicit third cube coordinate.
    #[inline]
    pub fn s(self) -> i32 {
        -self.q - self.r
    }

    pub fn distance(self, other: Hex) -> u32 {
        let d = self - other;
        d.q.unsigned_abs().max(d.r.unsigned_abs()).max(d.s().unsigned_abs())
    }
}

impl Add for Hex {
    type Output = Hex;
    fn add(self, o: Hex) -> Hex {
        Hex::new(self.q + o.q, self.r + o.r)
    }
}

impl Sub for Hex {
    type Output = Hex;
    fn sub(self, o: Hex) -> Hex {
        Hex::new(self.q - o.q, self.r - o.r)
    }
}

impl Mul<i32> for Hex {
    type Output = Hex;
    fn mul(self, k: i32) -> Hex {
        Hex::new(self.q * k, self.r * k)
    }
}

/// Canonical string key `"q,r"`.
impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.q, self.r)
    }
}

impl FromStr for Hex {
    type Err = TerrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || TerrainError::BadKey(s.to_string());
        let (q, r) = s.split_once(',').ok_or_else(bad)?;
        let q = q.trim().parse().map_err(|_| bad())?;
        let r = r.trim().parse().map_err(|_| bad())?;
        Ok(Hex::new(q, r))
    }
}

/// The 6 neighbors in canonical direction order.
#[inline]
pub fn neighbors(h: Hex) -> [Hex; 6] {
    DIRECTIONS.map(|d| h + d)
}

/// Directions in a random order drawn from `rng`.
pub fn permuted_directions(rng: &mut Rng) -> [Hex; 6] {
    let mut dirs = DIRECTIONS;
    rng.shuffle(&mut dirs);
    dirs
}

/// Coordinates at exactly `radius` steps from `center`.
pub fn ring(center: Hex, radius: u32) -> Vec<Hex> {
    if radius == 0 {
        return vec![center];
    }
    let radius = radius as i32;
    let mut out = Vec::with_capacity(6 * radius as usize);
    let mut h = center + DIRECTIONS[0] * radius;
    for i in 0..6 {
        let step = DIRECTIONS[(i + 2) % 6];
        for _ in 0..radius {
            out.push(h);
            h = h + step;
        }
    }
    out
}

/// Center first, then rings outward.
pub fn spiral(center: Hex, radius: u32) -> Vec<Hex> {
    let mut out = vec![center];
    for k in 1..=radius {
        out.extend(ring(center, k));
    }
    out
}

/// Map extent. `Rect` follows a staggered-column rectangle around the origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Bounds {
    Rect { width: i32, height: i32 },
    Hexagon { radius: u32 },
}

impl Bounds {
    /// `|q| <= width/2` and `|r + q/2| <= height/2`, in doubled integer arithmetic.
    pub fn contains(&self, h: Hex) -> bool {
        match *self {
            Bounds::Rect { width, height } => {
                (2 * h.q).abs() <= width && (2 * h.r + h.q).abs() <= height
            }
            Bounds::Hexagon { radius } => h.distance(ORIGIN) <= radius,
        }
    }

    /// Every in-bounds coordinate, in a fixed order.
    pub fn coords(&self) -> Vec<Hex> {
        match *self {
            Bounds::Rect { width, height } => {
                let qmax = width.div_euclid(2);
                let mut out = Vec::new();
                for q in -qmax..=qmax {
                    let rmin = -(height + q).div_euclid(2);
                    let rmax = (height - q).div_euclid(2);
                    for r in rmin..=rmax {
                        out.push(Hex::new(q, r));
                    }
                }
                out
            }
            Bounds::Hexagon { radius } => spiral(ORIGIN, radius),
        }
    }

    pub fn validate(&self) -> Result<(), TerrainError> {
        match *self {
            Bounds::Rect { width, height } if width < 1 || height < 1 => Err(
                TerrainError::InvalidBounds(format!("rect {}x{}", width, height)),
            ),
            _ => Ok(()),
        }
    }
}
