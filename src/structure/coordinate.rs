#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64, z: f64) -> Coordinate {
        Coordinate { x, y, z }
    }
    pub fn zero() -> Coordinate {
        Coordinate { x: 0.0, y: 0.0, z: 0.0 }
    }
    pub fn add(&self, other: &Coordinate) -> Coordinate {
        Coordinate {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
    pub fn sub(&self, other: &Coordinate) -> Coordinate {
        Coordinate {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
    pub fn neg(&self) -> Coordinate {
        Coordinate { x: -self.x, y: -self.y, z: -self.z }
    }
    pub fn dot(&self, other: &Coordinate) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
    pub fn cross(&self, other: &Coordinate) -> Coordinate {
        Coordinate {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }
    pub fn scale(&self, factor: f64) -> Coordinate {
        Coordinate {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }
    pub fn div(&self, divisor: f64) -> Coordinate {
        Coordinate {
            x: self.x / divisor,
            y: self.y / divisor,
            z: self.z / divisor,
        }
    }
    pub fn distance(&self, other: &Coordinate) -> f64 {
        self.sub(other).norm()
    }
    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
    pub fn from_array(arr: [f64; 3]) -> Coordinate {
        Coordinate { x: arr[0], y: arr[1], z: arr[2] }
    }
}
