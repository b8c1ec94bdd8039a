//! 4×4 弹簧质点网格

use crate::geometry::{Vector, Vector4};

/// 网格宽度（列数）
pub const WIDTH: usize = 4;
/// 网格高度（行数）
pub const HEIGHT: usize = 4;
const POINTS: usize = WIDTH * HEIGHT;

/// 每个质点的质量
const MASS: f64 = 15.0;
/// 弹簧形变低于此值时不产生力
const SPRING_CLIP: f64 = 0.5;
/// 速度低于此值时归零
const VELOCITY_CLIP: f64 = 0.1;

/// 弹簧参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelSettings {
    /// 弹性系数
    pub spring_k: f64,
    /// 阻尼
    pub friction: f64,
    /// 抓取时质点偏离静止网格的最大距离
    pub maximum_range: f64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            spring_k: 8.0,
            friction: 3.0,
            maximum_range: 100.0,
        }
    }
}

/// 网格上被抓住的质点
///
/// 不可复制：释放时交还给 [`Model::release_anchor`]。
#[derive(Debug, PartialEq, Eq)]
pub struct Anchor {
    index: usize,
}

impl Anchor {
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, Copy)]
struct Spring {
    a: usize,
    b: usize,
    /// 静止时 `b - a`
    desired: Vector,
}

/// 弹簧质点网格
///
/// 质点按行存储：`index = row * WIDTH + column`。
#[derive(Debug, Clone)]
pub struct Model {
    positions: [Vector; POINTS],
    velocities: [Vector; POINTS],
    anchors: [u32; POINTS],
    springs: Vec<Spring>,
    size: Vector,
    settings: ModelSettings,
    remainder: f64,
    moving: bool,
}

impl Model {
    pub fn new(position: Vector, size: Vector, settings: ModelSettings) -> Self {
        let positions = rest_grid(position, size);
        Self {
            positions,
            velocities: [Vector::ZERO; POINTS],
            anchors: [0; POINTS],
            springs: build_springs(&positions),
            size,
            settings,
            remainder: 0.0,
            moving: false,
        }
    }

    pub fn settings(&self) -> ModelSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: ModelSettings) {
        self.settings = settings;
    }

    pub fn size(&self) -> Vector {
        self.size
    }

    /// 质点当前位置
    pub fn point(&self, column: usize, row: usize) -> Vector {
        self.positions[row * WIDTH + column]
    }

    /// 网格是否仍在运动
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// 整体移动，使左上角质点位于 `position`
    pub fn move_to(&mut self, position: Vector) {
        let delta = position - self.positions[0];
        self.move_by(delta);
    }

    /// 整体平移
    pub fn move_by(&mut self, delta: Vector) {
        for position in &mut self.positions {
            *position += delta;
        }
    }

    /// 以左上角质点为原点按比例缩放网格，并重建静止长度
    pub fn resize(&mut self, size: Vector) {
        let origin = self.positions[0];
        let ratio = Vector::new(
            if self.size.x == 0.0 { 1.0 } else { size.x / self.size.x },
            if self.size.y == 0.0 { 1.0 } else { size.y / self.size.y },
        );

        if self.size.x == 0.0 || self.size.y == 0.0 {
            self.positions = rest_grid(origin, size);
        } else {
            for position in &mut self.positions {
                *position = origin + (*position - origin) * ratio;
            }
        }

        self.size = size;
        self.springs = build_springs(&rest_grid(origin, size));
    }

    /// 抓住离 `position` 最近的质点
    pub fn grab_anchor(&mut self, position: Vector) -> Anchor {
        let index = self
            .positions
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.distance_squared(position)
                    .total_cmp(&b.distance_squared(position))
            })
            .map(|(index, _)| index)
            .unwrap_or(0);

        self.anchors[index] += 1;
        self.velocities[index] = Vector::ZERO;
        Anchor { index }
    }

    /// 直接移动被抓住的质点
    pub fn move_anchor(&mut self, anchor: &Anchor, delta: Vector) {
        self.positions[anchor.index] += delta;
        if delta != Vector::ZERO {
            self.moving = true;
        }
    }

    /// 释放质点，网格随后自由回弹
    pub fn release_anchor(&mut self, anchor: Anchor) {
        let count = &mut self.anchors[anchor.index];
        *count = count.saturating_sub(1);
        self.moving = true;
    }

    /// 推进 `time` 个时间单位
    ///
    /// 以单位步长积分，不足一个单位的部分累积到下次调用。返回网格是否仍在运动。
    pub fn step(&mut self, time: f64) -> bool {
        if time <= 0.0 || !time.is_finite() {
            return self.moving;
        }

        self.remainder += time;
        while self.remainder >= 1.0 {
            self.remainder -= 1.0;
            self.moving = self.integrate();
            if !self.moving {
                self.remainder = 0.0;
                break;
            }
        }

        self.moving
    }

    /// 纹理坐标经三次 Bernstein 曲面形变后的位置
    pub fn deform_texcoords(&self, uv: Vector) -> Vector {
        let u = bernstein(uv.x);
        let v = bernstein(uv.y);

        let mut result = Vector::ZERO;
        for row in 0..HEIGHT {
            for column in 0..WIDTH {
                result += self.point(column, row) * (u[column] * v[row]);
            }
        }
        result
    }

    /// 四个角质点：左上、右上、左下、右下
    pub fn extremes(&self) -> [Vector4; 4] {
        [
            self.positions[0],
            self.positions[WIDTH - 1],
            self.positions[POINTS - WIDTH],
            self.positions[POINTS - 1],
        ]
        .map(|p| Vector4::new(p.x, p.y, 0.0, 1.0))
    }

    /// 单位步长积分一次，返回是否还有质点在运动
    fn integrate(&mut self) -> bool {
        let mut more = false;

        let mut forces = [Vector::ZERO; POINTS];
        for spring in &self.springs {
            let a = self.positions[spring.a];
            let b = self.positions[spring.b];

            let delta_a = clip(0.5 * (b - a - spring.desired), SPRING_CLIP);
            let delta_b = clip(0.5 * (a - b + spring.desired), SPRING_CLIP);

            forces[spring.a] += delta_a * self.settings.spring_k;
            forces[spring.b] += delta_b * self.settings.spring_k;
        }

        for index in 0..POINTS {
            if self.anchors[index] > 0 {
                self.velocities[index] = Vector::ZERO;
                continue;
            }

            let total = forces[index] - self.velocities[index] * self.settings.friction;
            let velocity = clip(self.velocities[index] + total / MASS, VELOCITY_CLIP);
            self.velocities[index] = velocity;
            self.positions[index] += velocity * 0.5;

            more |= velocity != Vector::ZERO;
        }

        more | self.constrain()
    }

    /// 只有一个质点被抓住时，其余质点不得偏离静止网格超过 `maximum_range`
    fn constrain(&mut self) -> bool {
        let held: Vec<usize> = (0..POINTS).filter(|&i| self.anchors[i] > 0).collect();
        let [anchor] = held[..] else {
            return false;
        };

        let range = self.settings.maximum_range.max(0.0);
        let rest = rest_grid(Vector::ZERO, self.size);
        let anchor_position = self.positions[anchor];

        let mut constrained = false;
        for index in 0..POINTS {
            if index == anchor {
                continue;
            }
            let target = anchor_position + rest[index] - rest[anchor];
            let offset = self.positions[index] - target;
            let distance = offset.length();
            if distance > range {
                self.positions[index] = target + offset * (range / distance);
                constrained = true;
            }
        }
        constrained
    }
}

fn rest_grid(origin: Vector, size: Vector) -> [Vector; POINTS] {
    std::array::from_fn(|index| {
        let column = (index % WIDTH) as f64 / (WIDTH - 1) as f64;
        let row = (index / WIDTH) as f64 / (HEIGHT - 1) as f64;
        origin + size * Vector::new(column, row)
    })
}

/// 水平与垂直相邻质点之间各一根弹簧
fn build_springs(rest: &[Vector; POINTS]) -> Vec<Spring> {
    let mut springs = Vec::with_capacity(2 * WIDTH * HEIGHT);
    for row in 0..HEIGHT {
        for column in 0..WIDTH {
            let index = row * WIDTH + column;
            if column + 1 < WIDTH {
                springs.push(Spring {
                    a: index,
                    b: index + 1,
                    desired: rest[index + 1] - rest[index],
                });
            }
            if row + 1 < HEIGHT {
                springs.push(Spring {
                    a: index,
                    b: index + WIDTH,
                    desired: rest[index + WIDTH] - rest[index],
                });
            }
        }
    }
    springs
}

fn bernstein(t: f64) -> [f64; 4] {
    let s = 1.0 - t;
    [s * s * s, 3.0 * t * s * s, 3.0 * t * t * s, t * t * t]
}

/// 绝对值低于阈值的分量归零
fn clip(v: Vector, threshold: f64) -> Vector {
    Vector::new(
        if v.x.abs() < threshold { 0.0 } else { v.x },
        if v.y.abs() < threshold { 0.0 } else { v.y },
    )
}
