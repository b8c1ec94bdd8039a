//! # Grid 模块
//!
//! 网格形变动画：不产生单一矩阵，而是给出网格上每个纹理坐标对应的位置。

pub mod magiclamp;

pub use magiclamp::{MagicLampAnimation, MagicLampParams};

use crate::geometry::{Vector, Vector4};
use crate::stepper::Stepper;

/// 每轴网格顶点数的上限
pub const MAX_RESOLUTION: usize = 1024;

/// 网格动画接口
pub trait GridAnimation {
    /// 推进到 `elapsed`，动画仍在进行返回 `true`
    fn step(&mut self, elapsed: i64) -> bool;

    /// 当前进度
    fn progress(&self) -> f64;

    /// 网格分辨率（列数, 行数）
    fn resolution(&self) -> Vector;

    /// 纹理坐标 `uv ∈ [0,1]²` 形变后的位置（合成器坐标）
    fn deform_uv_to_model_space(&self, uv: Vector) -> Vector;

    /// 给定角点形变后的位置，顺序与输入一致
    fn extremes(&self, corners: &[Vector; 4]) -> [Vector4; 4];

    /// 使用的步进器
    fn stepper(&self) -> &dyn Stepper;

    /// 按分辨率采样整张网格
    fn mesh(&self) -> DeformedMesh {
        let resolution = self.resolution();
        DeformedMesh::sample(
            resolution.x as usize,
            resolution.y as usize,
            |uv| self.deform_uv_to_model_space(uv),
        )
    }
}

/// 形变后的网格顶点
///
/// 顶点按行存储：`vertices[row * columns + column]`。
#[derive(Debug, Clone, PartialEq)]
pub struct DeformedMesh {
    pub columns: usize,
    pub rows: usize,
    pub vertices: Vec<Vector>,
}

impl DeformedMesh {
    /// 在 `columns × rows` 个均匀分布的纹理坐标上采样
    ///
    /// 每轴顶点数钳制到 `[2, MAX_RESOLUTION]`。
    pub fn sample(columns: usize, rows: usize, deform: impl Fn(Vector) -> Vector) -> Self {
        let columns = columns.clamp(2, MAX_RESOLUTION);
        let rows = rows.clamp(2, MAX_RESOLUTION);

        let mut vertices = Vec::with_capacity(columns * rows);
        for row in 0..rows {
            for column in 0..columns {
                let uv = Vector::new(
                    column as f64 / (columns - 1) as f64,
                    row as f64 / (rows - 1) as f64,
                );
                vertices.push(deform(uv));
            }
        }

        Self {
            columns,
            rows,
            vertices,
        }
    }

    /// 取顶点
    pub fn vertex(&self, column: usize, row: usize) -> Option<Vector> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.vertices.get(row * self.columns + column).copied()
    }

    /// 平移所有顶点
    pub fn translate(mut self, offset: Vector) -> Self {
        for vertex in &mut self.vertices {
            *vertex += offset;
        }
        self
    }
}
