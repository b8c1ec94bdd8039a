//! # Geometry 模块
//!
//! 动画使用的基础几何类型。
//!
//! 坐标统一为合成器像素坐标（f64）。向量直接使用 `glam` 的双精度类型，
//! 矩形 [`AnimBox`] 由左上、右下两个点定义。

use glam::{DVec2, DVec4};

/// 二维向量（点、尺寸、分辨率共用）
pub type Vector = DVec2;

/// 齐次四维向量（变换后的角点）
pub type Vector4 = DVec4;

/// 轴对齐矩形
///
/// 不强制左上/右下的大小关系：退化或反向的矩形都是合法输入，
/// 宽高直接由 `bottom_right - top_left` 得出。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimBox {
    /// 左上角
    pub top_left: Vector,
    /// 右下角
    pub bottom_right: Vector,
}

impl AnimBox {
    /// 由两个角点创建
    pub const fn new(top_left: Vector, bottom_right: Vector) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// 由四个坐标分量创建
    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Vector::new(x1, y1), Vector::new(x2, y2))
    }

    /// 由位置与尺寸创建
    pub fn from_origin_size(origin: Vector, size: Vector) -> Self {
        Self::new(origin, origin + size)
    }

    /// 退化为一个点的矩形（宽高为 0）
    pub fn point(at: Vector) -> Self {
        Self::new(at, at)
    }

    pub fn width(&self) -> f64 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> f64 {
        self.bottom_right.y - self.top_left.y
    }

    /// 宽高
    pub fn size(&self) -> Vector {
        self.bottom_right - self.top_left
    }

    /// 中心点（绝对坐标）
    pub fn center(&self) -> Vector {
        (self.top_left + self.bottom_right) * 0.5
    }

    /// 中心相对左上角的偏移
    pub fn center_offset(&self) -> Vector {
        self.size() * 0.5
    }

    /// 四个角点，顺序：左上、右上、左下、右下
    pub fn corners(&self) -> [Vector; 4] {
        let tl = self.top_left;
        let br = self.bottom_right;
        [tl, Vector::new(br.x, tl.y), Vector::new(tl.x, br.y), br]
    }

    /// 平移
    pub fn translate(&self, offset: Vector) -> Self {
        Self::new(self.top_left + offset, self.bottom_right + offset)
    }

    /// 宽或高为零的轴扩展为 1 像素
    pub fn ensure_non_zero_area(&self) -> Self {
        let tl = self.top_left;
        let mut br = self.bottom_right;
        if br.x == tl.x {
            br.x += 1.0;
        }
        if br.y == tl.y {
            br.y += 1.0;
        }
        Self::new(tl, br)
    }

    /// 点在矩形内的归一化坐标
    ///
    /// 零宽或零高的轴返回 0。
    pub fn normalize(&self, point: Vector) -> Vector {
        let size = self.size();
        let rel = point - self.top_left;
        Vector::new(
            if size.x == 0.0 { 0.0 } else { rel.x / size.x },
            if size.y == 0.0 { 0.0 } else { rel.y / size.y },
        )
    }
}

impl std::fmt::Display for AnimBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {})-({}, {})",
            self.top_left.x, self.top_left.y, self.bottom_right.x, self.bottom_right.y
        )
    }
}

/// 齐次坐标透视除法
///
/// `w` 为零时原样返回 xy，避免产生无穷值。
pub fn project(v: Vector4) -> Vector4 {
    if v.w == 0.0 || v.w == 1.0 {
        return v;
    }
    Vector4::new(v.x / v.w, v.y / v.w, v.z / v.w, 1.0)
}
